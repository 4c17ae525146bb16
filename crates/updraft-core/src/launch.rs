//! Scheduler launch.

use std::path::PathBuf;
use std::process::Command;

use tracing::info;
use updraft_config::Config;

use crate::environment::{self, Environment};
use crate::{CoreResult, ProcessExit, process};

/// Starts the long-running process and waits for it to end.
pub trait ProcessLauncher {
    /// Runs the process to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    fn launch(&self) -> CoreResult<ProcessExit>;
}

/// Launches
/// `<program> <args…> <configs_dir_flag> <configs_dir> <extra_args…>`.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
    configs_dir_flag: String,
    configs_dir: PathBuf,
    extra_args: Vec<String>,
    workdir: PathBuf,
    environment: Option<Environment>,
}

impl CommandLauncher {
    /// Creates a launcher for `program` inside `workdir`.
    pub fn new(program: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            configs_dir_flag: "--configs-dir".to_string(),
            configs_dir: PathBuf::from("configs"),
            extra_args: Vec::new(),
            workdir: workdir.into(),
            environment: None,
        }
    }

    /// Builds a launcher from configuration.
    pub fn from_config(config: &Config, environment: Option<Environment>) -> Self {
        let scheduler = &config.scheduler;
        let mut launcher = Self::new(&scheduler.program, &config.repository.path)
            .with_args(scheduler.args.iter().cloned())
            .with_configs_dir(&scheduler.configs_dir_flag, &scheduler.configs_dir)
            .with_extra_args(scheduler.extra_args.iter().cloned());
        launcher.environment = environment;
        launcher
    }

    /// Sets the arguments placed before the configs directory.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the configs directory and the flag introducing it.
    #[must_use]
    pub fn with_configs_dir(mut self, flag: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.configs_dir_flag = flag.into();
        self.configs_dir = dir.into();
        self
    }

    /// Sets the arguments appended after the configs directory.
    #[must_use]
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Runs the process inside `environment`.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Builds the launch command.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be activated.
    pub fn command(&self) -> CoreResult<Command> {
        let mut cmd = environment::command(&self.program, &self.workdir, self.environment.as_ref())?;
        cmd.args(&self.args)
            .arg(&self.configs_dir_flag)
            .arg(&self.configs_dir)
            .args(&self.extra_args);
        Ok(cmd)
    }
}

impl ProcessLauncher for CommandLauncher {
    fn launch(&self) -> CoreResult<ProcessExit> {
        info!(
            program = %self.program,
            configs_dir = ?self.configs_dir,
            "launching scheduler"
        );

        let status = process::status(&mut self.command()?, &self.program)?;
        let exit = ProcessExit::from(status);
        info!(%exit, "scheduler exited");

        Ok(exit)
    }
}
