//! Dependency installation.

use std::path::PathBuf;
use std::process::Command;

use tracing::{info, warn};
use updraft_config::Config;

use crate::environment::{self, Environment};
use crate::{CoreResult, process};

/// Result of an installation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The installer ran successfully.
    Installed,
    /// The manifest was missing, nothing ran.
    Skipped,
}

/// Reinstalls the checkout's dependencies.
pub trait DependencyInstaller {
    /// Runs the installation.
    ///
    /// # Errors
    ///
    /// Returns an error if the installer cannot start or exits unsuccessfully.
    fn install(&self) -> CoreResult<InstallOutcome>;
}

/// Installs dependencies by running `<program> <args…> <manifest>`.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
    manifest: PathBuf,
    workdir: PathBuf,
    environment: Option<Environment>,
}

impl CommandInstaller {
    /// Creates an installer running `program` against `manifest` inside `workdir`.
    pub fn new(
        program: impl Into<String>,
        manifest: impl Into<PathBuf>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            manifest: manifest.into(),
            workdir: workdir.into(),
            environment: None,
        }
    }

    /// Builds an installer from configuration.
    pub fn from_config(config: &Config, environment: Option<Environment>) -> Self {
        let mut installer = Self::new(
            &config.install.program,
            &config.install.manifest,
            &config.repository.path,
        )
        .with_args(config.install.args.iter().cloned());
        installer.environment = environment;
        installer
    }

    /// Sets the arguments placed before the manifest.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Runs the installer inside `environment`.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Builds the installer command.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be activated.
    pub fn command(&self) -> CoreResult<Command> {
        let mut cmd = environment::command(&self.program, &self.workdir, self.environment.as_ref())?;
        cmd.args(&self.args).arg(&self.manifest);
        Ok(cmd)
    }
}

impl DependencyInstaller for CommandInstaller {
    fn install(&self) -> CoreResult<InstallOutcome> {
        if !self.workdir.join(&self.manifest).is_file() {
            warn!(manifest = ?self.manifest, "requirements manifest not found, skipping install");
            return Ok(InstallOutcome::Skipped);
        }

        info!(program = %self.program, manifest = ?self.manifest, "installing dependencies");
        process::output(&mut self.command()?, &self.program)?;
        info!("dependencies installed");

        Ok(InstallOutcome::Installed)
    }
}
