//! CLI definition.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use updraft_config::{Config, LogConfig, find_and_load_config, load_config};

use crate::{commands, logging};

/// Keep a checkout in sync with its remote, reinstall dependencies when it
/// changes, then launch the scheduler.
#[derive(Debug, Parser)]
#[command(name = "updraft")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: search updraft.toml upward from the current directory)
    #[arg(short, long, global = true, env = "UPDRAFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Update the checkout, then run the scheduler until it exits
    Run(commands::run::RunArgs),

    /// Update the checkout and dependencies without launching
    Update(commands::update::UpdateArgs),

    /// Show whether the checkout is behind its remote
    Status(commands::status::StatusArgs),

    /// Write a default configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<ExitCode> {
        match &self.command {
            Commands::Run(args) => commands::run::run(args, &self.prepare()?),
            Commands::Update(args) => commands::update::run(args, &self.prepare()?),
            Commands::Status(args) => commands::status::run(args, &self.prepare()?),
            Commands::Init(args) => {
                logging::init(&LogConfig::default(), self.verbose)?;
                commands::init::run(args)
            }
        }
    }

    /// Loads configuration and starts logging.
    fn prepare(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => load_config(path),
            None => find_and_load_config(),
        }
        .context("failed to load configuration")?;

        logging::init(&config.log, self.verbose)?;
        Ok(config)
    }
}
