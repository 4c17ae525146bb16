//! Run command.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};
use updraft_config::Config;
use updraft_core::Pipeline;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Reinstall dependencies even if the checkout did not change
    #[arg(short, long)]
    pub force_install: bool,
}

/// Runs the run command.
///
/// The launcher exits with the scheduler's exit code.
pub fn run(args: &RunArgs, config: &Config) -> Result<ExitCode> {
    info!(repository = ?config.repository.path, "starting");

    let mut pipeline = Pipeline::from_config(config).context("failed to prepare pipeline")?;
    if args.force_install {
        pipeline = pipeline.with_force_install(true);
    }

    let exit = pipeline.run()?;
    if !exit.success() {
        warn!(%exit, "scheduler exited unsuccessfully");
    }

    Ok(ExitCode::from(exit.exit_code()))
}
