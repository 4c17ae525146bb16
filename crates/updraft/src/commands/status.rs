//! Status command.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use updraft_config::Config;
use updraft_core::{CheckoutStatus, GitCheckout};

/// Arguments for the status command.
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs the status command.
///
/// Fetches but never touches the working tree.
pub fn run(args: &StatusArgs, config: &Config) -> Result<ExitCode> {
    let repo = &config.repository;
    let checkout = GitCheckout::from_config(repo).context("failed to open checkout")?;
    let status = checkout.status().context("failed to check remote")?;

    if args.json {
        println!("{}", to_json(&status, &repo.remote, &repo.branch));
    } else {
        println!("{}", describe(&status, &repo.remote, &repo.branch));
    }

    Ok(ExitCode::SUCCESS)
}

fn describe(status: &CheckoutStatus, remote: &str, branch: &str) -> String {
    if status.is_current() {
        return format!(
            "Up to date with {remote}/{branch} at {}",
            status.remote.short()
        );
    }

    let local = status.head.as_ref().map_or("(none)", |h| h.short());
    format!(
        "Behind {remote}/{branch}: local {local}, remote {}",
        status.remote.short()
    )
}

fn to_json(status: &CheckoutStatus, remote: &str, branch: &str) -> serde_json::Value {
    json!({
        "remote": remote,
        "branch": branch,
        "head": status.head.as_ref().map(ToString::to_string),
        "remote_head": status.remote.to_string(),
        "current": status.is_current(),
    })
}
