//! Update command.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use updraft_config::Config;
use updraft_core::{InstallOutcome, Pipeline, SyncOutcome, UpdateReport};

/// Arguments for the update command.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Reinstall dependencies even if the checkout did not change
    #[arg(short, long)]
    pub force_install: bool,
}

/// Runs the update command.
pub fn run(args: &UpdateArgs, config: &Config) -> Result<ExitCode> {
    let mut pipeline = Pipeline::from_config(config).context("failed to prepare pipeline")?;
    if args.force_install {
        pipeline = pipeline.with_force_install(true);
    }

    let report = pipeline.update()?;
    println!("{}", summary(&report));

    Ok(ExitCode::SUCCESS)
}

fn summary(report: &UpdateReport) -> String {
    let sync = match &report.sync {
        SyncOutcome::Unchanged { head } => format!("Already up to date at {}", head.short()),
        SyncOutcome::Updated { from: Some(from), to } => {
            format!("Updated {} -> {}", from.short(), to.short())
        }
        SyncOutcome::Updated { from: None, to } => format!("Checked out {}", to.short()),
    };

    match report.install {
        Some(InstallOutcome::Installed) => format!("{sync} (dependencies installed)"),
        Some(InstallOutcome::Skipped) => format!("{sync} (no requirements manifest)"),
        None => sync,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use updraft_core::CommitId;

    fn id(c: char) -> CommitId {
        CommitId::new(c.to_string().repeat(40))
    }

    #[test]
    fn test_summary_unchanged() {
        let report = UpdateReport {
            sync: SyncOutcome::Unchanged { head: id('a') },
            install: None,
        };
        assert_eq!(summary(&report), "Already up to date at aaaaaaa");
    }

    #[test]
    fn test_summary_updated_and_installed() {
        let report = UpdateReport {
            sync: SyncOutcome::Updated {
                from: Some(id('a')),
                to: id('b'),
            },
            install: Some(InstallOutcome::Installed),
        };
        assert_eq!(
            summary(&report),
            "Updated aaaaaaa -> bbbbbbb (dependencies installed)"
        );
    }

    #[test]
    fn test_summary_first_checkout_without_manifest() {
        let report = UpdateReport {
            sync: SyncOutcome::Updated {
                from: None,
                to: id('c'),
            },
            install: Some(InstallOutcome::Skipped),
        };
        assert_eq!(
            summary(&report),
            "Checked out ccccccc (no requirements manifest)"
        );
    }
}
