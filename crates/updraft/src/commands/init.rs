//! Initialize command.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::info;
use updraft_config::{CONFIG_FILE_NAME, Config};

const HEADER: &str = "\
# Updraft configuration.
# Relative paths resolve against this file's directory (repository.path)
# or against the repository (everything else except log.file).
";

/// Per-section notes: comment lines placed above the table header, and
/// commented-out optional keys placed below it.
const SECTION_NOTES: &[(&str, &str, &str)] = &[
    (
        "[repository]",
        "# Checkout kept in sync with `remote`/`branch` on every start.",
        "",
    ),
    (
        "[environment]",
        "# Virtualenv activated for the installer and the scheduler.",
        "# path = \".venv\"",
    ),
    (
        "[install]",
        "# Runs `program args... manifest` after the checkout moves.\n\
         # `always = true` reinstalls on every start.",
        "",
    ),
    (
        "[scheduler]",
        "# Runs `program args... configs_dir_flag configs_dir extra_args...`.",
        "",
    ),
    (
        "[log]",
        "# `level` is overridden by RUST_LOG and --verbose.",
        "# file = \"logs/updater.log\"",
    ),
];

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to write the configuration into
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Runs the init command.
pub fn run(args: &InitArgs) -> Result<ExitCode> {
    let path = write_default(&args.dir, args.force)?;
    println!("Created {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn write_default(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let body = toml::to_string_pretty(&Config::default())
        .context("failed to serialize default configuration")?;
    std::fs::write(&path, annotate(&body))
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(?path, "wrote default configuration");
    Ok(path)
}

fn annotate(body: &str) -> String {
    let mut out = String::from(HEADER);
    let mut seen = Vec::new();
    for line in body.lines() {
        match SECTION_NOTES.iter().find(|(header, ..)| *header == line.trim()) {
            Some(note) => {
                push_section(&mut out, note);
                seen.push(note.0);
            }
            None if line.trim().is_empty() => {}
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    // Tables whose keys are all unset may be left out by the serializer.
    for note in SECTION_NOTES.iter().filter(|note| !seen.contains(&note.0)) {
        push_section(&mut out, note);
    }
    out
}

fn push_section(out: &mut String, (header, above, below): &(&str, &str, &str)) {
    out.push('\n');
    out.push_str(above);
    out.push('\n');
    out.push_str(header);
    out.push('\n');
    if !below.is_empty() {
        out.push_str(below);
        out.push('\n');
    }
}
