//! Logging setup.
//!
//! Events go to stderr and, when configured, are appended to a log file with
//! a local timestamp on every line.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, format::Writer, time::FormatTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use updraft_config::LogConfig;

/// Timestamp layout for log lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats event timestamps in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// Initializes the global subscriber.
///
/// `--verbose` wins over `RUST_LOG`, which wins over the configured level.
pub fn init(config: &LogConfig, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        EnvFilter::try_new(&config.level)
            .with_context(|| format!("invalid log level: {}", config.level))?
    };

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalTime);

    let file = match &config.file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_timer(LocalTime)
                .with_writer(Mutex::new(open_append(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init()
        .context("failed to initialize logging")
}

/// Opens `path` for appending, creating it and its parent directories.
fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_local_time_format() {
        let mut out = String::new();
        LocalTime.format_time(&mut Writer::new(&mut out)).unwrap();

        assert!(NaiveDateTime::parse_from_str(&out, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_open_append_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("updater.log");

        open_append(&path).unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn test_open_append_keeps_existing_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("updater.log");

        writeln!(open_append(&path).unwrap(), "first run").unwrap();
        writeln!(open_append(&path).unwrap(), "second run").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first run\nsecond run\n");
    }
}
