//! Core error types.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] updraft_git::GitError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] updraft_config::ConfigError),

    /// Runtime environment directory missing.
    #[error("runtime environment not found: {0}")]
    EnvironmentNotFound(PathBuf),

    /// A program could not be started.
    #[error("failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A program exited unsuccessfully.
    #[error("{program} failed with {status}")]
    CommandFailed { program: String, status: ExitStatus },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_not_found_display() {
        let err = CoreError::EnvironmentNotFound(PathBuf::from("/srv/collector/.venv"));
        assert_eq!(
            err.to_string(),
            "runtime environment not found: /srv/collector/.venv"
        );
    }

    #[test]
    fn test_spawn_keeps_source() {
        let err = CoreError::Spawn {
            program: "pip".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "failed to start pip");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_git_error_converts() {
        let err: CoreError = updraft_git::GitError::RemoteNotFound("origin".to_string()).into();
        assert_eq!(err.to_string(), "git error: remote not found: origin");
    }
}
