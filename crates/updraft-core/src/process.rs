//! Child process helpers.

use std::fmt;
use std::process::{Command, ExitStatus, Output};

use tracing::{debug, warn};

use crate::{CoreError, CoreResult};

/// How a launched process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    code: Option<i32>,
}

impl ProcessExit {
    /// Creates an exit with the given code; `None` means killed by a signal.
    pub const fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    /// Returns the raw exit code, if the process exited normally.
    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    /// Returns whether the process exited with code 0.
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Returns the code to exit the launcher with.
    ///
    /// Signal terminations and codes outside `0..=255` map to 1.
    pub fn exit_code(&self) -> u8 {
        self.code.and_then(|c| u8::try_from(c).ok()).unwrap_or(1)
    }
}

impl From<ExitStatus> for ProcessExit {
    fn from(status: ExitStatus) -> Self {
        Self::new(status.code())
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("signal"),
        }
    }
}

/// Runs `cmd` with inherited stdio and waits for it.
pub(crate) fn status(cmd: &mut Command, program: &str) -> CoreResult<ExitStatus> {
    debug!(program, args = ?cmd.get_args().collect::<Vec<_>>(), "running");
    cmd.status().map_err(|source| CoreError::Spawn {
        program: program.to_string(),
        source,
    })
}

/// Runs `cmd` capturing its output, failing on a non-zero exit.
///
/// Captured stdout is logged at debug level; stderr is logged on failure.
pub(crate) fn output(cmd: &mut Command, program: &str) -> CoreResult<Output> {
    debug!(program, args = ?cmd.get_args().collect::<Vec<_>>(), "running");
    let output = cmd.output().map_err(|source| CoreError::Spawn {
        program: program.to_string(),
        source,
    })?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        debug!(program, "{line}");
    }

    if !output.status.success() {
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            warn!(program, "{line}");
        }
        return Err(CoreError::CommandFailed {
            program: program.to_string(),
            status: output.status,
        });
    }

    Ok(output)
}
