//! Isolated runtime environments.
//!
//! An environment is a virtualenv-style directory whose `bin/` (or
//! `Scripts\` on Windows) holds the interpreter and installer. Activating it
//! for a child process mirrors what the environment's activate script does
//! for a shell.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::{CoreError, CoreResult};

#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

/// An isolated runtime environment.
#[derive(Debug, Clone)]
pub struct Environment {
    root: PathBuf,
}

impl Environment {
    /// Opens the environment rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EnvironmentNotFound`] if `root` is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> CoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CoreError::EnvironmentNotFound(root));
        }
        Ok(Self { root })
    }

    /// Returns the directory holding the environment's executables.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// Returns the environment's copy of `program` if it has one.
    pub fn resolve_program(&self, program: &str) -> PathBuf {
        let candidate = self
            .bin_dir()
            .join(format!("{program}{}", env::consts::EXE_SUFFIX));
        if candidate.is_file() {
            candidate
        } else {
            PathBuf::from(program)
        }
    }

    /// Activates the environment for `cmd`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new `PATH` cannot be assembled.
    pub fn activate(&self, cmd: &mut Command) -> CoreResult<()> {
        cmd.env("VIRTUAL_ENV", &self.root)
            .env("PATH", self.search_path(env::var_os("PATH"))?)
            .env_remove("PYTHONHOME");
        Ok(())
    }

    fn search_path(&self, current: Option<OsString>) -> CoreResult<OsString> {
        let mut paths = vec![self.bin_dir()];
        if let Some(current) = current {
            paths.extend(env::split_paths(&current));
        }
        env::join_paths(paths)
            .map_err(|e| CoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))
    }
}

/// Builds a command for `program`, resolved and activated in `environment`.
pub(crate) fn command(
    program: &str,
    workdir: &Path,
    environment: Option<&Environment>,
) -> CoreResult<Command> {
    let mut cmd = match environment {
        Some(environment) => {
            let mut cmd = Command::new(environment.resolve_program(program));
            environment.activate(&mut cmd)?;
            cmd
        }
        None => Command::new(program),
    };
    cmd.current_dir(workdir);
    Ok(cmd)
}
