//! Configuration schema.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Checkout to keep in sync.
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Isolated runtime environment.
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Dependency installation.
    #[serde(default)]
    pub install: InstallConfig,

    /// Scheduler process.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Logging.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Checks values that deserialization cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("repository.remote", self.repository.remote.as_str()),
            ("repository.branch", self.repository.branch.as_str()),
            ("install.program", self.install.program.as_str()),
            ("scheduler.program", self.scheduler.program.as_str()),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must not be empty")));
            }
        }

        if self.install.manifest.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "install.manifest must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolves relative paths against `base`.
    ///
    /// The repository path is resolved against `base`; the manifest and the
    /// configs directory are resolved against the repository, since the
    /// launched tools run inside the checkout.
    #[must_use]
    pub fn resolve(mut self, base: &Path) -> Self {
        self.repository.path = join(base, &self.repository.path);
        let repo = self.repository.path.clone();

        self.environment.path = self.environment.path.map(|p| join(&repo, &p));
        self.install.manifest = join(&repo, &self.install.manifest);
        self.scheduler.configs_dir = join(&repo, &self.scheduler.configs_dir);
        self.log.file = self.log.file.map(|p| join(base, &p));
        self
    }
}

fn join(base: &Path, path: &Path) -> PathBuf {
    if path == Path::new(".") {
        base.to_path_buf()
    } else if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Repository configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Local checkout path.
    #[serde(default = "default_repository_path")]
    pub path: PathBuf,

    /// Remote to fetch from.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch to track.
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            path: default_repository_path(),
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

fn default_repository_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

/// Runtime environment configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Environment root (e.g. `.venv`). Tools run unmodified when unset.
    pub path: Option<PathBuf>,
}

/// Dependency installation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Installer program.
    #[serde(default = "default_install_program")]
    pub program: String,

    /// Arguments placed before the manifest path.
    #[serde(default = "default_install_args")]
    pub args: Vec<String>,

    /// Requirements manifest.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Reinstall on every run, not only when the checkout changed.
    #[serde(default)]
    pub always: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            program: default_install_program(),
            args: default_install_args(),
            manifest: default_manifest(),
            always: false,
        }
    }
}

fn default_install_program() -> String {
    "pip".to_string()
}

fn default_install_args() -> Vec<String> {
    vec!["install".to_string(), "-r".to_string()]
}

fn default_manifest() -> PathBuf {
    PathBuf::from("requirements.txt")
}

/// Scheduler process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Program to launch.
    #[serde(default = "default_scheduler_program")]
    pub program: String,

    /// Arguments placed before the configs directory flag.
    #[serde(default = "default_scheduler_args")]
    pub args: Vec<String>,

    /// Directory holding the scheduler's job configurations.
    #[serde(default = "default_configs_dir")]
    pub configs_dir: PathBuf,

    /// Flag introducing the configs directory.
    #[serde(default = "default_configs_dir_flag")]
    pub configs_dir_flag: String,

    /// Arguments appended after the configs directory.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            program: default_scheduler_program(),
            args: default_scheduler_args(),
            configs_dir: default_configs_dir(),
            configs_dir_flag: default_configs_dir_flag(),
            extra_args: Vec::new(),
        }
    }
}

fn default_scheduler_program() -> String {
    "python".to_string()
}

fn default_scheduler_args() -> Vec<String> {
    vec!["-m".to_string(), "collector.scheduler".to_string()]
}

fn default_configs_dir() -> PathBuf {
    PathBuf::from("src/configs")
}

fn default_configs_dir_flag() -> String {
    "--configs-dir".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// File receiving timestamped log lines, appended across runs.
    pub file: Option<PathBuf>,

    /// Default level filter, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
