//! Update-then-launch orchestration.

use tracing::info;
use updraft_config::Config;

use crate::{
    Checkout, CommandInstaller, CommandLauncher, CoreResult, DependencyInstaller, Environment,
    GitCheckout, InstallOutcome, ProcessExit, ProcessLauncher, SyncOutcome,
};

/// What an update pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Checkout synchronization result.
    pub sync: SyncOutcome,
    /// Installation result, `None` when installation was not needed.
    pub install: Option<InstallOutcome>,
}

/// Runs sync, install and launch strictly in that order.
///
/// Installation only happens when the checkout moved or a reinstall is
/// forced. The first failing step aborts the run.
pub struct Pipeline {
    checkout: Box<dyn Checkout>,
    installer: Box<dyn DependencyInstaller>,
    launcher: Box<dyn ProcessLauncher>,
    force_install: bool,
}

impl Pipeline {
    /// Creates a new pipeline with the given steps.
    #[must_use]
    pub fn new(
        checkout: Box<dyn Checkout>,
        installer: Box<dyn DependencyInstaller>,
        launcher: Box<dyn ProcessLauncher>,
    ) -> Self {
        Self {
            checkout,
            installer,
            launcher,
            force_install: false,
        }
    }

    /// Builds the git/command pipeline described by configuration.
    ///
    /// `install.always` turns on forced installation.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository or the environment cannot be opened.
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let environment = config
            .environment
            .path
            .as_ref()
            .map(Environment::open)
            .transpose()?;

        let checkout = GitCheckout::from_config(&config.repository)?;
        let installer = CommandInstaller::from_config(config, environment.clone());
        let launcher = CommandLauncher::from_config(config, environment);

        Ok(Self::new(
            Box::new(checkout),
            Box::new(installer),
            Box::new(launcher),
        )
        .with_force_install(config.install.always))
    }

    /// Reinstalls dependencies even when the checkout did not move.
    #[must_use]
    pub fn with_force_install(mut self, force: bool) -> Self {
        self.force_install = force;
        self
    }

    /// Synchronizes the checkout and reinstalls dependencies if needed.
    ///
    /// # Errors
    ///
    /// Returns the first step error.
    pub fn update(&self) -> CoreResult<UpdateReport> {
        let sync = self.checkout.sync()?;

        let install = if sync.changed() || self.force_install {
            Some(self.installer.install()?)
        } else {
            info!("checkout unchanged, skipping install");
            None
        };

        Ok(UpdateReport { sync, install })
    }

    /// Updates, then runs the launcher to completion.
    ///
    /// # Errors
    ///
    /// Returns the first step error; the launcher never runs after a failure.
    pub fn run(&self) -> CoreResult<ProcessExit> {
        let report = self.update()?;
        info!(commit = %report.sync.head().short(), "update complete");
        self.launcher.launch()
    }
}
