//! Checkout synchronization.

use std::path::Path;

use tracing::info;
use updraft_config::RepositoryConfig;
use updraft_git::{CommitId, Repository};

use crate::CoreResult;

/// Result of synchronizing a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local and remote already pointed at the same commit.
    Unchanged { head: CommitId },
    /// The checkout was reset to the remote commit.
    Updated {
        from: Option<CommitId>,
        to: CommitId,
    },
}

impl SyncOutcome {
    /// Returns whether the checkout moved.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    /// Returns the commit the checkout is at after the sync.
    pub fn head(&self) -> &CommitId {
        match self {
            Self::Unchanged { head } => head,
            Self::Updated { to, .. } => to,
        }
    }
}

/// Local versus remote commit, as seen after a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutStatus {
    /// Local `HEAD`, `None` on an unborn branch.
    pub head: Option<CommitId>,
    /// Remote-tracking commit.
    pub remote: CommitId,
}

impl CheckoutStatus {
    /// Returns whether the checkout matches the remote.
    pub fn is_current(&self) -> bool {
        self.head.as_ref() == Some(&self.remote)
    }
}

/// Brings a local checkout in line with its upstream.
pub trait Checkout {
    /// Fetches, compares, and resets the checkout if it is behind.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching, resolving or resetting fails.
    fn sync(&self) -> CoreResult<SyncOutcome>;
}

/// A [`Checkout`] backed by a git repository.
pub struct GitCheckout {
    repo: Repository,
    remote: String,
    branch: String,
}

impl GitCheckout {
    /// Opens the checkout at `path`, tracking `remote`/`branch`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a git repository.
    pub fn open(
        path: impl AsRef<Path>,
        remote: impl Into<String>,
        branch: impl Into<String>,
    ) -> CoreResult<Self> {
        Ok(Self {
            repo: Repository::open(path)?,
            remote: remote.into(),
            branch: branch.into(),
        })
    }

    /// Opens the checkout described by configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured path is not a git repository.
    pub fn from_config(config: &RepositoryConfig) -> CoreResult<Self> {
        Self::open(&config.path, &config.remote, &config.branch)
    }

    /// Fetches and reports local versus remote without touching the checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching or resolving fails.
    pub fn status(&self) -> CoreResult<CheckoutStatus> {
        self.repo.fetch(&self.remote, &self.branch)?;
        Ok(CheckoutStatus {
            head: self.repo.head_commit()?,
            remote: self.repo.remote_commit(&self.remote, &self.branch)?,
        })
    }
}

impl Checkout for GitCheckout {
    fn sync(&self) -> CoreResult<SyncOutcome> {
        info!(remote = %self.remote, branch = %self.branch, "fetching updates");
        let status = self.status()?;

        if status.is_current() {
            info!(commit = %status.remote.short(), "checkout up to date");
            return Ok(SyncOutcome::Unchanged {
                head: status.remote,
            });
        }

        info!(
            from = status.head.as_ref().map_or("none", CommitId::short),
            to = %status.remote.short(),
            "checkout behind remote, resetting"
        );
        self.repo.reset_hard(&status.remote)?;

        Ok(SyncOutcome::Updated {
            from: status.head,
            to: status.remote,
        })
    }
}
