//! Git abstraction layer for Updraft.
//!
//! This crate provides the version-control operations the launcher needs:
//! - Fetching a branch from a remote
//! - Resolving local and remote-tracking commits
//! - Hard-resetting the checkout

mod commit;
mod error;
mod repository;

pub use commit::CommitId;
pub use error::{GitError, GitResult};
pub use repository::Repository;
