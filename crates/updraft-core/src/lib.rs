//! Core library for Updraft.
//!
//! This crate provides the update-then-launch orchestration: synchronizing the
//! checkout, reinstalling dependencies when it moved, and running the
//! scheduler process.

mod environment;
mod error;
mod install;
mod launch;
mod pipeline;
mod process;
mod sync;

pub use environment::Environment;
pub use error::{CoreError, CoreResult};
pub use install::{CommandInstaller, DependencyInstaller, InstallOutcome};
pub use launch::{CommandLauncher, ProcessLauncher};
pub use pipeline::{Pipeline, UpdateReport};
pub use process::ProcessExit;
pub use sync::{Checkout, CheckoutStatus, GitCheckout, SyncOutcome};
pub use updraft_git::CommitId;
