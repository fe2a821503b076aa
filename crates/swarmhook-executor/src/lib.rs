//! Process execution backend for swarmhook.
//!
//! Provides the [`ProcessRunner`], which runs deployment and interval
//! commands as local child processes.

pub mod process;

pub use process::ProcessRunner;
pub use swarmhook_core::executor::{CommandRunner, DeploymentOutcome};
