//! Command runner trait and deployment outcomes.
//!
//! Both webhook deployments and interval jobs go through a [`CommandRunner`].
//! The runner has no idea why it is being called; it spawns one process,
//! waits for it, and reports what happened.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::Result;

/// Result of running one external command to completion.
#[derive(Debug, Clone)]
pub struct DeploymentOutcome {
    /// Whether the process exited with status 0.
    pub succeeded: bool,
    /// Everything the process wrote to stdout.
    pub stdout: Bytes,
    /// Everything the process wrote to stderr.
    pub stderr: Bytes,
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeploymentOutcome {
    /// Build an outcome from an exit code; success is exactly `Some(0)`.
    pub fn from_exit(
        exit_code: Option<i32>,
        stdout: impl Into<Bytes>,
        stderr: impl Into<Bytes>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            succeeded: exit_code == Some(0),
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Captured stdout, lossily decoded for logging.
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Captured stderr, lossily decoded for logging.
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Wall-clock time the command took.
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs an external command and captures its outcome.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Name of this runner.
    fn name(&self) -> &'static str;

    /// Spawn `command` (argv, program first), wait for it to exit and
    /// capture its output in full.
    ///
    /// A non-zero exit is an `Ok` outcome with `succeeded == false`; `Err` is
    /// reserved for commands that could not be started at all.
    async fn run(&self, command: &[String]) -> Result<DeploymentOutcome>;
}
