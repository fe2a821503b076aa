//! Local child-process runner.

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::process::Stdio;
use swarmhook_core::executor::{CommandRunner, DeploymentOutcome};
use swarmhook_core::{Error, Result};
use tokio::process::Command;
use tracing::{debug, info};

/// Runs commands as child processes of the daemon.
///
/// Each call spawns exactly one process and waits for it; output is buffered
/// in memory rather than streamed. Nothing is retried.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    working_dir: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every command from `dir` instead of the daemon's cwd.
    pub fn with_working_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn run(&self, command: &[String]) -> Result<DeploymentOutcome> {
        let (program, args) = command.split_first().ok_or(Error::EmptyCommand)?;

        info!(program = %program, args = ?args, "Running command");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let started_at = Utc::now();
        let output = cmd.output().await.map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

        let outcome = DeploymentOutcome::from_exit(
            output.status.code(),
            output.stdout,
            output.stderr,
            started_at,
        );

        debug!(
            program = %program,
            exit_code = ?outcome.exit_code,
            elapsed_ms = outcome.duration().num_milliseconds(),
            "Command finished"
        );

        Ok(outcome)
    }
}
