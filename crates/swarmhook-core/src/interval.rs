//! Interval job definitions.

use std::time::Duration;

/// A command that runs every `period` for the lifetime of the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalJob {
    /// Time between the end of one run and the start of the next.
    pub period: Duration,
    /// Tie-breaker for jobs due at the same instant; lower runs first.
    pub priority: i32,
    /// Argv, program first.
    pub command: Vec<String>,
}

impl IntervalJob {
    pub fn new(period: Duration, priority: i32, command: Vec<String>) -> Self {
        Self {
            period,
            priority,
            command,
        }
    }

    /// Build a job from a command line, splitting on whitespace.
    pub fn from_command_line(period: Duration, priority: i32, command_line: &str) -> Self {
        Self::new(
            period,
            priority,
            command_line.split_whitespace().map(String::from).collect(),
        )
    }

    /// The command joined back into one line, for logs.
    pub fn name(&self) -> String {
        self.command.join(" ")
    }
}
