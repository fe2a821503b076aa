//! Worker loop that fires jobs from the queue.

use crate::queue::FiringQueue;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use swarmhook_core::{CommandRunner, IntervalJob};
use tokio::sync::{Mutex, Notify};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info};

/// State shared between the scheduler handle and its worker.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) queue: Mutex<FiringQueue>,
    /// Set once by `stop()`, never cleared.
    pub(crate) stopped: AtomicBool,
    /// Wakes the worker out of its sleep when `stop()` is called.
    pub(crate) wake: Notify,
}

impl Shared {
    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Pops due firings and runs them until the stop flag is observed.
pub(crate) struct Worker {
    shared: Arc<Shared>,
    runner: Arc<dyn CommandRunner>,
}

impl Worker {
    pub(crate) fn new(shared: Arc<Shared>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { shared, runner }
    }

    /// Run the worker loop.
    pub(crate) async fn run(self) {
        info!(runner = self.runner.name(), "Starting interval worker");

        loop {
            if self.shared.is_stopped() {
                break;
            }

            let next_due = self.shared.queue.lock().await.next_due();
            match next_due {
                Some(due) => {
                    tokio::select! {
                        _ = sleep_until(due) => {}
                        _ = self.shared.wake.notified() => continue,
                    }
                }
                None => {
                    // Nothing armed; park until stop.
                    self.shared.wake.notified().await;
                    continue;
                }
            }

            // The stop flag is checked under the queue lock, the same lock
            // `stop()` holds while cancelling, so no firing begins after stop.
            let firing = {
                let mut queue = self.shared.queue.lock().await;
                if self.shared.is_stopped() {
                    break;
                }
                queue.pop_due(Instant::now())
            };
            let Some(firing) = firing else {
                continue;
            };

            fire(self.runner.as_ref(), &firing.job).await;

            let mut queue = self.shared.queue.lock().await;
            if self.shared.is_stopped() {
                debug!(job = %firing.job.name(), "Scheduler stopped, not re-arming job");
                break;
            }
            match Instant::now().checked_add(firing.job.period) {
                Some(due) => queue.push(due, firing.job),
                None => {
                    error!(job = %firing.job.name(), "Interval period out of range, job disarmed");
                }
            }
        }

        info!("Interval worker exited");
    }
}

/// Run one job and log the result. Failures never disarm the job.
async fn fire(runner: &dyn CommandRunner, job: &IntervalJob) {
    let name = job.name();
    info!(job = %name, priority = job.priority, "Running interval job");

    match runner.run(&job.command).await {
        Ok(outcome) if outcome.succeeded => {
            info!(
                job = %name,
                elapsed_ms = outcome.duration().num_milliseconds(),
                "Interval job succeeded"
            );
            debug!(job = %name, stdout = %outcome.stdout_lossy(), "Interval job output");
        }
        Ok(outcome) => {
            error!(
                job = %name,
                exit_code = ?outcome.exit_code,
                stdout = %outcome.stdout_lossy(),
                stderr = %outcome.stderr_lossy(),
                "Interval job failed"
            );
        }
        Err(e) => {
            error!(job = %name, error = %e, "Interval job could not be started");
        }
    }
}
