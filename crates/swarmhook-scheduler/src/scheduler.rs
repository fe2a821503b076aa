//! Interval scheduler handle.

use crate::worker::{Shared, Worker};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use swarmhook_core::{CommandRunner, Error, IntervalJob, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info};

/// Runs interval jobs in the background until stopped.
///
/// Each job is first due one `period` after [`start`](Self::start) and is
/// re-armed for `now + period` after every run, whether or not the run
/// succeeded. Among firings due at the same instant the lower `priority`
/// value runs first.
///
/// Stopping is permanent: a stopped scheduler cannot be started again.
pub struct IntervalScheduler {
    runner: Arc<dyn CommandRunner>,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl IntervalScheduler {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            shared: Arc::new(Shared::default()),
            worker: Mutex::new(None),
        }
    }

    /// Arm every job and spawn the worker task.
    pub async fn start(&self, jobs: Vec<IntervalJob>) -> Result<()> {
        let mut worker = self.worker.lock().await;
        if self.shared.is_stopped() {
            return Err(Error::Conflict("scheduler has been stopped".to_string()));
        }
        if worker.is_some() {
            return Err(Error::Conflict("scheduler already started".to_string()));
        }

        let count = jobs.len();
        {
            let now = Instant::now();
            let mut queue = self.shared.queue.lock().await;
            for job in jobs {
                let Some(due) = now.checked_add(job.period) else {
                    error!(
                        job = %job.name(),
                        period = ?job.period,
                        "Interval period out of range, job not armed"
                    );
                    continue;
                };
                info!(
                    job = %job.name(),
                    period = ?job.period,
                    priority = job.priority,
                    "Arming interval job"
                );
                queue.push(due, Arc::new(job));
            }
        }

        info!(jobs = count, "Starting interval scheduler");
        let task = Worker::new(self.shared.clone(), self.runner.clone());
        *worker = Some(tokio::spawn(task.run()));
        Ok(())
    }

    /// Stop the scheduler.
    ///
    /// Cancels every pending firing and waits for the worker to exit. A job
    /// that is already running is allowed to finish; once this returns no
    /// further job will start. Calling it again is a no-op.
    pub async fn stop(&self) {
        self.shared.stopped.store(true, Ordering::SeqCst);

        let cancelled = self.shared.queue.lock().await.clear();
        self.shared.wake.notify_one();
        info!(cancelled, "Stopping interval scheduler");

        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = %e, "Interval worker did not exit cleanly");
            }
        }
    }

    /// Number of firings currently waiting in the queue.
    pub async fn pending(&self) -> usize {
        self.shared.queue.lock().await.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.is_stopped()
    }
}
