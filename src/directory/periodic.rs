//! Periodic background tasks.
//!
//! # Responsibilities
//! - Run a unit of work on a fixed interval until cancelled
//! - Survive work failures (log, record, retry on the next tick)
//! - Expose a readiness gate consumers can await

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time;

use crate::observability::metrics;

/// How often a blocked [`ReadyGate::wait`] re-logs its diagnostic.
const WAIT_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// A unit of work scheduled by [`PeriodicTask`].
pub trait PeriodicJob: Send + Sync + 'static {
    /// Name used in logs and metrics.
    fn name(&self) -> &str;

    /// Execute one cycle of work.
    fn run(
        &self,
    ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send;
}

impl<T: PeriodicJob> PeriodicJob for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(
        &self,
    ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send {
        (**self).run()
    }
}

/// Gate that opens once the first cycle of work completes successfully.
///
/// Opening is one-way: a later failed cycle does not close the gate again.
#[derive(Debug, Clone)]
pub struct ReadyGate {
    tx: watch::Sender<bool>,
}

impl ReadyGate {
    /// Create a closed gate.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Return true if the gate has opened.
    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Open the gate, waking every waiter. Idempotent.
    pub fn open(&self) {
        self.tx.send_replace(true);
    }

    /// Suspend until the gate opens, logging while waiting so a stuck
    /// startup is diagnosable. `what` names the awaited data in the logs.
    pub async fn wait(&self, what: &str) {
        let mut rx = self.tx.subscribe();
        if *rx.borrow_and_update() {
            return;
        }
        loop {
            match time::timeout(WAIT_LOG_INTERVAL, rx.changed()).await {
                Ok(Ok(())) => {
                    if *rx.borrow_and_update() {
                        break;
                    }
                }
                // The gate was dropped; nothing will ever open it.
                Ok(Err(_)) => break,
                Err(_) => tracing::info!(waiting_for = what, "Waiting for data"),
            }
        }
        tracing::info!(waiting_for = what, "Data ready");
    }
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Interval driver around a [`PeriodicJob`].
///
/// Each iteration runs the job, then sleeps for `period`, until the cancel
/// broadcast fires. The sleep is interruptible: cancellation is observed
/// within one tick even mid-sleep. Job failures never stop the loop.
pub struct PeriodicTask<J: PeriodicJob> {
    job: J,
    period: Duration,
    running: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl<J: PeriodicJob> PeriodicTask<J> {
    /// Create a task running `job` every `period`.
    pub fn new(job: J, period: Duration) -> Self {
        Self {
            job,
            period,
            running: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    /// The scheduled job.
    pub fn job(&self) -> &J {
        &self.job
    }

    /// Return true while the loop is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// The error message from the most recent cycle, if it failed.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    /// Run the loop until `cancel` fires.
    pub async fn run(&self, mut cancel: broadcast::Receiver<()>) {
        self.running.store(true, Ordering::Relaxed);
        tracing::info!(
            task = self.job.name(),
            period_secs = self.period.as_secs(),
            "Periodic task starting"
        );

        loop {
            match self.job.run().await {
                Ok(()) => {
                    *self.last_error.lock().unwrap() = None;
                }
                Err(e) => {
                    tracing::error!(task = self.job.name(), error = %e, "Periodic task cycle failed");
                    metrics::record_task_failure(self.job.name());
                    *self.last_error.lock().unwrap() = Some(e.to_string());
                }
            }

            tokio::select! {
                _ = time::sleep(self.period) => {}
                _ = cancel.recv() => {
                    tracing::info!(task = self.job.name(), "Periodic task received cancel signal, exiting loop");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::Relaxed);
    }
}
