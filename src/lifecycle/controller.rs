//! Two-phase service shutdown.
//!
//! # Responsibilities
//! - Own every background task handle the service spawns
//! - Drain in-flight sessions, bounded by a deadline
//! - Cancel all outstanding work and stop the host
//!
//! # Design Decisions
//! - First shutdown request drains; a second request while draining
//!   escalates to forced termination (operator escape hatch)
//! - Cancellation is delivered twice over: a broadcast for cooperative
//!   loops, then `abort()` so a task stuck mid-await in a backend call
//!   still dies

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::session::SessionRegistry;

/// Host lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Event loop active, signal handlers armed.
    Running,
    /// Draining in-flight sessions before termination.
    GracefulDraining,
    /// Cancelling outstanding work.
    Terminating,
    /// Event loop exited; no further operations accepted.
    Stopped,
}

/// Coordinator for the host process lifecycle.
///
/// Cloning shares the underlying controller.
#[derive(Clone)]
pub struct LifecycleController {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<LifecycleState>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    cancel_tx: broadcast::Sender<()>,
    stop_tx: watch::Sender<bool>,
    sessions: SessionRegistry,
    drain_deadline: Duration,
}

impl LifecycleController {
    /// Create a controller draining `sessions` for at most `drain_deadline`
    /// on graceful shutdown.
    pub fn new(sessions: SessionRegistry, drain_deadline: Duration) -> Self {
        let (cancel_tx, _) = broadcast::channel(1);
        let (stop_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(LifecycleState::Running),
                tasks: Mutex::new(Vec::new()),
                cancel_tx,
                stop_tx,
                sessions,
                drain_deadline,
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.inner.state.lock().unwrap()
    }

    /// The session registry this controller drains.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }

    /// Subscribe to the cooperative cancel signal, fired on termination.
    pub fn subscribe_cancel(&self) -> broadcast::Receiver<()> {
        self.inner.cancel_tx.subscribe()
    }

    /// Take ownership of a background task handle.
    ///
    /// Registered tasks are cancelled during termination. Registration
    /// after the controller has stopped aborts the handle immediately.
    pub fn register_task(&self, handle: JoinHandle<()>) {
        if self.state() == LifecycleState::Stopped {
            tracing::warn!("Task registered after shutdown, aborting it");
            handle.abort();
            return;
        }
        self.inner.tasks.lock().unwrap().push(handle);
    }

    /// Initiate shutdown.
    ///
    /// The first call starts a graceful drain of in-flight sessions,
    /// bounded by the configured deadline. A second call while the drain is
    /// pending escalates straight to forced termination.
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock().unwrap();
        match *state {
            LifecycleState::Running => {
                *state = LifecycleState::GracefulDraining;
                drop(state);
                tracing::info!(
                    active_sessions = self.inner.sessions.active_count(),
                    deadline_secs = self.inner.drain_deadline.as_secs(),
                    "Shutdown requested, draining sessions"
                );
                let controller = self.clone();
                let drain = tokio::spawn(async move { controller.drain_then_terminate().await });
                self.register_task(drain);
            }
            LifecycleState::GracefulDraining => {
                drop(state);
                tracing::warn!("Repeated shutdown request, forcing termination");
                self.terminate();
            }
            LifecycleState::Terminating | LifecycleState::Stopped => {}
        }
    }

    /// Wait for the session registry to drain, then terminate. Exceeding
    /// the deadline is logged but never blocks termination.
    async fn drain_then_terminate(&self) {
        if timeout(self.inner.drain_deadline, self.inner.sessions.drained())
            .await
            .is_err()
        {
            tracing::error!(
                active_sessions = self.inner.sessions.active_count(),
                "Timeout waiting for sessions, shutting down anyway"
            );
        }
        self.terminate();
    }

    /// Cancel all outstanding work and stop the run loop. Idempotent.
    pub fn terminate(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            if matches!(
                *state,
                LifecycleState::Terminating | LifecycleState::Stopped
            ) {
                return;
            }
            *state = LifecycleState::Terminating;
        }
        tracing::info!("Terminating");
        // No receivers just means nothing registered a cooperative loop.
        let _ = self.inner.cancel_tx.send(());
        self.inner.stop_tx.send_replace(true);
    }

    /// Run the host until termination, then cancel every owned task.
    ///
    /// Cleanup runs once: all registered handles are aborted (abort
    /// propagates through nested suspensions, so a task mid-await in a
    /// backend call is cancelled too) and awaited before the state becomes
    /// [`LifecycleState::Stopped`].
    pub async fn run(&self) {
        let mut stop_rx = self.inner.stop_tx.subscribe();
        // wait_for errs only when the sender is dropped; we hold it.
        let _ = stop_rx.wait_for(|stopped| *stopped).await;

        let tasks = std::mem::take(&mut *self.inner.tasks.lock().unwrap());
        tracing::info!(tasks = tasks.len(), "Cancelling outstanding tasks");
        for task in &tasks {
            task.abort();
        }
        for task in tasks {
            match task.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::warn!(error = %e, "Background task failed during shutdown"),
            }
        }

        *self.inner.state.lock().unwrap() = LifecycleState::Stopped;
        tracing::info!("Shutdown complete");
    }
}
