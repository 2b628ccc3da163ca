//! In-flight session registry.
//!
//! # Responsibilities
//! - Count sessions via RAII guards
//! - Expose the active count for draining
//! - Notify waiters when the count reaches zero

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::observability::metrics;

/// Registry of in-flight command sessions.
///
/// Cloning shares the underlying counter.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    active: Arc<watch::Sender<usize>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            active: Arc::new(tx),
        }
    }

    /// Open a session. The returned guard keeps it counted until dropped.
    pub fn open(&self) -> SessionGuard {
        let id = Uuid::new_v4();
        self.active.send_modify(|n| *n += 1);
        metrics::record_active_sessions(self.active_count());
        tracing::debug!(session_id = %id, active = self.active_count(), "Session opened");
        SessionGuard {
            id,
            active: self.active.clone(),
        }
    }

    /// Number of sessions currently in flight.
    pub fn active_count(&self) -> usize {
        *self.active.borrow()
    }

    /// Suspend until every open session has been dropped.
    pub async fn drained(&self) {
        let mut rx = self.active.subscribe();
        // wait_for errs only when the sender is dropped; we hold it.
        let _ = rx.wait_for(|active| *active == 0).await;
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle for one in-flight session.
#[derive(Debug)]
pub struct SessionGuard {
    id: Uuid,
    active: Arc<watch::Sender<usize>>,
}

impl SessionGuard {
    /// The session's id, for correlation in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.active.send_modify(|n| *n = n.saturating_sub(1));
        metrics::record_active_sessions(*self.active.borrow());
        tracing::debug!(session_id = %self.id, "Session closed");
    }
}
