//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Build runtime → Wire subsystems → run()
//!
//! Shutdown (controller.rs):
//!     Signal received → Drain sessions (bounded) → Cancel tasks → Exit
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → controller.shutdown()
//!     Second signal while draining → forced termination
//! ```
//!
//! # Design Decisions
//! - The controller owns an explicit collection of task handles and
//!   cancels exactly that collection, not an ambient global registry
//! - Draining is a courtesy, not a guarantee: the deadline always leads
//!   to termination

pub mod controller;
pub mod signals;

pub use controller::{LifecycleController, LifecycleState};

/// Build the service runtime: a single-threaded event loop with a bounded
/// pool for offloading blocking calls.
pub fn build_runtime(max_blocking_threads: usize) -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .max_blocking_threads(max_blocking_threads)
        .build()
}
