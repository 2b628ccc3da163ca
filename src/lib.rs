//! Device Command Gateway Library
//!
//! Core of a long-running service that executes operator commands against
//! network devices. This crate provides the device directory (a periodically
//! refreshed, alias-aware lookup cache over an external inventory) and the
//! lifecycle controller that hosts, signals, and tears down the service's
//! background work.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌───────────────────────────────────────────────┐
//!                 │               COMMAND GATEWAY                 │
//!                 │                                               │
//!  inventory ─────┼─▶ DeviceSource ──▶ PeriodicTask ──▶ Device    │
//!  backend        │   (fetch seam)     (bulk refresh)   Directory │
//!                 │                         ▲              │      │
//!  lookup ────────┼─────────────────────────┼──────────────┘      │
//!  (miss → point fetch)                     │ cancel              │
//!                 │                         │                     │
//!  SIGINT/SIGTERM ┼─▶ LifecycleController ──┘                     │
//!                 │   (drain sessions, then terminate)            │
//!                 │         │                                     │
//!                 │         ▼                                     │
//!                 │   SessionRegistry (in-flight sessions)        │
//!                 └───────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod directory;
pub mod session;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use directory::{Device, DeviceDirectory, DeviceSource};
pub use lifecycle::LifecycleController;
pub use session::SessionRegistry;
