//! Device directory subsystem.
//!
//! # Data Flow
//! ```text
//! DeviceSource (backend inventory)
//!     → PeriodicTask (bulk refresh every update_interval)
//!     → DeviceDirectory index (name/alias → Device)
//!     → get(name) lookups, with point fetch on miss
//! ```
//!
//! # Design Decisions
//! - The index is a monotonically enriched mirror: entries are overwritten
//!   by later refreshes, never evicted
//! - A failed bulk refresh keeps serving the previous snapshot
//! - A cache miss triggers a single-device fetch instead of waiting out the
//!   next bulk cycle (point fetch is cheap relative to a full pull)

pub mod cache;
pub mod device;
pub mod periodic;
pub mod source;

pub use cache::DeviceDirectory;
pub use device::{Device, DirectoryError};
pub use periodic::{PeriodicJob, PeriodicTask, ReadyGate};
pub use source::{DeviceSource, JsonFileSource, NameFilter, SourceError};
