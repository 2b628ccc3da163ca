//! Command session tracking.
//!
//! The RPC machinery that opens and drives sessions lives outside this
//! crate; the registry only answers "how many sessions are in flight" and
//! "wake me when that reaches zero", which is all graceful shutdown needs.

pub mod registry;

pub use registry::{SessionGuard, SessionRegistry};
