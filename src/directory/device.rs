//! Device records and directory error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directory::source::SourceError;

/// A network device known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Canonical device name, unique within the backend inventory.
    pub name: String,

    /// Optional short alias the device is also reachable under.
    #[serde(default)]
    pub alias: Option<String>,

    /// Management address used to reach the device.
    pub address: String,

    /// Vendor identifier, used to select a command dialect.
    #[serde(default)]
    pub vendor: Option<String>,
}

impl Device {
    /// Return true if `name` is this device's canonical name or alias.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.alias.as_deref() == Some(name)
    }
}

/// Errors surfaced by directory lookups.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The device is known to neither the cache nor the backend.
    #[error("device not found: {0}")]
    NotFound(String),

    /// The backend source failed while fetching device records.
    #[error("device source error: {0}")]
    Source(#[from] SourceError),
}
