//! Alias-aware device directory cache.
//!
//! # Responsibilities
//! - Mirror the backend inventory into an in-memory index
//! - Serve lookups by canonical name or alias
//! - Fetch single devices on demand when a lookup misses
//!
//! # Design Decisions
//! - Bulk refresh and point fetch merge through the same path; the last
//!   merge to complete for a given name wins (eventually consistent mirror)
//! - Readiness opens after the first successful bulk refresh and is never
//!   revoked by later failures

use dashmap::DashMap;

use crate::directory::device::{Device, DirectoryError};
use crate::directory::periodic::{PeriodicJob, ReadyGate};
use crate::directory::source::{DeviceSource, NameFilter, SourceError};
use crate::observability::metrics;

/// In-memory index of devices, keyed by canonical name and alias.
///
/// The index is a monotonically enriched mirror: refreshes add and
/// overwrite entries, nothing evicts them. A stale entry persists until a
/// later refresh reintroduces the same name.
pub struct DeviceDirectory<S: DeviceSource> {
    source: S,
    filter: Option<NameFilter>,
    index: DashMap<String, Device>,
    ready: ReadyGate,
}

impl<S: DeviceSource> DeviceDirectory<S> {
    /// Create an empty directory over `source`, restricted to names
    /// matching `filter` during bulk refreshes.
    pub fn new(source: S, filter: Option<NameFilter>) -> Self {
        Self {
            source,
            filter,
            index: DashMap::new(),
            ready: ReadyGate::new(),
        }
    }

    /// Number of names currently indexed (aliases count separately).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Return true if no refresh has populated the index yet.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Return true once the first bulk refresh has completed.
    pub fn is_ready(&self) -> bool {
        self.ready.is_ready()
    }

    /// Suspend until the first bulk refresh completes.
    pub async fn wait_for_ready(&self) {
        self.ready.wait("device data").await;
    }

    /// Look up a device by canonical name or alias.
    ///
    /// On a miss with `autofetch` set, a single-device fetch runs against
    /// the backend (bypassing the bulk schedule) and its result is merged
    /// before the lookup is retried. Backend errors on that path propagate
    /// to the caller; a device unknown to the backend, or a miss with
    /// `autofetch` unset, is [`DirectoryError::NotFound`].
    pub async fn get(&self, name: &str, autofetch: bool) -> Result<Device, DirectoryError> {
        if let Some(device) = self.index.get(name) {
            return Ok(device.value().clone());
        }

        if autofetch {
            tracing::debug!(device = name, "Cache miss, fetching from backend");
            metrics::record_point_fetch();
            let devices = self.source.fetch(None, Some(name)).await?;
            for device in devices {
                self.merge_for(name, device);
            }
            metrics::record_index_size(self.index.len());

            if let Some(device) = self.index.get(name) {
                return Ok(device.value().clone());
            }
        }

        metrics::record_lookup_miss();
        Err(DirectoryError::NotFound(name.to_string()))
    }

    /// Fetch the full (filtered) inventory and merge it into the index.
    pub async fn refresh(&self) -> Result<(), SourceError> {
        let devices = self.source.fetch(self.filter.as_ref(), None).await?;
        let fetched = devices.len();
        for device in devices {
            self.merge(device);
        }
        metrics::record_index_size(self.index.len());
        tracing::debug!(
            fetched,
            indexed = self.index.len(),
            "Bulk refresh merged"
        );
        Ok(())
    }

    /// Index a device under its canonical name and alias.
    fn merge(&self, device: Device) {
        if let Some(alias) = device.alias.clone() {
            self.index.insert(alias, device.clone());
        }
        self.index.insert(device.name.clone(), device);
    }

    /// Merge a point-fetched device, additionally indexing it under the
    /// requested name when the backend returned it under different names
    /// (e.g. a lookup by an alias the backend only resolves canonically).
    fn merge_for(&self, requested: &str, device: Device) {
        if !device.answers_to(requested) {
            self.index.insert(requested.to_string(), device.clone());
        }
        self.merge(device);
    }
}

impl<S: DeviceSource> PeriodicJob for DeviceDirectory<S> {
    fn name(&self) -> &str {
        "device-directory"
    }

    /// One scheduled cycle: bulk refresh, then open the ready gate.
    async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.refresh().await?;
        metrics::record_refresh();
        self.ready.open();
        Ok(())
    }
}
