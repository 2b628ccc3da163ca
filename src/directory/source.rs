//! Device source abstraction.
//!
//! # Responsibilities
//! - Define the single seam to the backend device inventory
//! - Compile and apply the configured device-name filter
//! - Provide a JSON-file-backed source for simple deployments

use std::future::Future;
use std::path::PathBuf;

use regex::Regex;
use thiserror::Error;

use crate::directory::device::Device;

/// Compiled device-name filter.
#[derive(Debug, Clone)]
pub struct NameFilter(Regex);

impl NameFilter {
    /// Compile a filter from the configured regex pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// Return true if the device name matches the filter.
    pub fn matches(&self, name: &str) -> bool {
        self.0.is_match(name)
    }
}

/// Errors raised by a device source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the inventory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The inventory content could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Backend inventory of devices.
///
/// This is the one contract a concrete deployment must implement. The bulk
/// refresh path calls [`fetch`](DeviceSource::fetch) with a filter and no
/// target; the point-fetch path calls it with a target name and no filter.
/// Implementations must be idempotent and safe to call concurrently with an
/// in-flight bulk fetch.
pub trait DeviceSource: Send + Sync + 'static {
    /// Fetch device records from the backend.
    ///
    /// With `target` set, return the records answering to that name. With
    /// `filter` set, restrict the result to matching canonical names. With
    /// neither, return the full inventory.
    fn fetch(
        &self,
        filter: Option<&NameFilter>,
        target: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Device>, SourceError>> + Send;
}

/// Device source backed by a JSON inventory file.
///
/// The file holds an array of [`Device`] records. Reads go through the
/// blocking pool so a large inventory does not stall the event loop.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DeviceSource for JsonFileSource {
    async fn fetch(
        &self,
        filter: Option<&NameFilter>,
        target: Option<&str>,
    ) -> Result<Vec<Device>, SourceError> {
        let path = self.path.clone();
        let devices = tokio::task::spawn_blocking(move || -> Result<Vec<Device>, SourceError> {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&content)?)
        })
        .await
        .map_err(|e| SourceError::Backend(format!("inventory read task failed: {}", e)))??;

        Ok(devices
            .into_iter()
            .filter(|d| match target {
                Some(name) => d.answers_to(name),
                None => filter.is_none_or(|f| f.matches(&d.name)),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_inventory(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const INVENTORY: &str = r#"[
        {"name": "rsw001.p001", "alias": "rsw001", "address": "10.0.0.1"},
        {"name": "rsw002.p001", "alias": "rsw002", "address": "10.0.0.2"},
        {"name": "fsw100.p002", "address": "10.0.1.1", "vendor": "acme"}
    ]"#;

    #[tokio::test]
    async fn test_fetch_full_inventory() {
        let file = write_inventory(INVENTORY);
        let source = JsonFileSource::new(file.path());

        let devices = source.fetch(None, None).await.unwrap();
        assert_eq!(devices.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_with_filter() {
        let file = write_inventory(INVENTORY);
        let source = JsonFileSource::new(file.path());
        let filter = NameFilter::new(r"^rsw").unwrap();

        let devices = source.fetch(Some(&filter), None).await.unwrap();
        assert_eq!(devices.len(), 2);
        assert!(devices.iter().all(|d| d.name.starts_with("rsw")));
    }

    #[tokio::test]
    async fn test_fetch_by_target_name_or_alias() {
        let file = write_inventory(INVENTORY);
        let source = JsonFileSource::new(file.path());

        let devices = source.fetch(None, Some("rsw002")).await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "rsw002.p001");

        let devices = source.fetch(None, Some("fsw100.p002")).await.unwrap();
        assert_eq!(devices.len(), 1);

        let devices = source.fetch(None, Some("unknown")).await.unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = JsonFileSource::new("/nonexistent/devices.json");
        let err = source.fetch(None, None).await.unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let file = write_inventory("{not json");
        let source = JsonFileSource::new(file.path());
        let err = source.fetch(None, None).await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
