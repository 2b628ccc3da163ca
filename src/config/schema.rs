//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Device directory settings.
    pub directory: DirectoryConfig,

    /// Runtime/executor settings.
    pub runtime: RuntimeConfig,

    /// Shutdown behaviour.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Device directory settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Path to the JSON device inventory file.
    pub device_file: String,

    /// Bulk refresh interval in seconds.
    pub update_interval_secs: u64,

    /// Optional regex restricting the directory to matching device names.
    pub name_filter: Option<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            device_file: "devices.json".to_string(),
            update_interval_secs: 30 * 60,
            name_filter: None,
        }
    }
}

/// Runtime/executor settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum worker threads for offloading blocking calls.
    pub max_blocking_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_blocking_threads: 8,
        }
    }
}

/// Shutdown behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Maximum seconds to wait for in-flight sessions to drain before
    /// termination is forced.
    pub exit_max_wait_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            exit_max_wait_secs: 30,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.directory.update_interval_secs, 1800);
        assert_eq!(config.directory.device_file, "devices.json");
        assert!(config.directory.name_filter.is_none());
        assert_eq!(config.shutdown.exit_max_wait_secs, 30);
        assert_eq!(config.runtime.max_blocking_threads, 8);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.directory.update_interval_secs, 1800);

        let config: GatewayConfig = toml::from_str(
            r#"
            [directory]
            update_interval_secs = 60
            name_filter = "^rsw"
            "#,
        )
        .unwrap();
        assert_eq!(config.directory.update_interval_secs, 60);
        assert_eq!(config.directory.name_filter.as_deref(), Some("^rsw"));
        assert_eq!(config.shutdown.exit_max_wait_secs, 30);
    }
}
