//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and cross-field requirements
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the config
//! - Runs before the config is accepted into the system

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::observability::logging::parse_level;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The bulk refresh interval would disable refreshing entirely.
    #[error("directory.update_interval_secs must be greater than zero")]
    ZeroUpdateInterval,

    /// The device name filter does not compile.
    #[error("directory.name_filter is not a valid regex: {0}")]
    InvalidNameFilter(String),

    /// The blocking pool would have no threads.
    #[error("runtime.max_blocking_threads must be greater than zero")]
    ZeroBlockingThreads,

    /// The log level name is not recognized.
    #[error("observability.log_level '{0}' is not a recognized level")]
    InvalidLogLevel(String),

    /// The metrics address does not parse while metrics are enabled.
    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Check the semantic rules serde cannot express.
///
/// Returns every violation found, not just the first.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.directory.update_interval_secs == 0 {
        errors.push(ValidationError::ZeroUpdateInterval);
    }

    if let Some(pattern) = &config.directory.name_filter {
        if let Err(e) = regex::Regex::new(pattern) {
            errors.push(ValidationError::InvalidNameFilter(e.to_string()));
        }
    }

    if config.runtime.max_blocking_threads == 0 {
        errors.push(ValidationError::ZeroBlockingThreads);
    }

    if parse_level(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_all_violations_are_reported() {
        let mut config = GatewayConfig::default();
        config.directory.update_interval_secs = 0;
        config.directory.name_filter = Some("[unclosed".to_string());
        config.runtime.max_blocking_threads = 0;
        config.observability.log_level = "verbose".to_string();
        config.observability.metrics_address = "not-an-addr".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroUpdateInterval));
        assert!(errors.contains(&ValidationError::ZeroBlockingThreads));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidNameFilter(_))));
        assert!(errors.contains(&ValidationError::InvalidLogLevel("verbose".to_string())));
    }

    #[test]
    fn test_metrics_address_is_ignored_when_disabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "not-an-addr".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
