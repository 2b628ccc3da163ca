//! Structured logging setup.
//!
//! # Responsibilities
//! - Validate the configured log verbosity name
//! - Install the global tracing subscriber

use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Raised when the configured verbosity is not a recognized level name.
#[derive(Debug, Error)]
#[error("invalid log level: {0}")]
pub struct InvalidLogLevel(pub String);

/// Parse a configured level name ("trace" through "error", any case).
pub fn parse_level(name: &str) -> Result<Level, InvalidLogLevel> {
    Level::from_str(name).map_err(|_| InvalidLogLevel(name.to_string()))
}

/// Validate `level_name` and install the global subscriber.
///
/// An unrecognized level name is a configuration error and aborts startup.
/// `RUST_LOG` overrides the configured level when set.
pub fn init(level_name: &str) -> Result<(), InvalidLogLevel> {
    let level = parse_level(level_name)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("command_gateway={}", level))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_accepts_standard_names() {
        assert_eq!(parse_level("info").unwrap(), Level::INFO);
        assert_eq!(parse_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_level("Warn").unwrap(), Level::WARN);
    }

    #[test]
    fn test_parse_level_rejects_unknown_names() {
        let err = parse_level("verbose").unwrap_err();
        assert_eq!(err.to_string(), "invalid log level: verbose");
    }
}
