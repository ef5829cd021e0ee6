//! Configuration validation
//!
//! This module checks that configuration values are within valid ranges and
//! consistent with each other. Broker URL scheme checks belong to the agent
//! crate, which refuses to start with an unusable endpoint.

use crate::{ConfigError, ConfigResult, SwitchboardConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// All problems are collected and reported together.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &SwitchboardConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn collect_errors(config: &SwitchboardConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if config.broker.url.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "broker.url".to_string(),
        });
    }

    if config.broker.request_timeout_ms == 0 {
        errors.push(invalid("broker.request_timeout_ms", "must be greater than 0"));
    }
    if config.broker.shutdown_timeout_ms == 0 {
        errors.push(invalid("broker.shutdown_timeout_ms", "must be greater than 0"));
    }
    if config.broker.shutdown_timeout_ms > config.broker.request_timeout_ms {
        errors.push(invalid(
            "broker.shutdown_timeout_ms",
            "must not exceed broker.request_timeout_ms",
        ));
    }

    if config.presence.heartbeat_interval_ms == 0 {
        errors.push(invalid("presence.heartbeat_interval_ms", "must be greater than 0"));
    }

    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(invalid(
            "logging.level",
            &format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        ));
    }
    let format = config.logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(invalid(
            "logging.format",
            &format!("'{}' is not one of {}", config.logging.format, LOG_FORMATS.join(", ")),
        ));
    }

    errors
}

fn invalid(field: &str, reason: &str) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
