// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are present and within their allowed sets.

use crate::{ConfigError, ConfigResult, GrayMatterConfig};

const SCHEDULER_MODES: &[&str] = &["sequential", "parallel"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
/// One century
const MAX_RETENTION_DAYS: u64 = 36_500;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
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
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &GrayMatterConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_value_ranges(config, &mut errors);

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

fn validate_required_fields(config: &GrayMatterConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.genome.path.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "genome.path".to_string(),
        });
    }
    if config.logging.file_logging && config.logging.log_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "logging.log_dir".to_string(),
        });
    }
}

fn validate_value_ranges(config: &GrayMatterConfig, errors: &mut Vec<ConfigValidationError>) {
    if !SCHEDULER_MODES.contains(&config.scheduler.mode.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "scheduler.mode".to_string(),
            reason: "must be 'sequential' or 'parallel'".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }

    if config.logging.file_logging && config.logging.retention_days == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.retention_days".to_string(),
            reason: "must be positive when file logging is enabled".to_string(),
        });
    }
    if config.logging.retention_days > MAX_RETENTION_DAYS {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.retention_days".to_string(),
            reason: format!("must be at most {}", MAX_RETENTION_DAYS),
        });
    }
}
