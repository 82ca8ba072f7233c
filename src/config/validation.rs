//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (status codes, log levels)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatchConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::DispatchConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("normalizer.container_separator must not be empty")]
    EmptySeparator,

    #[error("{field} = {code} is not a valid HTTP status code")]
    InvalidStatusCode { field: &'static str, code: u16 },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

pub fn validate_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.normalizer.container_separator.is_empty() {
        errors.push(ValidationError::EmptySeparator);
    }

    let codes = [
        ("response.default_success_code", config.response.default_success_code),
        ("response.default_failure_code", config.response.default_failure_code),
    ];
    for (field, code) in codes {
        if !(100..=599).contains(&code) {
            errors.push(ValidationError::InvalidStatusCode { field, code });
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
