//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Returns every problem
//! found, not just the first, so a bad config can be fixed in one pass.

use thiserror::Error;

use crate::config::schema::WafConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a config.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("inspection.include[{index}] is empty")]
    EmptyIncludeEntry { index: usize },

    #[error("observability.log_level {value:?} is not one of trace/debug/info/warn/error")]
    InvalidLogLevel { value: String },
}

/// Validate a config, collecting every error.
pub fn validate_config(config: &WafConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, entry) in config.inspection.include.iter().enumerate() {
        if entry.trim().is_empty() {
            errors.push(ValidationError::EmptyIncludeEntry { index });
        }
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel {
            value: config.observability.log_level.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
