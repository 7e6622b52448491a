//! Configuration system error types.
//!
//! Domain-specific errors for loading, parsing, validating and persisting
//! commit gate settings.

use thiserror::Error;

use crate::settings::SettingField;
use crate::validator::ValidationError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Configuration system errors.
///
/// Resolution of effective settings never produces these; they come from
/// pattern compilation, the settings store, and save-time validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Invalid regular expression in {field}: '{pattern}' - {reason}")]
    InvalidPattern {
        field: SettingField,
        pattern: String,
        reason: String,
    },

    #[error("Invalid repository identifier: {field} - {reason}")]
    InvalidRepository { field: String, reason: String },

    #[error("Failed to access settings file: {path} - {reason}")]
    FileAccessError { path: String, reason: String },

    #[error("Failed to parse settings: {reason}")]
    ParseError { reason: String },

    #[error("Settings store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("Settings validation failed with {error_count} error(s)")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<ValidationError>,
    },
}

impl ConfigurationError {
    /// The settings field this error is about, when there is one.
    pub fn field(&self) -> Option<SettingField> {
        match self {
            ConfigurationError::InvalidPattern { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
