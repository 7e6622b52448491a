//! Save-time validation of settings.
//!
//! Administrators must not be able to store a configuration the gate cannot
//! apply. Before settings are persisted, every pattern field is compiled, the
//! JQL filter is checked with the tracker, and (globally) the tracker override
//! user is looked up. Each problem becomes a [`ValidationError`] tagged with
//! the field id shown next to the offending form input.
//!
//! # Examples
//!
//! ```rust
//! use config_manager::{SettingField, ValidationError, ValidationResult};
//!
//! let mut result = ValidationResult::new();
//! assert!(result.is_valid());
//!
//! result.add_error(ValidationError::new(
//!     SettingField::CommitMessageRegex,
//!     "unclosed group",
//! ));
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.field_ids(), vec!["commitMessageRegex"]);
//! ```

use std::sync::Arc;

use issue_tracker::{IssueTracker, TrackerError};
use tracing::{debug, warn};

use crate::errors::ConfigurationError;
use crate::pattern::PatternMatcher;
use crate::settings::{GlobalSettings, HookSettings, SettingField, SettingValue};

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Result of settings validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Validation passed when no errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Field ids with at least one error, in the order they were reported.
    pub fn field_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = Vec::new();
        for error in &self.errors {
            let id = error.field.key();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Turn a failed result into a `ValidationFailed` error.
    pub fn into_result(self) -> Result<(), ConfigurationError> {
        if self.is_valid() {
            return Ok(());
        }

        Err(ConfigurationError::ValidationFailed {
            error_count: self.errors.len(),
            errors: self.errors,
        })
    }
}

/// A problem with one settings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field the problem is reported against.
    pub field: SettingField,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: SettingField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validates settings before they are saved.
pub struct SettingsValidator {
    tracker: Arc<dyn IssueTracker>,
    patterns: PatternMatcher,
}

impl SettingsValidator {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self {
            tracker,
            patterns: PatternMatcher::new(),
        }
    }

    /// Validate settings submitted for a repository.
    pub async fn validate_repository(&self, settings: &HookSettings) -> ValidationResult {
        let mut result = ValidationResult::new();
        self.validate_patterns(settings, &mut result);
        self.validate_jql(settings, &mut result).await;

        debug!(
            error_count = result.errors.len(),
            "Validated repository settings"
        );
        result
    }

    /// Validate settings submitted for the global scope.
    ///
    /// Verifies the tracker override user, then runs the repository checks.
    pub async fn validate_global(&self, settings: &GlobalSettings) -> ValidationResult {
        let mut result = ValidationResult::new();
        self.validate_override_user(settings, &mut result).await;
        self.validate_patterns(&settings.hook, &mut result);
        self.validate_jql(&settings.hook, &mut result).await;

        debug!(error_count = result.errors.len(), "Validated global settings");
        result
    }

    fn validate_patterns(&self, settings: &HookSettings, result: &mut ValidationResult) {
        for field in SettingField::PATTERN_FIELDS {
            let pattern = match settings.get(field) {
                Some(SettingValue::Text(pattern)) => pattern,
                _ => continue,
            };

            if let Err(e) = self.patterns.compile(field, &pattern) {
                let reason = match e {
                    ConfigurationError::InvalidPattern { reason, .. } => reason,
                    other => other.to_string(),
                };
                result.add_error(ValidationError::new(
                    field,
                    format!("Invalid regular expression: {}", reason),
                ));
            }
        }
    }

    async fn validate_jql(&self, settings: &HookSettings, result: &mut ValidationResult) {
        let Some(jql) = settings
            .issue_jql_filter
            .as_deref()
            .filter(|jql| !jql.trim().is_empty())
        else {
            return;
        };

        match self.tracker.validate_jql(jql).await {
            Ok(()) => {}
            Err(TrackerError::InvalidJql { reason, .. }) => {
                result.add_error(ValidationError::new(
                    SettingField::IssueJqlFilter,
                    format!("Invalid JQL query: {}", reason),
                ));
            }
            Err(e) => {
                warn!(error = %e, "Could not verify JQL filter");
                result.add_error(ValidationError::new(
                    SettingField::IssueJqlFilter,
                    format!("Unable to verify JQL query: {}", e),
                ));
            }
        }
    }

    async fn validate_override_user(&self, settings: &GlobalSettings, result: &mut ValidationResult) {
        let enabled = settings.override_jira_user_enabled.unwrap_or(false);
        let user = settings
            .override_jira_user_text
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        let user = match (enabled, user) {
            (_, Some(user)) => user,
            (true, None) => {
                result.add_error(ValidationError::new(
                    SettingField::OverrideJiraUser,
                    "A user name is required when the override user is enabled",
                ));
                return;
            }
            (false, None) => return,
        };

        match self.tracker.user_exists(user).await {
            Ok(true) => {}
            Ok(false) => result.add_error(ValidationError::new(
                SettingField::OverrideJiraUser,
                format!("User '{}' does not exist in the issue tracker", user),
            )),
            Err(e) => {
                warn!(user = user, error = %e, "Could not verify override user");
                result.add_error(ValidationError::new(
                    SettingField::OverrideJiraUser,
                    format!("Unable to verify user '{}': {}", user, e),
                ));
            }
        }
    }
}
