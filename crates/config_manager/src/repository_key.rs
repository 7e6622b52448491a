//! Repository identifiers.
//!
//! Repositories are addressed by the project they live in and their slug, the
//! same way the hosting server lays them out on disk.

use crate::{ConfigurationError, ConfigurationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "repository_key_tests.rs"]
mod tests;

const MAX_COMPONENT_LEN: usize = 128;

/// A validated `PROJECT/slug` pair.
///
/// Both parts must:
/// - Be 1-128 characters long
/// - Contain only ASCII letters, digits, hyphens, underscores and dots
/// - Not start with a dot or a hyphen
///
/// # Examples
///
/// ```
/// use config_manager::RepositoryKey;
///
/// let key = RepositoryKey::new("PROJ", "my-service").unwrap();
/// assert_eq!(key.to_string(), "PROJ/my-service");
///
/// assert!(RepositoryKey::new("", "repo").is_err());
/// assert!(RepositoryKey::new("PROJ", "../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryKey {
    project: String,
    slug: String,
}

impl RepositoryKey {
    /// Create a key after validating both components.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidRepository` naming the component
    /// that failed validation.
    pub fn new(project: impl Into<String>, slug: impl Into<String>) -> ConfigurationResult<Self> {
        let project = project.into();
        let slug = slug.into();

        validate_component("project", &project)?;
        validate_component("slug", &slug)?;

        Ok(Self { project, slug })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for RepositoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.slug)
    }
}

fn validate_component(field: &str, value: &str) -> ConfigurationResult<()> {
    let invalid = |reason: String| ConfigurationError::InvalidRepository {
        field: field.to_string(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid("cannot be empty".to_string()));
    }

    if value.len() > MAX_COMPONENT_LEN {
        return Err(invalid(format!(
            "too long ({} characters, maximum {})",
            value.len(),
            MAX_COMPONENT_LEN
        )));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(invalid(format!(
            "'{}' contains invalid characters (only letters, digits, '-', '_' and '.' allowed)",
            value
        )));
    }

    if value.starts_with('.') || value.starts_with('-') {
        return Err(invalid(format!(
            "'{}' cannot start with '.' or '-'",
            value
        )));
    }

    Ok(())
}
