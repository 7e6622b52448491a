//! Issue tracker capability used by the commit gate.
//!
//! The gate never talks to a tracker directly. It depends on the
//! [`IssueTracker`] trait, which answers three questions:
//! - does an issue exist,
//! - does an issue match a JQL filter,
//! - which issue keys does a piece of text reference.
//!
//! Queries may run as an override user (a service account configured
//! globally) instead of the pushing user. Implementations are expected to
//! acquire those credentials for the single call they are making and release
//! them afterwards.

use async_trait::async_trait;
use tracing::debug;

pub mod errors;
pub mod issue_key;

pub use errors::{TrackerError, TrackerResult};
pub use issue_key::{extract_issue_keys, IssueKey};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The principal a tracker query runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIdentity {
    /// Whatever principal the tracker client is bound to for the current request.
    Default,

    /// A configured service account, used only for the duration of one query.
    Override(String),
}

impl QueryIdentity {
    /// Build the identity from the global override settings.
    ///
    /// Falls back to [`QueryIdentity::Default`] when the override is disabled or
    /// no user name is configured.
    pub fn from_override(enabled: bool, user: Option<&str>) -> Self {
        match user.map(str::trim) {
            Some(user) if enabled && !user.is_empty() => QueryIdentity::Override(user.to_string()),
            _ => QueryIdentity::Default,
        }
    }

    /// The override user name, if any.
    pub fn user(&self) -> Option<&str> {
        match self {
            QueryIdentity::Default => None,
            QueryIdentity::Override(user) => Some(user),
        }
    }
}

/// Issue tracker operations needed by the gate.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the gate shares a single instance
/// across concurrent validations.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Extract the issue keys referenced in `text`.
    ///
    /// The default implementation recognises standard `PROJ-123` keys.
    fn extract_issue_keys(&self, text: &str) -> Vec<IssueKey> {
        extract_issue_keys(text)
    }

    /// Check whether an issue exists at all.
    async fn issue_exists(&self, key: &IssueKey, identity: &QueryIdentity) -> TrackerResult<bool>;

    /// Check whether an issue is returned by the given JQL filter.
    async fn issue_matches_jql(
        &self,
        key: &IssueKey,
        jql: &str,
        identity: &QueryIdentity,
    ) -> TrackerResult<bool>;

    /// Check that a JQL expression is accepted by the tracker.
    ///
    /// # Errors
    /// Returns `TrackerError::InvalidJql` when the tracker rejects the query.
    async fn validate_jql(&self, jql: &str) -> TrackerResult<()>;

    /// Check whether a tracker user with this name exists.
    async fn user_exists(&self, username: &str) -> TrackerResult<bool>;
}

/// Tracker used when no tracker connection is configured.
///
/// Every query fails with [`TrackerError::Unavailable`] so that issue rules
/// fail closed instead of silently passing.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredTracker;

impl UnconfiguredTracker {
    pub fn new() -> Self {
        Self
    }

    fn unavailable() -> TrackerError {
        TrackerError::Unavailable("no issue tracker is configured".to_string())
    }
}

#[async_trait]
impl IssueTracker for UnconfiguredTracker {
    async fn issue_exists(&self, key: &IssueKey, _identity: &QueryIdentity) -> TrackerResult<bool> {
        debug!(issue_key = %key, "Issue lookup requested without a tracker");
        Err(Self::unavailable())
    }

    async fn issue_matches_jql(
        &self,
        key: &IssueKey,
        _jql: &str,
        _identity: &QueryIdentity,
    ) -> TrackerResult<bool> {
        debug!(issue_key = %key, "JQL match requested without a tracker");
        Err(Self::unavailable())
    }

    async fn validate_jql(&self, _jql: &str) -> TrackerResult<()> {
        Err(Self::unavailable())
    }

    async fn user_exists(&self, _username: &str) -> TrackerResult<bool> {
        Err(Self::unavailable())
    }
}
