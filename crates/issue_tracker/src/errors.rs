//! Error types for issue tracker operations.
//!
//! The gate never retries a failed tracker call. Every variant here ends up as a
//! tracker-unavailable violation for the commit being checked, except
//! `InvalidJql` which is reported against the `issueJqlFilter` field when
//! settings are saved.

use std::time::Duration;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while talking to the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// The tracker did not answer within the bound supplied by the host.
    #[error("Issue tracker did not respond to '{operation}' within {after:?}")]
    Timeout { operation: String, after: Duration },

    /// The tracker rejected the credentials used for the query.
    ///
    /// Raised both for the pushing user and for a configured override user.
    #[error("Issue tracker rejected the credentials for user '{user}'")]
    AuthenticationFailed { user: String },

    /// The tracker could not be reached or returned an unusable answer.
    #[error("Issue tracker unavailable: {0}")]
    Unavailable(String),

    /// The tracker refused to parse a JQL expression.
    #[error("Invalid JQL query '{jql}': {reason}")]
    InvalidJql { jql: String, reason: String },

    /// Text that is not a well formed issue key was used as one.
    #[error("Invalid issue key: {0}")]
    InvalidIssueKey(String),
}

/// Result type alias for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
