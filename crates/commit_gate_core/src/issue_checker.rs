//! Issue references in commit messages.
//!
//! Keys are extracted from the message and confirmed with the tracker. A
//! commit passes when at least one referenced issue exists and matches the
//! configured JQL filter.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use config_manager::ErrorMessages;
use issue_tracker::{IssueTracker, QueryIdentity, TrackerError, TrackerResult};
use tracing::{debug, warn};

use crate::messages;
use crate::violation::ViolationKind;

#[cfg(test)]
#[path = "issue_checker_tests.rs"]
mod tests;

/// A problem found with a commit's issue references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFinding {
    pub kind: ViolationKind,
    pub message: String,
}

impl IssueFinding {
    fn new(kind: ViolationKind, message: String) -> Self {
        Self { kind, message }
    }
}

/// Checks commit messages against the issue tracker.
#[derive(Clone)]
pub struct IssueKeyChecker {
    tracker: Arc<dyn IssueTracker>,
    timeout: Duration,
}

impl IssueKeyChecker {
    /// `timeout` bounds every individual tracker query.
    pub fn new(tracker: Arc<dyn IssueTracker>, timeout: Duration) -> Self {
        Self { tracker, timeout }
    }

    /// Check the issue references in `message` against `jql`.
    ///
    /// A tracker failure stops the check and yields a single
    /// `TrackerUnavailable` finding; queries are never retried.
    pub async fn check(
        &self,
        message: &str,
        jql: &str,
        identity: &QueryIdentity,
        messages: &ErrorMessages,
    ) -> Vec<IssueFinding> {
        match self.check_keys(message, jql, identity, messages).await {
            Ok(findings) => findings,
            Err(e) => {
                warn!(error = %e, "Issue tracker query failed");
                vec![IssueFinding::new(
                    ViolationKind::TrackerUnavailable,
                    format!("Unable to verify JIRA issues: {}", e),
                )]
            }
        }
    }

    async fn check_keys(
        &self,
        message: &str,
        jql: &str,
        identity: &QueryIdentity,
        messages: &ErrorMessages,
    ) -> TrackerResult<Vec<IssueFinding>> {
        let keys = self.tracker.extract_issue_keys(message);
        if keys.is_empty() {
            return Ok(vec![IssueFinding::new(
                ViolationKind::NoIssue,
                messages::no_issue(messages),
            )]);
        }

        let mut findings = Vec::new();
        for key in &keys {
            if !self.bounded("issue_exists", self.tracker.issue_exists(key, identity)).await? {
                debug!(key = %key, "Referenced issue does not exist");
                findings.push(IssueFinding::new(
                    ViolationKind::IssueJql,
                    messages::issue_missing(messages, key.as_str()),
                ));
                continue;
            }

            if self
                .bounded(
                    "issue_matches_jql",
                    self.tracker.issue_matches_jql(key, jql, identity),
                )
                .await?
            {
                debug!(key = %key, "Referenced issue matches filter");
                return Ok(Vec::new());
            }

            findings.push(IssueFinding::new(
                ViolationKind::IssueJql,
                messages::issue_jql(messages, key.as_str(), jql),
            ));
        }

        findings.push(IssueFinding::new(
            ViolationKind::NoIssue,
            messages::no_issue(messages),
        ));
        Ok(findings)
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        query: impl Future<Output = TrackerResult<T>>,
    ) -> TrackerResult<T> {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(TrackerError::Timeout {
                operation: operation.to_string(),
                after: self.timeout,
            }),
        }
    }
}
