//! Rules applied to a single commit.
//!
//! Exclusions are checked first: a service-account commit, a merge commit or
//! a commit whose message matches `excludeByRegex` is skipped entirely when
//! the corresponding exclusion is configured. Every other applicable rule is
//! evaluated and all failures are reported.

use std::sync::Arc;

use issue_tracker::QueryIdentity;
use tracing::debug;

use crate::commit::Commit;
use crate::identity::{IdentityService, VerifiedIdentity};
use crate::issue_checker::IssueKeyChecker;
use crate::messages;
use crate::rules::CompiledRules;
use crate::violation::{Violation, ViolationKind};

#[cfg(test)]
#[path = "commit_validator_tests.rs"]
mod tests;

/// The pusher's identity, looked up once per push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PusherIdentity {
    /// No enabled rule needs it.
    NotRequired,
    Verified(VerifiedIdentity),
    Unresolved { reason: String },
}

pub struct CommitValidator {
    identity: Arc<dyn IdentityService>,
    issues: IssueKeyChecker,
}

impl CommitValidator {
    pub fn new(identity: Arc<dyn IdentityService>, issues: IssueKeyChecker) -> Self {
        Self { identity, issues }
    }

    /// Violations for `commit`, pushed on `ref_id`. Empty when compliant.
    pub async fn validate(
        &self,
        ref_id: &str,
        commit: &Commit,
        rules: &CompiledRules,
        pusher: &PusherIdentity,
    ) -> Vec<Violation> {
        if self.is_excluded(commit, rules).await {
            return Vec::new();
        }

        let settings = &rules.settings;
        let messages = &settings.messages;
        let violation = |kind: ViolationKind, message: String| {
            Violation::for_commit(kind, ref_id, &commit.id, message)
        };
        let mut violations = Vec::new();

        match pusher {
            PusherIdentity::Verified(identity) => {
                let committer = &commit.committer;
                if settings.require_matching_author_name && committer.name != identity.name {
                    violations.push(violation(
                        ViolationKind::CommitterName,
                        messages::committer_name(messages, &identity.name, &committer.name),
                    ));
                }
                if settings.require_matching_author_email
                    && !committer.email.eq_ignore_ascii_case(&identity.email)
                {
                    violations.push(violation(
                        ViolationKind::CommitterEmail,
                        messages::committer_email(messages, &identity.email, &committer.email),
                    ));
                }
                if let Some(regex) = rules.committer_email.as_str() {
                    if !rules.committer_email.is_match(&identity.email) {
                        violations.push(violation(
                            ViolationKind::CommitterEmailRegex,
                            messages::committer_email_regex(messages, regex, &identity.email),
                        ));
                    }
                }
            }
            PusherIdentity::Unresolved { reason } if rules.needs_identity() => {
                violations.push(violation(
                    ViolationKind::IdentityUnresolvable,
                    format!("Unable to verify committer identity: {}", reason),
                ));
            }
            _ => {}
        }

        if let Some(regex) = rules.commit_message.as_str() {
            if !rules.commit_message.is_match(rule_text(&commit.message)) {
                violations.push(violation(
                    ViolationKind::CommitRegex,
                    messages::commit_regex(messages, regex),
                ));
            }
        }

        if let Some(jql) = settings
            .issue_jql_filter
            .as_deref()
            .filter(|jql| !jql.trim().is_empty())
        {
            let identity = QueryIdentity::from_override(
                settings.override_jira_user_enabled,
                settings.override_jira_user_text.as_deref(),
            );
            let findings = self
                .issues
                .check(&commit.message, jql, &identity, messages)
                .await;
            violations.extend(
                findings
                    .into_iter()
                    .map(|finding| violation(finding.kind, finding.message)),
            );
        }

        debug!(
            commit = %commit.short_id(),
            violations = violations.len(),
            "Validated commit"
        );
        violations
    }

    async fn is_excluded(&self, commit: &Commit, rules: &CompiledRules) -> bool {
        let settings = &rules.settings;

        if settings.exclude_service_user_commits
            && (self.identity.is_service_user(&commit.author.name).await
                || self.identity.is_service_user(&commit.committer.name).await)
        {
            debug!(commit = %commit.short_id(), "Skipping service user commit");
            return true;
        }

        if settings.exclude_merge_commits && commit.is_merge() {
            debug!(commit = %commit.short_id(), "Skipping merge commit");
            return true;
        }

        if rules.exclude_by.is_match(rule_text(&commit.message)) {
            debug!(commit = %commit.short_id(), "Skipping commit excluded by message");
            return true;
        }

        false
    }
}

/// Message text the patterns match, without the line terminators git
/// appends to every message.
fn rule_text(message: &str) -> &str {
    message.trim_end_matches(['\n', '\r'])
}
