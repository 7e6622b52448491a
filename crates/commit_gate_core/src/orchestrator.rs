//! Validation entry points.
//!
//! [`ValidationOrchestrator`] is what a host adapter calls. It resolves
//! settings fresh for every call, works out which commits a push introduces,
//! runs the commit and branch validators, and collects everything into one
//! [`ViolationReport`]. Nothing here fails: collaborator errors become
//! violations and the request is rejected.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use config_manager::SettingsManager;
use issue_tracker::IssueTracker;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::branch::BranchCreationRequest;
use crate::branch_validator::BranchValidator;
use crate::commit::{PushEvent, RefChangeType};
use crate::commit_validator::{CommitValidator, PusherIdentity};
use crate::errors::GateError;
use crate::graph::CommitGraph;
use crate::identity::IdentityService;
use crate::issue_checker::IssueKeyChecker;
use crate::rules::CompiledRules;
use crate::violation::{ValidationOutcome, Violation, ViolationKind, ViolationReport};

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

/// Default bound on a single issue tracker query.
pub const DEFAULT_TRACKER_TIMEOUT: Duration = Duration::from_secs(10);

/// Host-supplied limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    pub tracker_timeout: Duration,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            tracker_timeout: DEFAULT_TRACKER_TIMEOUT,
        }
    }
}

pub struct ValidationOrchestrator {
    settings: SettingsManager,
    graph: Arc<dyn CommitGraph>,
    identity: Arc<dyn IdentityService>,
    commits: CommitValidator,
    branches: BranchValidator,
}

impl ValidationOrchestrator {
    pub fn new(
        settings: SettingsManager,
        graph: Arc<dyn CommitGraph>,
        identity: Arc<dyn IdentityService>,
        tracker: Arc<dyn IssueTracker>,
        options: ValidationOptions,
    ) -> Self {
        let checker = IssueKeyChecker::new(tracker, options.tracker_timeout);
        Self {
            settings,
            graph,
            commits: CommitValidator::new(identity.clone(), checker),
            identity,
            branches: BranchValidator::new(),
        }
    }

    /// Validate the commits a push introduces.
    ///
    /// Only commits reachable from an updated ref and from no ref that existed
    /// before the push are checked, each once.
    pub async fn on_commits_added(&self, event: &PushEvent) -> ViolationReport {
        let span = info_span!(
            "validate_push",
            validation_id = %Uuid::new_v4(),
            repository = %event.repository,
            pusher = %event.pusher,
        );
        self.validate_push(event).instrument(span).await
    }

    /// Validate a request to create a branch.
    pub async fn on_branch_creation(&self, request: &BranchCreationRequest) -> ValidationOutcome {
        let span = info_span!(
            "validate_branch_creation",
            validation_id = %Uuid::new_v4(),
            repository = %request.repository,
            branch = %request.branch.id,
        );
        self.validate_branch_creation(request)
            .instrument(span)
            .await
            .into_outcome()
    }

    async fn validate_push(&self, event: &PushEvent) -> ViolationReport {
        let settings = match self.settings.effective_settings(&event.repository).await {
            Ok(settings) => settings,
            Err(e) => return settings_unavailable(e.into()),
        };
        let rules = CompiledRules::compile(settings);
        let mut report = report_for(&rules);

        let pusher = self.resolve_pusher(&event.pusher, &rules).await;

        let tips = match self.graph.ref_tips(&event.repository).await {
            Ok(tips) => tips,
            Err(e) => {
                error!(error = %e, "Could not read repository refs");
                report.push(Violation::general(
                    ViolationKind::CommitGraphUnavailable,
                    e.to_string(),
                ));
                return report;
            }
        };

        let mut seen: HashSet<String> = HashSet::new();
        for change in &event.ref_changes {
            if change.change_type == RefChangeType::Delete {
                debug!(ref_id = %change.ref_id, "Skipping deleted ref");
                continue;
            }
            if rules.is_branch_excluded(change.short_name()) {
                debug!(ref_id = %change.ref_id, "Skipping excluded branch");
                continue;
            }

            if change.change_type == RefChangeType::Add && change.is_branch() {
                report.extend(self.branches.validate(&change.ref_id, &rules));
            }

            let commits = match self
                .graph
                .commits_between(&event.repository, &tips, &change.to_hash)
                .await
            {
                Ok(commits) => commits,
                Err(e) => {
                    error!(ref_id = %change.ref_id, error = %e, "Could not list new commits");
                    report.push(Violation::for_ref(
                        ViolationKind::CommitGraphUnavailable,
                        &change.ref_id,
                        e.to_string(),
                    ));
                    continue;
                }
            };

            debug!(ref_id = %change.ref_id, commits = commits.len(), "Validating new commits");
            for commit in &commits {
                if !seen.insert(commit.id.clone()) {
                    continue;
                }
                report.extend(
                    self.commits
                        .validate(&change.ref_id, commit, &rules, &pusher)
                        .await,
                );
            }
        }

        log_decision(&report, seen.len());
        report
    }

    async fn validate_branch_creation(&self, request: &BranchCreationRequest) -> ViolationReport {
        let settings = match self.settings.effective_settings(&request.repository).await {
            Ok(settings) => settings,
            Err(e) => return settings_unavailable(e.into()),
        };
        let rules = CompiledRules::compile_for_branch(settings);
        let mut report = report_for(&rules);
        report.extend(self.branches.validate(&request.branch.id, &rules));

        log_decision(&report, 0);
        report
    }

    async fn resolve_pusher(&self, pusher: &str, rules: &CompiledRules) -> PusherIdentity {
        if !rules.needs_identity() {
            return PusherIdentity::NotRequired;
        }

        match self.identity.verified_identity(pusher).await {
            Ok(identity) => PusherIdentity::Verified(identity),
            Err(e) => {
                warn!(error = %e, "Pusher identity could not be verified");
                PusherIdentity::Unresolved {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn report_for(rules: &CompiledRules) -> ViolationReport {
    let mut report = ViolationReport::new().with_framing(&rules.settings.messages);
    report.extend(rules.configuration_violations().iter().cloned());
    report
}

fn settings_unavailable(e: GateError) -> ViolationReport {
    error!(error = %e, "Rejecting request because settings are unavailable");
    let mut report = ViolationReport::new();
    report.push(Violation::general(
        ViolationKind::SettingsUnavailable,
        e.to_string(),
    ));
    report
}

fn log_decision(report: &ViolationReport, commits: usize) {
    if report.is_allowed() {
        info!(commits, "Request allowed");
    } else {
        info!(
            commits,
            violations = report.violations().len(),
            "Request rejected"
        );
    }
}
