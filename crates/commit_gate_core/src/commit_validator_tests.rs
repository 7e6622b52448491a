use super::*;
use crate::commit::Person;
use crate::errors::GateResult;
use async_trait::async_trait;
use config_manager::{EffectiveSettings, ErrorMessages};
use issue_tracker::{IssueKey, IssueTracker, TrackerResult};
use std::time::Duration;

// ============================================================================
// Fakes
// ============================================================================

struct ServiceAccounts(Vec<&'static str>);

#[async_trait]
impl IdentityService for ServiceAccounts {
    async fn verified_identity(&self, pusher: &str) -> GateResult<VerifiedIdentity> {
        Ok(VerifiedIdentity::new(pusher, format!("{}@example.com", pusher)))
    }

    async fn is_service_user(&self, name: &str) -> bool {
        self.0.contains(&name)
    }
}

/// Every issue exists and matches.
struct OpenTracker;

#[async_trait]
impl IssueTracker for OpenTracker {
    async fn issue_exists(&self, _key: &IssueKey, _identity: &QueryIdentity) -> TrackerResult<bool> {
        Ok(true)
    }

    async fn issue_matches_jql(
        &self,
        _key: &IssueKey,
        _jql: &str,
        _identity: &QueryIdentity,
    ) -> TrackerResult<bool> {
        Ok(true)
    }

    async fn validate_jql(&self, _jql: &str) -> TrackerResult<()> {
        Ok(())
    }

    async fn user_exists(&self, _username: &str) -> TrackerResult<bool> {
        Ok(true)
    }
}

// ============================================================================
// Helpers
// ============================================================================

const REF: &str = "refs/heads/main";

fn validator() -> CommitValidator {
    CommitValidator::new(
        Arc::new(ServiceAccounts(vec!["build-bot"])),
        IssueKeyChecker::new(Arc::new(OpenTracker), Duration::from_secs(10)),
    )
}

fn commit(committer: Person, message: &str, parents: usize) -> Commit {
    Commit {
        id: "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678".to_string(),
        author: committer.clone(),
        committer,
        message: message.to_string(),
        parents: (0..parents).map(|i| format!("parent{}", i)).collect(),
    }
}

fn verified() -> PusherIdentity {
    PusherIdentity::Verified(VerifiedIdentity::new("Alice Admin", "a@b.com"))
}

fn strict_settings() -> EffectiveSettings {
    EffectiveSettings {
        require_matching_author_name: true,
        require_matching_author_email: true,
        commit_message_regex: Some("^[A-Z]+-[0-9]+ ".to_string()),
        exclude_merge_commits: true,
        exclude_service_user_commits: true,
        exclude_by_regex: Some("^\\[skip-gate\\]".to_string()),
        ..Default::default()
    }
}

fn kinds(violations: &[Violation]) -> Vec<ViolationKind> {
    violations.iter().map(|v| v.kind).collect()
}

// ============================================================================
// Identity Rules
// ============================================================================

#[tokio::test]
async fn test_mismatched_email_reports_one_violation() {
    let rules = CompiledRules::compile(EffectiveSettings {
        require_matching_author_email: true,
        committer_email_regex: Some(".*".to_string()),
        ..Default::default()
    });
    let commit = commit(Person::new("Alice Admin", "x@y.com"), "work", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert_eq!(kinds(&violations), vec![ViolationKind::CommitterEmail]);
    assert_eq!(
        violations[0].to_string(),
        "refs/heads/main: a1b2c3d4e5f: expected committer email 'a@b.com' but found 'x@y.com'"
    );
}

#[tokio::test]
async fn test_email_comparison_ignores_case() {
    let rules = CompiledRules::compile(EffectiveSettings {
        require_matching_author_email: true,
        ..Default::default()
    });
    let commit = commit(Person::new("Alice Admin", "A@B.com"), "work", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert!(violations.is_empty());
}

#[tokio::test]
async fn test_mismatched_name_uses_custom_message() {
    let rules = CompiledRules::compile(EffectiveSettings {
        require_matching_author_name: true,
        messages: ErrorMessages {
            committer_name: Some("Commit as yourself".to_string()),
            ..Default::default()
        },
        ..Default::default()
    });
    let commit = commit(Person::new("Mallory", "a@b.com"), "work", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert_eq!(kinds(&violations), vec![ViolationKind::CommitterName]);
    assert_eq!(violations[0].message, "Commit as yourself");
}

#[tokio::test]
async fn test_email_regex_checks_verified_email() {
    let rules = CompiledRules::compile(EffectiveSettings {
        committer_email_regex: Some("@corp\\.com$".to_string()),
        ..Default::default()
    });
    let commit = commit(Person::new("Alice Admin", "a@b.com"), "work", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert_eq!(kinds(&violations), vec![ViolationKind::CommitterEmailRegex]);
    assert_eq!(
        violations[0].message,
        "committer email regex '@corp\\.com$' does not match user email 'a@b.com'"
    );
}

#[tokio::test]
async fn test_unresolved_identity_fails_identity_rules() {
    let rules = CompiledRules::compile(EffectiveSettings {
        require_matching_author_name: true,
        ..Default::default()
    });
    let commit = commit(Person::new("Alice Admin", "a@b.com"), "work", 1);
    let pusher = PusherIdentity::Unresolved {
        reason: "unknown user 'alice'".to_string(),
    };

    let violations = validator().validate(REF, &commit, &rules, &pusher).await;

    assert_eq!(kinds(&violations), vec![ViolationKind::IdentityUnresolvable]);
}

#[tokio::test]
async fn test_unresolved_identity_ignored_without_identity_rules() {
    let rules = CompiledRules::compile(EffectiveSettings::default());
    let commit = commit(Person::new("Alice Admin", "a@b.com"), "work", 1);
    let pusher = PusherIdentity::Unresolved {
        reason: "unknown".to_string(),
    };

    let violations = validator().validate(REF, &commit, &rules, &pusher).await;

    assert!(violations.is_empty());
}

// ============================================================================
// Message Rules
// ============================================================================

#[tokio::test]
async fn test_all_failing_rules_are_reported() {
    let rules = CompiledRules::compile(strict_settings());
    let commit = commit(Person::new("Mallory", "m@evil.com"), "no key here", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert_eq!(
        kinds(&violations),
        vec![
            ViolationKind::CommitterName,
            ViolationKind::CommitterEmail,
            ViolationKind::CommitRegex
        ]
    );
}

#[tokio::test]
async fn test_commit_regex_is_substring_search() {
    let rules = CompiledRules::compile(EffectiveSettings {
        commit_message_regex: Some("[A-Z]+-[0-9]+".to_string()),
        ..Default::default()
    });
    let commit = commit(Person::new("Alice Admin", "a@b.com"), "fix for ABC-12 crash", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert!(violations.is_empty());
}

#[tokio::test]
async fn test_anchored_commit_regex_ignores_trailing_newline() {
    let rules = CompiledRules::compile(EffectiveSettings {
        commit_message_regex: Some("^[A-Z]+-[0-9]+: .+$".to_string()),
        ..Default::default()
    });
    let accepted = commit(Person::new("Alice Admin", "a@b.com"), "ABC-1: fix\n", 1);
    let crlf = commit(Person::new("Alice Admin", "a@b.com"), "ABC-1: fix\r\n", 1);
    let rejected = commit(Person::new("Alice Admin", "a@b.com"), "fix\n", 1);

    let validator = validator();

    assert!(validator.validate(REF, &accepted, &rules, &verified()).await.is_empty());
    assert!(validator.validate(REF, &crlf, &rules, &verified()).await.is_empty());
    assert_eq!(
        kinds(&validator.validate(REF, &rejected, &rules, &verified()).await),
        vec![ViolationKind::CommitRegex]
    );
}

#[tokio::test]
async fn test_anchored_exclusion_ignores_trailing_newline() {
    let mut settings = strict_settings();
    settings.exclude_by_regex = Some("^WIP$".to_string());
    let rules = CompiledRules::compile(settings);
    let commit = commit(Person::new("Mallory", "m@evil.com"), "WIP\n", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert!(violations.is_empty());
}

#[tokio::test]
async fn test_disabled_rules_never_report() {
    let rules = CompiledRules::compile(EffectiveSettings {
        commit_message_regex: Some(String::new()),
        committer_email_regex: Some(String::new()),
        ..Default::default()
    });
    let commit = commit(Person::new("Anyone", "any@where"), "", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert!(violations.is_empty());
}

#[tokio::test]
async fn test_jql_rule_reports_missing_key() {
    let rules = CompiledRules::compile(EffectiveSettings {
        issue_jql_filter: Some("project = ABC".to_string()),
        ..Default::default()
    });
    let commit = commit(Person::new("Alice Admin", "a@b.com"), "no key", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert_eq!(kinds(&violations), vec![ViolationKind::NoIssue]);
}

// ============================================================================
// Exclusions
// ============================================================================

#[tokio::test]
async fn test_merge_commit_is_skipped() {
    let rules = CompiledRules::compile(strict_settings());
    let commit = commit(Person::new("Mallory", "m@evil.com"), "Merge branch", 2);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert!(violations.is_empty());
}

#[tokio::test]
async fn test_service_user_commit_is_skipped() {
    let rules = CompiledRules::compile(strict_settings());
    let commit = commit(Person::new("build-bot", "bot@ci"), "bump version", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert!(violations.is_empty());
}

#[tokio::test]
async fn test_excluded_message_is_skipped() {
    let rules = CompiledRules::compile(strict_settings());
    let commit = commit(Person::new("Mallory", "m@evil.com"), "[skip-gate] hotfix", 1);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert!(violations.is_empty());
}

#[tokio::test]
async fn test_merge_commit_checked_without_exclusion() {
    let mut settings = strict_settings();
    settings.exclude_merge_commits = false;
    let rules = CompiledRules::compile(settings);
    let commit = commit(Person::new("Alice Admin", "a@b.com"), "Merge branch", 2);

    let violations = validator().validate(REF, &commit, &rules, &verified()).await;

    assert_eq!(kinds(&violations), vec![ViolationKind::CommitRegex]);
}

#[tokio::test]
async fn test_validation_is_repeatable() {
    let rules = CompiledRules::compile(strict_settings());
    let commit = commit(Person::new("Mallory", "m@evil.com"), "oops", 1);
    let validator = validator();

    let first = validator.validate(REF, &commit, &rules, &verified()).await;
    let second = validator.validate(REF, &commit, &rules, &verified()).await;

    assert_eq!(first, second);
}
