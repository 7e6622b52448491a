//! Tests for save-time settings validation.

use super::*;
use async_trait::async_trait;
use issue_tracker::{IssueKey, QueryIdentity, TrackerResult};

/// Mock tracker that knows a fixed set of users and rejects JQL containing "!!".
struct MockTracker {
    users: Vec<String>,
    available: bool,
}

impl MockTracker {
    fn with_users(users: &[&str]) -> Self {
        Self {
            users: users.iter().map(|u| u.to_string()).collect(),
            available: true,
        }
    }

    fn unavailable() -> Self {
        Self {
            users: Vec::new(),
            available: false,
        }
    }

    fn check_available(&self) -> TrackerResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(TrackerError::Unavailable("connection refused".to_string()))
        }
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    async fn issue_exists(&self, _key: &IssueKey, _identity: &QueryIdentity) -> TrackerResult<bool> {
        self.check_available()?;
        Ok(true)
    }

    async fn issue_matches_jql(
        &self,
        _key: &IssueKey,
        _jql: &str,
        _identity: &QueryIdentity,
    ) -> TrackerResult<bool> {
        self.check_available()?;
        Ok(true)
    }

    async fn validate_jql(&self, jql: &str) -> TrackerResult<()> {
        self.check_available()?;
        if jql.contains("!!") {
            return Err(TrackerError::InvalidJql {
                jql: jql.to_string(),
                reason: "unexpected '!!'".to_string(),
            });
        }
        Ok(())
    }

    async fn user_exists(&self, username: &str) -> TrackerResult<bool> {
        self.check_available()?;
        Ok(self.users.iter().any(|u| u == username))
    }
}

fn validator_with(tracker: MockTracker) -> SettingsValidator {
    SettingsValidator::new(Arc::new(tracker))
}

fn invalid_pattern_settings() -> HookSettings {
    HookSettings {
        commit_message_regex: Some("(invalid regex".to_string()),
        exclude_by_regex: Some("(invalid regex".to_string()),
        exclude_branch_regex: Some("(invalid regex".to_string()),
        committer_email_regex: Some("(invalid regex".to_string()),
        ..Default::default()
    }
}

fn valid_settings() -> HookSettings {
    HookSettings {
        require_matching_author_email: Some(true),
        require_matching_author_name: Some(true),
        committer_email_regex: Some(".*".to_string()),
        commit_message_regex: Some(".*".to_string()),
        error_message_header: Some("header".to_string()),
        error_message_committer_email: Some("email".to_string()),
        error_message_committer_email_regex: Some("committer email regex".to_string()),
        error_message_committer_name: Some("name".to_string()),
        error_message_commit_regex: Some("commit regex".to_string()),
        error_message_issue_jql: Some("issue jql".to_string()),
        error_message_no_jira_issue: Some("no jira issue".to_string()),
        error_message_branch_name: Some("branch name".to_string()),
        error_message_footer: Some("footer".to_string()),
        exclude_merge_commits: Some(true),
        exclude_by_regex: Some(".*".to_string()),
        exclude_branch_regex: Some(".*".to_string()),
        exclude_service_user_commits: Some(true),
        ..Default::default()
    }
}

// ============================================================================
// ValidationResult Tests
// ============================================================================

#[test]
fn test_validation_result_starts_valid() {
    let result = ValidationResult::new();
    assert!(result.is_valid());
    assert!(result.clone().into_result().is_ok());
}

#[test]
fn test_validation_result_field_ids_are_unique() {
    let mut result = ValidationResult::new();
    result.add_error(ValidationError::new(SettingField::ExcludeByRegex, "a"));
    result.add_error(ValidationError::new(SettingField::ExcludeByRegex, "b"));
    result.add_error(ValidationError::new(SettingField::OverrideJiraUser, "c"));

    assert_eq!(result.field_ids(), vec!["excludeByRegex", "overrideJiraUser"]);
}

#[test]
fn test_validation_result_into_result_fails_with_errors() {
    let mut result = ValidationResult::new();
    result.add_error(ValidationError::new(SettingField::BranchNameRegex, "bad"));

    match result.into_result() {
        Err(ConfigurationError::ValidationFailed {
            error_count,
            errors,
        }) => {
            assert_eq!(error_count, 1);
            assert_eq!(errors[0].field, SettingField::BranchNameRegex);
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
}

#[test]
fn test_validation_error_display() {
    let error = ValidationError::new(SettingField::CommitMessageRegex, "bad pattern");
    assert_eq!(error.to_string(), "commitMessageRegex: bad pattern");
}

// ============================================================================
// Repository Validation Tests
// ============================================================================

#[tokio::test]
async fn test_repository_invalid_patterns_are_reported_per_field() {
    let validator = validator_with(MockTracker::with_users(&[]));

    let result = validator
        .validate_repository(&invalid_pattern_settings())
        .await;

    let mut ids = result.field_ids();
    ids.sort();
    assert_eq!(
        ids,
        vec![
            "commitMessageRegex",
            "committerEmailRegex",
            "excludeBranchRegex",
            "excludeByRegex"
        ]
    );
}

#[tokio::test]
async fn test_repository_valid_settings_pass() {
    let validator = validator_with(MockTracker::with_users(&[]));

    let result = validator.validate_repository(&valid_settings()).await;

    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
}

#[tokio::test]
async fn test_empty_settings_pass() {
    let validator = validator_with(MockTracker::unavailable());

    let result = validator.validate_repository(&HookSettings::default()).await;

    assert!(result.is_valid());
}

#[tokio::test]
async fn test_invalid_branch_name_regex_is_reported() {
    let validator = validator_with(MockTracker::with_users(&[]));
    let settings = HookSettings {
        branch_name_regex: Some("[unclosed".to_string()),
        ..Default::default()
    };

    let result = validator.validate_repository(&settings).await;

    assert_eq!(result.field_ids(), vec!["branchNameRegex"]);
    assert!(result.errors[0].message.starts_with("Invalid regular expression"));
}

#[tokio::test]
async fn test_invalid_jql_is_reported() {
    let validator = validator_with(MockTracker::with_users(&[]));
    let settings = HookSettings {
        issue_jql_filter: Some("project = ABC !!".to_string()),
        ..Default::default()
    };

    let result = validator.validate_repository(&settings).await;

    assert_eq!(result.field_ids(), vec!["issueJqlFilter"]);
    assert_eq!(result.errors[0].message, "Invalid JQL query: unexpected '!!'");
}

#[tokio::test]
async fn test_unverifiable_jql_is_rejected() {
    let validator = validator_with(MockTracker::unavailable());
    let settings = HookSettings {
        issue_jql_filter: Some("project = ABC".to_string()),
        ..Default::default()
    };

    let result = validator.validate_repository(&settings).await;

    assert_eq!(result.field_ids(), vec!["issueJqlFilter"]);
    assert!(result.errors[0].message.starts_with("Unable to verify JQL query"));
}

// ============================================================================
// Global Validation Tests
// ============================================================================

#[tokio::test]
async fn test_global_unknown_override_user_is_reported_with_patterns() {
    let validator = validator_with(MockTracker::with_users(&["admin"]));
    let settings = GlobalSettings {
        hook: invalid_pattern_settings(),
        override_jira_user_enabled: None,
        override_jira_user_text: Some("nonexistantuser".to_string()),
    };

    let result = validator.validate_global(&settings).await;

    let mut ids = result.field_ids();
    ids.sort();
    assert_eq!(
        ids,
        vec![
            "commitMessageRegex",
            "committerEmailRegex",
            "excludeBranchRegex",
            "excludeByRegex",
            "overrideJiraUser"
        ]
    );
}

#[tokio::test]
async fn test_global_known_override_user_passes() {
    let validator = validator_with(MockTracker::with_users(&["admin"]));
    let settings = GlobalSettings {
        hook: valid_settings(),
        override_jira_user_enabled: Some(true),
        override_jira_user_text: Some("admin".to_string()),
    };

    let result = validator.validate_global(&settings).await;

    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
}

#[tokio::test]
async fn test_global_enabled_override_requires_user() {
    let validator = validator_with(MockTracker::with_users(&["admin"]));
    let settings = GlobalSettings {
        override_jira_user_enabled: Some(true),
        override_jira_user_text: Some("  ".to_string()),
        ..Default::default()
    };

    let result = validator.validate_global(&settings).await;

    assert_eq!(result.field_ids(), vec!["overrideJiraUser"]);
}

#[tokio::test]
async fn test_global_override_user_lookup_failure_is_reported() {
    let validator = validator_with(MockTracker::unavailable());
    let settings = GlobalSettings {
        override_jira_user_enabled: Some(true),
        override_jira_user_text: Some("admin".to_string()),
        ..Default::default()
    };

    let result = validator.validate_global(&settings).await;

    assert_eq!(result.field_ids(), vec!["overrideJiraUser"]);
    assert!(result.errors[0].message.contains("Unable to verify user 'admin'"));
}
