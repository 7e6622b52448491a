//! Sparse settings as stored at global and repository scope.
//!
//! Settings arrive from the store as a string-keyed map of JSON values, the
//! shape of a key-value plugin settings store. Every field is optional here;
//! [`crate::SettingsResolver`] turns a global and a repository layer into the
//! complete effective view.
//!
//! Parsing is lenient. A blank string, a missing key, or a value of the wrong
//! type all mean "not set", which later disables the corresponding rule.
//! Booleans are accepted both as JSON booleans and as `"true"`/`"false"`
//! strings because form-backed stores persist checkboxes as text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

/// Raw settings as read from, or written to, a settings store.
pub type SettingsMap = BTreeMap<String, Value>;

/// Key of the repository-level flag that turns the hook on for a repository.
pub const ENABLED_KEY: &str = "enabled";

/// Key of the global flag enabling the tracker override user.
pub const OVERRIDE_JIRA_USER_ENABLED_KEY: &str = "overrideJiraUserEnabled";

/// Key of the global tracker override user name.
pub const OVERRIDE_JIRA_USER_TEXT_KEY: &str = "overrideJiraUserText";

/// Identifies one configurable setting.
///
/// The string form is the configuration key, which is also the field id used
/// when a validation error is reported against the setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingField {
    RequireMatchingAuthorName,
    RequireMatchingAuthorEmail,
    CommitterEmailRegex,
    CommitMessageRegex,
    BranchNameRegex,
    ExcludeByRegex,
    ExcludeBranchRegex,
    ExcludeMergeCommits,
    ExcludeServiceUserCommits,
    ErrorMessageHeader,
    ErrorMessageFooter,
    ErrorMessageCommitterEmail,
    ErrorMessageCommitterEmailRegex,
    ErrorMessageCommitterName,
    ErrorMessageCommitRegex,
    ErrorMessageIssueJql,
    ErrorMessageNoJiraIssue,
    ErrorMessageBranchName,
    IssueJqlFilter,
    /// Global-only tracker override user (enabled flag and user name).
    OverrideJiraUser,
}

impl SettingField {
    /// Fields that may be set at both global and repository scope.
    pub const HOOK_FIELDS: [SettingField; 19] = [
        SettingField::RequireMatchingAuthorName,
        SettingField::RequireMatchingAuthorEmail,
        SettingField::CommitterEmailRegex,
        SettingField::CommitMessageRegex,
        SettingField::BranchNameRegex,
        SettingField::ExcludeByRegex,
        SettingField::ExcludeBranchRegex,
        SettingField::ExcludeMergeCommits,
        SettingField::ExcludeServiceUserCommits,
        SettingField::ErrorMessageHeader,
        SettingField::ErrorMessageFooter,
        SettingField::ErrorMessageCommitterEmail,
        SettingField::ErrorMessageCommitterEmailRegex,
        SettingField::ErrorMessageCommitterName,
        SettingField::ErrorMessageCommitRegex,
        SettingField::ErrorMessageIssueJql,
        SettingField::ErrorMessageNoJiraIssue,
        SettingField::ErrorMessageBranchName,
        SettingField::IssueJqlFilter,
    ];

    /// Fields holding regular expressions.
    pub const PATTERN_FIELDS: [SettingField; 5] = [
        SettingField::CommitMessageRegex,
        SettingField::ExcludeByRegex,
        SettingField::ExcludeBranchRegex,
        SettingField::CommitterEmailRegex,
        SettingField::BranchNameRegex,
    ];

    /// The configuration key for this field.
    pub const fn key(&self) -> &'static str {
        match self {
            SettingField::RequireMatchingAuthorName => "requireMatchingAuthorName",
            SettingField::RequireMatchingAuthorEmail => "requireMatchingAuthorEmail",
            SettingField::CommitterEmailRegex => "committerEmailRegex",
            SettingField::CommitMessageRegex => "commitMessageRegex",
            SettingField::BranchNameRegex => "branchNameRegex",
            SettingField::ExcludeByRegex => "excludeByRegex",
            SettingField::ExcludeBranchRegex => "excludeBranchRegex",
            SettingField::ExcludeMergeCommits => "excludeMergeCommits",
            SettingField::ExcludeServiceUserCommits => "excludeServiceUserCommits",
            SettingField::ErrorMessageHeader => "errorMessageHeader",
            SettingField::ErrorMessageFooter => "errorMessageFooter",
            SettingField::ErrorMessageCommitterEmail => "errorMessageCommitterEmail",
            SettingField::ErrorMessageCommitterEmailRegex => "errorMessageCommitterEmailRegex",
            SettingField::ErrorMessageCommitterName => "errorMessageCommitterName",
            SettingField::ErrorMessageCommitRegex => "errorMessageCommitRegex",
            SettingField::ErrorMessageIssueJql => "errorMessageIssueJql",
            SettingField::ErrorMessageNoJiraIssue => "errorMessageNoJiraIssue",
            SettingField::ErrorMessageBranchName => "errorMessageBranchName",
            SettingField::IssueJqlFilter => "issueJqlFilter",
            SettingField::OverrideJiraUser => "overrideJiraUser",
        }
    }
}

impl std::fmt::Display for SettingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A single setting value as held by a settings layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Flag(bool),
    Text(String),
}

/// Settings that can be configured both globally and per repository.
///
/// `None` means the layer does not set the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookSettings {
    pub require_matching_author_name: Option<bool>,
    pub require_matching_author_email: Option<bool>,
    pub committer_email_regex: Option<String>,
    pub commit_message_regex: Option<String>,
    pub branch_name_regex: Option<String>,
    pub exclude_by_regex: Option<String>,
    pub exclude_branch_regex: Option<String>,
    pub exclude_merge_commits: Option<bool>,
    pub exclude_service_user_commits: Option<bool>,
    pub error_message_header: Option<String>,
    pub error_message_footer: Option<String>,
    pub error_message_committer_email: Option<String>,
    pub error_message_committer_email_regex: Option<String>,
    pub error_message_committer_name: Option<String>,
    pub error_message_commit_regex: Option<String>,
    pub error_message_issue_jql: Option<String>,
    pub error_message_no_jira_issue: Option<String>,
    pub error_message_branch_name: Option<String>,
    pub issue_jql_filter: Option<String>,
}

impl HookSettings {
    /// Parse hook settings from a raw settings map.
    pub fn from_map(map: &SettingsMap) -> Self {
        let mut settings = HookSettings::default();
        for field in SettingField::HOOK_FIELDS {
            match read_value(map, field) {
                Some(value) => settings.set(field, value),
                None => continue,
            }
        }
        settings
    }

    /// Write the fields this layer sets into `map`, omitting unset fields.
    pub fn write_to(&self, map: &mut SettingsMap) {
        for field in SettingField::HOOK_FIELDS {
            let value = match self.get(field) {
                Some(SettingValue::Flag(flag)) => Value::Bool(flag),
                Some(SettingValue::Text(text)) => Value::String(text),
                None => continue,
            };
            map.insert(field.key().to_string(), value);
        }
    }

    /// Serialize to a raw settings map.
    pub fn to_map(&self) -> SettingsMap {
        let mut map = SettingsMap::new();
        self.write_to(&mut map);
        map
    }

    /// Get the value this layer sets for `field`, if any.
    ///
    /// Global-only fields are never held by this type and always return `None`.
    pub fn get(&self, field: SettingField) -> Option<SettingValue> {
        let flag = |value: &Option<bool>| value.map(SettingValue::Flag);
        let text = |value: &Option<String>| value.clone().map(SettingValue::Text);

        match field {
            SettingField::RequireMatchingAuthorName => flag(&self.require_matching_author_name),
            SettingField::RequireMatchingAuthorEmail => flag(&self.require_matching_author_email),
            SettingField::CommitterEmailRegex => text(&self.committer_email_regex),
            SettingField::CommitMessageRegex => text(&self.commit_message_regex),
            SettingField::BranchNameRegex => text(&self.branch_name_regex),
            SettingField::ExcludeByRegex => text(&self.exclude_by_regex),
            SettingField::ExcludeBranchRegex => text(&self.exclude_branch_regex),
            SettingField::ExcludeMergeCommits => flag(&self.exclude_merge_commits),
            SettingField::ExcludeServiceUserCommits => flag(&self.exclude_service_user_commits),
            SettingField::ErrorMessageHeader => text(&self.error_message_header),
            SettingField::ErrorMessageFooter => text(&self.error_message_footer),
            SettingField::ErrorMessageCommitterEmail => text(&self.error_message_committer_email),
            SettingField::ErrorMessageCommitterEmailRegex => {
                text(&self.error_message_committer_email_regex)
            }
            SettingField::ErrorMessageCommitterName => text(&self.error_message_committer_name),
            SettingField::ErrorMessageCommitRegex => text(&self.error_message_commit_regex),
            SettingField::ErrorMessageIssueJql => text(&self.error_message_issue_jql),
            SettingField::ErrorMessageNoJiraIssue => text(&self.error_message_no_jira_issue),
            SettingField::ErrorMessageBranchName => text(&self.error_message_branch_name),
            SettingField::IssueJqlFilter => text(&self.issue_jql_filter),
            SettingField::OverrideJiraUser => None,
        }
    }

    /// Set `field` on this layer. Values of the wrong kind are ignored.
    pub fn set(&mut self, field: SettingField, value: SettingValue) {
        let slot_flag = |slot: &mut Option<bool>, value: SettingValue| {
            if let SettingValue::Flag(flag) = value {
                *slot = Some(flag);
            }
        };
        let slot_text = |slot: &mut Option<String>, value: SettingValue| {
            if let SettingValue::Text(text) = value {
                *slot = Some(text);
            }
        };

        match field {
            SettingField::RequireMatchingAuthorName => {
                slot_flag(&mut self.require_matching_author_name, value)
            }
            SettingField::RequireMatchingAuthorEmail => {
                slot_flag(&mut self.require_matching_author_email, value)
            }
            SettingField::CommitterEmailRegex => slot_text(&mut self.committer_email_regex, value),
            SettingField::CommitMessageRegex => slot_text(&mut self.commit_message_regex, value),
            SettingField::BranchNameRegex => slot_text(&mut self.branch_name_regex, value),
            SettingField::ExcludeByRegex => slot_text(&mut self.exclude_by_regex, value),
            SettingField::ExcludeBranchRegex => slot_text(&mut self.exclude_branch_regex, value),
            SettingField::ExcludeMergeCommits => slot_flag(&mut self.exclude_merge_commits, value),
            SettingField::ExcludeServiceUserCommits => {
                slot_flag(&mut self.exclude_service_user_commits, value)
            }
            SettingField::ErrorMessageHeader => slot_text(&mut self.error_message_header, value),
            SettingField::ErrorMessageFooter => slot_text(&mut self.error_message_footer, value),
            SettingField::ErrorMessageCommitterEmail => {
                slot_text(&mut self.error_message_committer_email, value)
            }
            SettingField::ErrorMessageCommitterEmailRegex => {
                slot_text(&mut self.error_message_committer_email_regex, value)
            }
            SettingField::ErrorMessageCommitterName => {
                slot_text(&mut self.error_message_committer_name, value)
            }
            SettingField::ErrorMessageCommitRegex => {
                slot_text(&mut self.error_message_commit_regex, value)
            }
            SettingField::ErrorMessageIssueJql => {
                slot_text(&mut self.error_message_issue_jql, value)
            }
            SettingField::ErrorMessageNoJiraIssue => {
                slot_text(&mut self.error_message_no_jira_issue, value)
            }
            SettingField::ErrorMessageBranchName => {
                slot_text(&mut self.error_message_branch_name, value)
            }
            SettingField::IssueJqlFilter => slot_text(&mut self.issue_jql_filter, value),
            SettingField::OverrideJiraUser => {}
        }
    }
}

/// Global settings: the hook fields plus the global-only tracker override user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalSettings {
    pub hook: HookSettings,
    pub override_jira_user_enabled: Option<bool>,
    pub override_jira_user_text: Option<String>,
}

impl GlobalSettings {
    /// Parse global settings from a raw settings map.
    pub fn from_map(map: &SettingsMap) -> Self {
        Self {
            hook: HookSettings::from_map(map),
            override_jira_user_enabled: read_bool(map, OVERRIDE_JIRA_USER_ENABLED_KEY),
            override_jira_user_text: read_string(map, OVERRIDE_JIRA_USER_TEXT_KEY),
        }
    }

    /// Serialize to a raw settings map.
    pub fn to_map(&self) -> SettingsMap {
        let mut map = self.hook.to_map();
        if let Some(enabled) = self.override_jira_user_enabled {
            map.insert(
                OVERRIDE_JIRA_USER_ENABLED_KEY.to_string(),
                Value::Bool(enabled),
            );
        }
        if let Some(user) = &self.override_jira_user_text {
            map.insert(
                OVERRIDE_JIRA_USER_TEXT_KEY.to_string(),
                Value::String(user.clone()),
            );
        }
        map
    }
}

/// Repository-level settings: whether the hook is enabled for the repository,
/// and the fields it overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryHookSettings {
    pub enabled: bool,
    pub settings: HookSettings,
}

impl RepositoryHookSettings {
    pub fn enabled(settings: HookSettings) -> Self {
        Self {
            enabled: true,
            settings,
        }
    }

    /// Parse repository settings from a raw settings map.
    pub fn from_map(map: &SettingsMap) -> Self {
        Self {
            enabled: read_bool(map, ENABLED_KEY).unwrap_or(false),
            settings: HookSettings::from_map(map),
        }
    }

    /// Serialize to a raw settings map.
    pub fn to_map(&self) -> SettingsMap {
        let mut map = self.settings.to_map();
        map.insert(ENABLED_KEY.to_string(), Value::Bool(self.enabled));
        map
    }
}

fn is_flag_field(field: SettingField) -> bool {
    matches!(
        field,
        SettingField::RequireMatchingAuthorName
            | SettingField::RequireMatchingAuthorEmail
            | SettingField::ExcludeMergeCommits
            | SettingField::ExcludeServiceUserCommits
    )
}

fn read_value(map: &SettingsMap, field: SettingField) -> Option<SettingValue> {
    if is_flag_field(field) {
        read_bool(map, field.key()).map(SettingValue::Flag)
    } else {
        read_string(map, field.key()).map(SettingValue::Text)
    }
}

/// Read a flag, accepting JSON booleans and `"true"`/`"false"` text.
pub(crate) fn read_bool(map: &SettingsMap, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "" => None,
            "true" | "on" => Some(true),
            "false" | "off" => Some(false),
            other => {
                warn!(key = key, value = other, "Ignoring non-boolean setting value");
                None
            }
        },
        Value::Null => None,
        other => {
            warn!(key = key, value = %other, "Ignoring non-boolean setting value");
            None
        }
    }
}

/// Read a text value; blank text counts as unset.
pub(crate) fn read_string(map: &SettingsMap, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => {
            warn!(key = key, value = %other, "Ignoring non-text setting value");
            None
        }
    }
}
