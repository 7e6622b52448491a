//! Effective settings: the complete, merged view applied to one validation.
//!
//! Built fresh by [`crate::SettingsResolver`] on every validation call and
//! never cached. Every field is either taken from the repository layer, taken
//! from the global layer, or left unset (rule disabled). The source trace
//! records which layer supplied each field for audit logging.

use std::collections::BTreeMap;

use crate::settings::SettingField;

#[cfg(test)]
#[path = "effective_settings_tests.rs"]
mod tests;

/// Administrator-supplied message text, each replacing a built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMessages {
    pub header: Option<String>,
    pub footer: Option<String>,
    pub committer_email: Option<String>,
    pub committer_email_regex: Option<String>,
    pub committer_name: Option<String>,
    pub commit_regex: Option<String>,
    pub issue_jql: Option<String>,
    pub no_jira_issue: Option<String>,
    pub branch_name: Option<String>,
}

/// The resolved settings applied to one validation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveSettings {
    pub require_matching_author_name: bool,
    pub require_matching_author_email: bool,
    pub committer_email_regex: Option<String>,
    pub commit_message_regex: Option<String>,
    pub branch_name_regex: Option<String>,
    pub exclude_by_regex: Option<String>,
    pub exclude_branch_regex: Option<String>,
    pub exclude_merge_commits: bool,
    pub exclude_service_user_commits: bool,
    pub messages: ErrorMessages,
    pub issue_jql_filter: Option<String>,
    /// Global-only.
    pub override_jira_user_enabled: bool,
    /// Global-only.
    pub override_jira_user_text: Option<String>,
    pub source_trace: SettingsSourceTrace,
}

impl EffectiveSettings {
    /// Which layer supplied `field`, or `None` if neither layer set it.
    pub fn source_of(&self, field: SettingField) -> Option<SettingScope> {
        self.source_trace.get_source(field)
    }

    /// The raw pattern text configured for a pattern field.
    pub fn pattern(&self, field: SettingField) -> Option<&str> {
        match field {
            SettingField::CommitterEmailRegex => self.committer_email_regex.as_deref(),
            SettingField::CommitMessageRegex => self.commit_message_regex.as_deref(),
            SettingField::BranchNameRegex => self.branch_name_regex.as_deref(),
            SettingField::ExcludeByRegex => self.exclude_by_regex.as_deref(),
            SettingField::ExcludeBranchRegex => self.exclude_branch_regex.as_deref(),
            _ => None,
        }
    }
}

/// Settings layer that supplied a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum SettingScope {
    /// Global defaults (lowest precedence).
    Global,

    /// Repository-level settings (highest precedence).
    Repository,
}

impl std::fmt::Display for SettingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingScope::Global => write!(f, "Global"),
            SettingScope::Repository => write!(f, "Repository"),
        }
    }
}

/// Tracks which layer provided each setting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsSourceTrace {
    sources: BTreeMap<SettingField, SettingScope>,
}

impl SettingsSourceTrace {
    pub fn new() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }

    pub fn add_source(&mut self, field: SettingField, source: SettingScope) {
        self.sources.insert(field, source);
    }

    pub fn get_source(&self, field: SettingField) -> Option<SettingScope> {
        self.sources.get(&field).copied()
    }

    /// Fields supplied by either layer, in field order.
    pub fn configured_fields(&self) -> Vec<SettingField> {
        self.sources.keys().copied().collect()
    }

    pub fn field_count(&self) -> usize {
        self.sources.len()
    }
}
