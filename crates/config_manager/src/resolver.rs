//! Settings resolution: global defaults overlaid with repository settings.
//!
//! # Precedence
//!
//! 1. **Repository** - used for a field when the repository hook is enabled and
//!    the repository layer sets that field to a non-empty value.
//! 2. **Global** - used for every other field.
//!
//! A field set at neither scope stays unset, which disables the rule built on
//! it. The global-only tracker override user always comes from the global
//! layer. Resolution is pure and total: it never fails and never inspects
//! pattern syntax; invalid patterns surface later as configuration violations.
//!
//! # Examples
//!
//! ```rust
//! use config_manager::{GlobalSettings, HookSettings, RepositoryHookSettings, SettingsResolver};
//!
//! let global = GlobalSettings {
//!     hook: HookSettings {
//!         commit_message_regex: Some(".*".to_string()),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! let repository = RepositoryHookSettings::enabled(HookSettings {
//!     branch_name_regex: Some("^feature/".to_string()),
//!     ..Default::default()
//! });
//!
//! let effective = SettingsResolver::new().resolve(&global, Some(&repository));
//! assert_eq!(effective.commit_message_regex.as_deref(), Some(".*"));
//! assert_eq!(effective.branch_name_regex.as_deref(), Some("^feature/"));
//! ```

use tracing::debug;

use crate::effective_settings::{
    EffectiveSettings, ErrorMessages, SettingScope, SettingsSourceTrace,
};
use crate::settings::{
    GlobalSettings, HookSettings, RepositoryHookSettings, SettingField, SettingValue,
};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Merges global and repository settings into [`EffectiveSettings`].
///
/// Stateless; a single instance can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct SettingsResolver {}

impl SettingsResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// Resolve the effective settings for one validation call.
    ///
    /// When `repository` is `None` or its hook is not enabled, only global
    /// settings apply.
    pub fn resolve(
        &self,
        global: &GlobalSettings,
        repository: Option<&RepositoryHookSettings>,
    ) -> EffectiveSettings {
        let repository = repository.filter(|r| r.enabled).map(|r| &r.settings);

        let mut merged = HookSettings::default();
        let mut trace = SettingsSourceTrace::new();

        for field in SettingField::HOOK_FIELDS {
            let repository_value = repository.and_then(|r| non_blank(r.get(field)));
            let (value, source) = match repository_value {
                Some(value) => (Some(value), SettingScope::Repository),
                None => (non_blank(global.hook.get(field)), SettingScope::Global),
            };

            if let Some(value) = value {
                merged.set(field, value);
                trace.add_source(field, source);
            }
        }

        let override_configured = global.override_jira_user_enabled.is_some()
            || global.override_jira_user_text.is_some();
        if override_configured {
            trace.add_source(SettingField::OverrideJiraUser, SettingScope::Global);
        }

        debug!(
            repository_layer = repository.is_some(),
            configured_fields = trace.field_count(),
            "Resolved effective settings"
        );

        EffectiveSettings {
            require_matching_author_name: merged.require_matching_author_name.unwrap_or(false),
            require_matching_author_email: merged.require_matching_author_email.unwrap_or(false),
            committer_email_regex: merged.committer_email_regex,
            commit_message_regex: merged.commit_message_regex,
            branch_name_regex: merged.branch_name_regex,
            exclude_by_regex: merged.exclude_by_regex,
            exclude_branch_regex: merged.exclude_branch_regex,
            exclude_merge_commits: merged.exclude_merge_commits.unwrap_or(false),
            exclude_service_user_commits: merged.exclude_service_user_commits.unwrap_or(false),
            messages: ErrorMessages {
                header: merged.error_message_header,
                footer: merged.error_message_footer,
                committer_email: merged.error_message_committer_email,
                committer_email_regex: merged.error_message_committer_email_regex,
                committer_name: merged.error_message_committer_name,
                commit_regex: merged.error_message_commit_regex,
                issue_jql: merged.error_message_issue_jql,
                no_jira_issue: merged.error_message_no_jira_issue,
                branch_name: merged.error_message_branch_name,
            },
            issue_jql_filter: merged.issue_jql_filter,
            override_jira_user_enabled: global.override_jira_user_enabled.unwrap_or(false),
            override_jira_user_text: global.override_jira_user_text.clone(),
            source_trace: trace,
        }
    }
}

fn non_blank(value: Option<SettingValue>) -> Option<SettingValue> {
    match value {
        Some(SettingValue::Text(text)) if text.trim().is_empty() => None,
        other => other,
    }
}
