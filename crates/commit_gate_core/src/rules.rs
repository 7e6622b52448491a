//! Patterns compiled once per validation request.

use config_manager::{CompiledPattern, EffectiveSettings, PatternMatcher, SettingField};
use tracing::warn;

use crate::violation::{Violation, ViolationKind};

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;

/// Effective settings with their pattern fields compiled.
///
/// A pattern that fails to compile is treated as disabled for matching and
/// recorded as a configuration violation, so the request is still rejected.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub settings: EffectiveSettings,
    pub committer_email: CompiledPattern,
    pub commit_message: CompiledPattern,
    pub branch_name: CompiledPattern,
    pub exclude_by: CompiledPattern,
    pub exclude_branch: CompiledPattern,
    configuration_violations: Vec<Violation>,
}

impl CompiledRules {
    /// Compile every pattern field of `settings`.
    pub fn compile(settings: EffectiveSettings) -> Self {
        Self::compile_fields(settings, &SettingField::PATTERN_FIELDS)
    }

    /// Compile only the patterns a branch creation uses.
    pub fn compile_for_branch(settings: EffectiveSettings) -> Self {
        Self::compile_fields(
            settings,
            &[SettingField::ExcludeBranchRegex, SettingField::BranchNameRegex],
        )
    }

    fn compile_fields(settings: EffectiveSettings, fields: &[SettingField]) -> Self {
        let matcher = PatternMatcher::new();
        let mut configuration_violations = Vec::new();

        let mut compile = |field: SettingField| {
            if !fields.contains(&field) {
                return CompiledPattern::Disabled;
            }
            match matcher.compile_optional(field, settings.pattern(field)) {
                Ok(pattern) => pattern,
                Err(e) => {
                    warn!(field = %field, error = %e, "Stored pattern does not compile");
                    configuration_violations.push(Violation::general(
                        ViolationKind::Configuration { field },
                        e.to_string(),
                    ));
                    CompiledPattern::Disabled
                }
            }
        };

        let committer_email = compile(SettingField::CommitterEmailRegex);
        let commit_message = compile(SettingField::CommitMessageRegex);
        let branch_name = compile(SettingField::BranchNameRegex);
        let exclude_by = compile(SettingField::ExcludeByRegex);
        let exclude_branch = compile(SettingField::ExcludeBranchRegex);

        Self {
            settings,
            committer_email,
            commit_message,
            branch_name,
            exclude_by,
            exclude_branch,
            configuration_violations,
        }
    }

    pub fn configuration_violations(&self) -> &[Violation] {
        &self.configuration_violations
    }

    /// Whether any rule needs the pusher's verified identity.
    pub fn needs_identity(&self) -> bool {
        self.settings.require_matching_author_name
            || self.settings.require_matching_author_email
            || self.committer_email.is_enabled()
    }

    /// Branch matches `excludeBranchRegex` and is exempt from every rule.
    pub fn is_branch_excluded(&self, short_name: &str) -> bool {
        self.exclude_branch.is_match(short_name)
    }
}
