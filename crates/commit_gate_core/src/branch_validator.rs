//! Branch naming rule.

use tracing::debug;

use crate::commit::short_ref_name;
use crate::messages;
use crate::rules::CompiledRules;
use crate::violation::{Violation, ViolationKind};

#[cfg(test)]
#[path = "branch_validator_tests.rs"]
mod tests;

/// Checks a new branch's name against `branchNameRegex`.
///
/// A branch matching `excludeBranchRegex` is exempt, even when its name
/// would fail the naming rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchValidator;

impl BranchValidator {
    pub fn new() -> Self {
        Self
    }

    /// Violations for the branch `ref_id` (a full ref or a short name).
    pub fn validate(&self, ref_id: &str, rules: &CompiledRules) -> Vec<Violation> {
        let name = short_ref_name(ref_id);

        if rules.is_branch_excluded(name) {
            debug!(branch = name, "Branch exempt from naming rule");
            return Vec::new();
        }

        match rules.branch_name.as_str() {
            Some(regex) if !rules.branch_name.is_match(name) => {
                vec![Violation::for_ref(
                    ViolationKind::BranchName,
                    ref_id,
                    messages::branch_name(&rules.settings.messages, name, regex),
                )]
            }
            _ => Vec::new(),
        }
    }
}
