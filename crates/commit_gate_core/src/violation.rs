//! Violations and the report handed back to the host.
//!
//! A [`ViolationReport`] with no violations allows the operation. Otherwise
//! the host rejects it and shows every line of [`ViolationReport::lines`] to
//! the user, in order and without truncation.

use std::fmt;

use config_manager::{ErrorMessages, SettingField};
use serde::{Deserialize, Serialize};

use crate::branch::BranchCreationVeto;
use crate::commit::short_id;

#[cfg(test)]
#[path = "violation_tests.rs"]
mod tests;

/// The rule or failure a violation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    CommitterName,
    CommitterEmail,
    CommitterEmailRegex,
    CommitRegex,
    IssueJql,
    NoIssue,
    BranchName,
    /// A stored setting cannot be applied.
    Configuration { field: SettingField },
    TrackerUnavailable,
    IdentityUnresolvable,
    SettingsUnavailable,
    CommitGraphUnavailable,
}

/// One reason to reject a push or branch creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub ref_id: Option<String>,
    pub commit_id: Option<String>,
    pub message: String,
}

impl Violation {
    /// A violation not tied to any ref or commit.
    pub fn general(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            ref_id: None,
            commit_id: None,
            message: message.into(),
        }
    }

    pub fn for_ref(kind: ViolationKind, ref_id: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            ref_id: Some(ref_id.to_string()),
            commit_id: None,
            message: message.into(),
        }
    }

    pub fn for_commit(
        kind: ViolationKind,
        ref_id: &str,
        commit_id: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            ref_id: Some(ref_id.to_string()),
            commit_id: Some(commit_id.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref_id) = &self.ref_id {
            write!(f, "{}: ", ref_id)?;
        }
        if let Some(commit_id) = &self.commit_id {
            write!(f, "{}: ", short_id(commit_id))?;
        }
        write!(f, "{}", self.message)
    }
}

/// Every violation found for one request, plus the configured framing text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationReport {
    violations: Vec<Violation>,
    header: Option<String>,
    footer: Option<String>,
}

impl ViolationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the configured header and footer when rendering.
    pub fn with_framing(mut self, messages: &ErrorMessages) -> Self {
        self.header = messages.header.clone();
        self.footer = messages.footer.clone();
        self
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn is_allowed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Lines to show the user: header, each violation, footer.
    ///
    /// Empty for an allowed report, even when a header is configured.
    pub fn lines(&self) -> Vec<String> {
        if self.is_allowed() {
            return Vec::new();
        }

        let mut lines = Vec::with_capacity(self.violations.len() + 2);
        if let Some(header) = &self.header {
            lines.push(header.clone());
        }
        lines.extend(self.violations.iter().map(Violation::to_string));
        if let Some(footer) = &self.footer {
            lines.push(footer.clone());
        }
        lines
    }

    pub fn into_outcome(self) -> ValidationOutcome {
        if self.is_allowed() {
            ValidationOutcome::Allow
        } else {
            ValidationOutcome::Reject(self)
        }
    }
}

/// Decision for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Allow,
    Reject(ViolationReport),
}

impl ValidationOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ValidationOutcome::Allow)
    }

    /// Cancel a pending branch creation if rejected.
    ///
    /// `cancel` is called exactly once on rejection, with every report line
    /// joined by newlines, and never on allow.
    pub fn apply_to(&self, veto: &mut dyn BranchCreationVeto) {
        if let ValidationOutcome::Reject(report) = self {
            veto.cancel(report.lines().join("\n"));
        }
    }
}
