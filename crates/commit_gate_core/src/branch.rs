//! Branch creation requests.

use config_manager::RepositoryKey;
use serde::{Deserialize, Serialize};

use crate::commit::{short_ref_name, BRANCH_REF_PREFIX};

#[cfg(test)]
#[path = "branch_tests.rs"]
mod tests;

/// A branch, identified by its full ref id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
}

impl Branch {
    /// Accepts either a full ref id or a short branch name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = if name.starts_with(BRANCH_REF_PREFIX) {
            name
        } else {
            format!("{}{}", BRANCH_REF_PREFIX, name)
        };
        Self { id }
    }

    /// Branch name without the `refs/heads/` prefix.
    pub fn display_id(&self) -> &str {
        short_ref_name(&self.id)
    }
}

/// A request to create a branch, delivered before the branch exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCreationRequest {
    pub repository: RepositoryKey,
    pub branch: Branch,
    /// Commit the new branch would point at, when known.
    pub target: Option<String>,
}

/// Host hook able to veto a pending branch creation.
pub trait BranchCreationVeto {
    fn cancel(&mut self, reason: String);
}
