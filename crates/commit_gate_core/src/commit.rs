//! Commits and pushes as seen by the gate.

use config_manager::RepositoryKey;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "commit_tests.rs"]
mod tests;

/// Number of characters shown for a commit id in messages.
pub const SHORT_ID_LEN: usize = 11;

/// Prefix shared by every branch ref.
pub const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// A name and email pair recorded on a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
}

impl Person {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A single commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub author: Person,
    pub committer: Person,
    pub message: String,
    pub parents: Vec<String>,
}

impl Commit {
    /// A commit with more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }
}

/// Abbreviate a commit id for display.
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Strip the `refs/heads/` prefix from a ref id, leaving other refs untouched.
pub fn short_ref_name(ref_id: &str) -> &str {
    ref_id.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(ref_id)
}

/// How a ref moved in a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefChangeType {
    Add,
    Update,
    Delete,
}

/// One ref update inside a push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefChange {
    pub ref_id: String,
    pub from_hash: String,
    pub to_hash: String,
    pub change_type: RefChangeType,
}

impl RefChange {
    pub fn new(
        ref_id: impl Into<String>,
        from_hash: impl Into<String>,
        to_hash: impl Into<String>,
        change_type: RefChangeType,
    ) -> Self {
        Self {
            ref_id: ref_id.into(),
            from_hash: from_hash.into(),
            to_hash: to_hash.into(),
            change_type,
        }
    }

    pub fn is_branch(&self) -> bool {
        self.ref_id.starts_with(BRANCH_REF_PREFIX)
    }

    pub fn short_name(&self) -> &str {
        short_ref_name(&self.ref_id)
    }
}

/// Commits added to a repository by one push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    pub repository: RepositoryKey,
    /// Authenticated user performing the push.
    pub pusher: String,
    pub ref_changes: Vec<RefChange>,
}
