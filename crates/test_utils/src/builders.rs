//! Builders for test data.

use commit_gate_core::{Commit, Person};
use config_manager::SettingsMap;
use serde_json::Value;
use uuid::Uuid;

/// Turn a JSON object literal into a settings map.
///
/// # Panics
///
/// Panics when `value` is not a JSON object.
pub fn settings_map(value: Value) -> SettingsMap {
    match value {
        Value::Object(object) => object.into_iter().collect(),
        other => panic!("settings must be a JSON object, got {}", other),
    }
}

/// Fluent builder for [`Commit`] values.
///
/// Defaults to a single-parent commit by "Jane Doe" with a random id.
#[derive(Debug, Clone)]
pub struct CommitBuilder {
    commit: Commit,
}

impl CommitBuilder {
    pub fn new(message: &str) -> Self {
        let jane = Person::new("Jane Doe", "jane@example.com");
        Self {
            commit: Commit {
                id: random_commit_id(),
                author: jane.clone(),
                committer: jane,
                message: message.to_string(),
                parents: Vec::new(),
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.commit.id = id.to_string();
        self
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.commit.parents.push(parent.to_string());
        self
    }

    /// Sets both author and committer.
    pub fn by(mut self, name: &str, email: &str) -> Self {
        let person = Person::new(name, email);
        self.commit.author = person.clone();
        self.commit.committer = person;
        self
    }

    pub fn committer(mut self, name: &str, email: &str) -> Self {
        self.commit.committer = Person::new(name, email);
        self
    }

    pub fn build(self) -> Commit {
        self.commit
    }
}

/// A 40 character hex id that looks like a git object id.
pub fn random_commit_id() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        &Uuid::new_v4().simple().to_string()[..8]
    )
}
