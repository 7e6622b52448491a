//! Identity directory backed by `users.toml`.
//!
//! ```toml
//! [users.jdoe]
//! name = "Jane Doe"
//! email = "jane.doe@example.com"
//!
//! [users.release-bot]
//! name = "Release Bot"
//! email = "release@example.com"
//! service = true
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use commit_gate_core::{GateError, GateResult, IdentityService, VerifiedIdentity};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

/// One entry of the identity directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub name: String,
    pub email: String,
    /// Marks automation accounts whose commits may be exempted.
    #[serde(default)]
    pub service: bool,
}

/// Verified identities keyed by the username the host authenticates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDirectory {
    #[serde(default)]
    users: BTreeMap<String, UserEntry>,
}

impl UserDirectory {
    /// Load the directory from `path`. A missing file is an empty directory.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No identity directory found");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let directory = Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), users = directory.users.len(), "Loaded identity directory");
        Ok(directory)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse identity directory: {}", e)))
    }

    pub fn insert(&mut self, username: impl Into<String>, entry: UserEntry) {
        self.users.insert(username.into(), entry);
    }

    pub fn get(&self, username: &str) -> Option<&UserEntry> {
        self.users.get(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl IdentityService for UserDirectory {
    async fn verified_identity(&self, pusher: &str) -> GateResult<VerifiedIdentity> {
        self.get(pusher)
            .map(|entry| VerifiedIdentity::new(&entry.name, &entry.email))
            .ok_or_else(|| GateError::Identity {
                user: pusher.to_string(),
                reason: "user is not listed in the identity directory".to_string(),
            })
    }

    /// Commits record display names, so both the username and the display
    /// name of a service entry count.
    async fn is_service_user(&self, name: &str) -> bool {
        self.users
            .iter()
            .any(|(username, entry)| entry.service && (username == name || entry.name == name))
    }
}
