//! Issue key model and extraction from free text.
//!
//! Issue keys have the form `PROJECT-123`: an upper-case project key of at
//! least two characters, a dash, and a positive issue number without leading
//! zeros.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::errors::TrackerError;

#[cfg(test)]
#[path = "issue_key_tests.rs"]
mod tests;

const ISSUE_KEY_PATTERN: &str = r"\b([A-Z][A-Z0-9_]+-[1-9][0-9]*)\b";

fn issue_key_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(ISSUE_KEY_PATTERN).expect("issue key pattern is valid"))
}

/// A validated issue key such as `PROJ-42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IssueKey(String);

impl IssueKey {
    /// Create an issue key, validating its format.
    ///
    /// # Errors
    /// Returns `TrackerError::InvalidIssueKey` if the text is not exactly one issue key.
    pub fn new(key: impl Into<String>) -> Result<Self, TrackerError> {
        let key = key.into();

        let is_whole_key = issue_key_regex()
            .find(&key)
            .is_some_and(|m| m.start() == 0 && m.end() == key.len());

        if !is_whole_key {
            return Err(TrackerError::InvalidIssueKey(key));
        }

        Ok(Self(key))
    }

    /// The project part of the key (`PROJ` for `PROJ-42`).
    pub fn project(&self) -> &str {
        self.0
            .rsplit_once('-')
            .map(|(project, _)| project)
            .unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract every issue key referenced in `text`.
///
/// Keys are returned once each, in the order they first appear. Keys glued to
/// surrounding word characters (`xPROJ-1`, `PROJ-1a`) are not recognised.
pub fn extract_issue_keys(text: &str) -> Vec<IssueKey> {
    let mut keys: Vec<IssueKey> = Vec::new();

    for capture in issue_key_regex().captures_iter(text) {
        let key = IssueKey(capture[1].to_string());
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    keys
}
