//! In-memory capability implementations.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use commit_gate_core::{
    BranchCreationVeto, Commit, CommitGraph, GateError, GateResult, IdentityService,
    VerifiedIdentity,
};
use config_manager::{ConfigurationError, ConfigurationResult, RepositoryKey, SettingsMap, SettingsStore};
use issue_tracker::{IssueKey, IssueTracker, QueryIdentity, TrackerError, TrackerResult};
use tracing::debug;

// ============================================================================
// Settings store
// ============================================================================

/// Settings store holding maps in memory.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    global: Mutex<SettingsMap>,
    repositories: Mutex<BTreeMap<RepositoryKey, SettingsMap>>,
    failure: Mutex<Option<String>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(global: SettingsMap) -> Self {
        let store = Self::new();
        store.set_global(global);
        store
    }

    pub fn set_global(&self, global: SettingsMap) {
        *self.global.lock().unwrap() = global;
    }

    pub fn set_repository(&self, repository: &RepositoryKey, settings: SettingsMap) {
        self.repositories
            .lock()
            .unwrap()
            .insert(repository.clone(), settings);
    }

    /// Make every following call fail as unavailable.
    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn global(&self) -> SettingsMap {
        self.global.lock().unwrap().clone()
    }

    pub fn repository(&self, repository: &RepositoryKey) -> Option<SettingsMap> {
        self.repositories.lock().unwrap().get(repository).cloned()
    }

    fn check(&self) -> ConfigurationResult<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(reason) => Err(ConfigurationError::StoreUnavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn global_settings(&self) -> ConfigurationResult<SettingsMap> {
        self.check()?;
        Ok(self.global())
    }

    async fn repository_settings(
        &self,
        repository: &RepositoryKey,
    ) -> ConfigurationResult<Option<SettingsMap>> {
        self.check()?;
        Ok(self.repository(repository))
    }

    async fn save_global_settings(&self, settings: SettingsMap) -> ConfigurationResult<()> {
        self.check()?;
        self.set_global(settings);
        Ok(())
    }

    async fn save_repository_settings(
        &self,
        repository: &RepositoryKey,
        settings: SettingsMap,
    ) -> ConfigurationResult<()> {
        self.check()?;
        self.set_repository(repository, settings);
        Ok(())
    }
}

// ============================================================================
// Issue tracker
// ============================================================================

/// Issue tracker answering from fixed lists.
///
/// Records the identity used for every issue query so tests can check that
/// the override user was applied.
#[derive(Debug, Default)]
pub struct StubIssueTracker {
    existing: HashSet<String>,
    matching: HashSet<String>,
    users: HashSet<String>,
    invalid_jql: HashSet<String>,
    failure: Option<TrackerError>,
    key_failures: HashMap<String, TrackerError>,
    identities: Mutex<Vec<QueryIdentity>>,
}

impl StubIssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// An issue that exists and matches any JQL filter.
    pub fn with_issue(mut self, key: &str) -> Self {
        self.existing.insert(key.to_string());
        self.matching.insert(key.to_string());
        self
    }

    /// An issue that exists but matches no JQL filter.
    pub fn with_filtered_issue(mut self, key: &str) -> Self {
        self.existing.insert(key.to_string());
        self
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.users.insert(user.to_string());
        self
    }

    pub fn with_invalid_jql(mut self, jql: &str) -> Self {
        self.invalid_jql.insert(jql.to_string());
        self
    }

    /// Every query fails with `error`.
    pub fn failing_with(mut self, error: TrackerError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Queries about `key` fail with `error`; other keys answer normally.
    pub fn failing_for(mut self, key: &str, error: TrackerError) -> Self {
        self.key_failures.insert(key.to_string(), error);
        self
    }

    pub fn identities_used(&self) -> Vec<QueryIdentity> {
        self.identities.lock().unwrap().clone()
    }

    fn check(&self) -> TrackerResult<()> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn check_key(&self, key: &IssueKey) -> TrackerResult<()> {
        self.check()?;
        match self.key_failures.get(key.as_str()) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IssueTracker for StubIssueTracker {
    async fn issue_exists(&self, key: &IssueKey, identity: &QueryIdentity) -> TrackerResult<bool> {
        self.identities.lock().unwrap().push(identity.clone());
        self.check_key(key)?;
        Ok(self.existing.contains(key.as_str()))
    }

    async fn issue_matches_jql(
        &self,
        key: &IssueKey,
        _jql: &str,
        identity: &QueryIdentity,
    ) -> TrackerResult<bool> {
        self.identities.lock().unwrap().push(identity.clone());
        self.check_key(key)?;
        Ok(self.matching.contains(key.as_str()))
    }

    async fn validate_jql(&self, jql: &str) -> TrackerResult<()> {
        self.check()?;
        if self.invalid_jql.contains(jql) {
            return Err(TrackerError::InvalidJql {
                jql: jql.to_string(),
                reason: "syntax error".to_string(),
            });
        }
        Ok(())
    }

    async fn user_exists(&self, username: &str) -> TrackerResult<bool> {
        self.check()?;
        Ok(self.users.contains(username))
    }
}

// ============================================================================
// Identity service
// ============================================================================

/// Identity service backed by a fixed user table.
#[derive(Debug, Default)]
pub struct StaticIdentityService {
    users: HashMap<String, VerifiedIdentity>,
    service_users: HashSet<String>,
}

impl StaticIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: &str, name: &str, email: &str) -> Self {
        self.users
            .insert(username.to_string(), VerifiedIdentity::new(name, email));
        self
    }

    pub fn with_service_user(mut self, name: &str) -> Self {
        self.service_users.insert(name.to_string());
        self
    }
}

#[async_trait]
impl IdentityService for StaticIdentityService {
    async fn verified_identity(&self, pusher: &str) -> GateResult<VerifiedIdentity> {
        self.users
            .get(pusher)
            .cloned()
            .ok_or_else(|| GateError::Identity {
                user: pusher.to_string(),
                reason: "no such user".to_string(),
            })
    }

    async fn is_service_user(&self, name: &str) -> bool {
        self.service_users.contains(name)
    }
}

// ============================================================================
// Commit graph
// ============================================================================

/// Commit graph over commits held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCommitGraph {
    commits: HashMap<String, Commit>,
    refs: BTreeMap<String, String>,
    failure: Option<String>,
}

impl InMemoryCommitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.commits.insert(commit.id.clone(), commit);
        self
    }

    /// A ref that existed before the push.
    pub fn with_ref(mut self, ref_id: &str, tip: &str) -> Self {
        self.refs.insert(ref_id.to_string(), tip.to_string());
        self
    }

    pub fn failing_with(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    fn check(&self, repository: &RepositoryKey) -> GateResult<()> {
        match &self.failure {
            Some(reason) => Err(GateError::CommitGraph {
                repository: repository.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Breadth-first walk from `start` along parent links.
    fn reachable(&self, start: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<String> = start.iter().cloned().collect();

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&id) {
                queue.extend(commit.parents.iter().cloned());
                order.push(id);
            }
        }
        order
    }
}

#[async_trait]
impl CommitGraph for InMemoryCommitGraph {
    async fn ref_tips(&self, repository: &RepositoryKey) -> GateResult<Vec<String>> {
        self.check(repository)?;
        Ok(self.refs.values().cloned().collect())
    }

    async fn commits_between(
        &self,
        repository: &RepositoryKey,
        since: &[String],
        until: &str,
    ) -> GateResult<Vec<Commit>> {
        self.check(repository)?;
        let known: HashSet<String> = self.reachable(since).into_iter().collect();
        let commits: Vec<Commit> = self
            .reachable(&[until.to_string()])
            .into_iter()
            .filter(|id| !known.contains(id))
            .filter_map(|id| self.commits.get(&id).cloned())
            .collect();

        debug!(until = until, count = commits.len(), "Listed new commits");
        Ok(commits)
    }
}

// ============================================================================
// Branch creation veto
// ============================================================================

/// Veto that records every cancellation.
#[derive(Debug, Default)]
pub struct RecordingVeto {
    pub reasons: Vec<String>,
}

impl RecordingVeto {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel_count(&self) -> usize {
        self.reasons.len()
    }
}

impl BranchCreationVeto for RecordingVeto {
    fn cancel(&mut self, reason: String) {
        self.reasons.push(reason);
    }
}
