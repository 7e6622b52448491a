//! Wiring of the validation engine for one local repository.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use commit_gate_core::{ValidationOptions, ValidationOrchestrator};
use config_manager::{FileSettingsStore, RepositoryKey, SettingsManager};
use issue_tracker::{IssueTracker, UnconfiguredTracker};
use tracing::{debug, instrument};

use crate::config::{resolve_config_dir, USERS_FILENAME};
use crate::errors::Error;
use crate::git::{key_for, open_repository, GitCommitGraph};
use crate::identity::UserDirectory;

/// An orchestrator bound to a repository and its configuration directory.
///
/// The CLI has no issue tracker transport; a configured JQL filter rejects
/// pushes with a tracker-unavailable violation.
pub struct RepositoryGate {
    pub repository: RepositoryKey,
    pub config_dir: PathBuf,
    pub orchestrator: ValidationOrchestrator,
}

impl RepositoryGate {
    #[instrument]
    pub fn open(repo: Option<&Path>, config_dir: Option<&Path>) -> Result<Self, Error> {
        let git = open_repository(repo)?;
        let repository = key_for(&git)?;
        let config_dir = resolve_config_dir(config_dir, git.path());
        let users = UserDirectory::load(&config_dir.join(USERS_FILENAME))?;

        debug!(
            repository = %repository,
            config_dir = %config_dir.display(),
            "Opened repository gate"
        );

        let tracker: Arc<dyn IssueTracker> = Arc::new(UnconfiguredTracker::new());
        let settings = SettingsManager::new(
            Arc::new(FileSettingsStore::new(&config_dir)),
            tracker.clone(),
        );
        let orchestrator = ValidationOrchestrator::new(
            settings,
            Arc::new(GitCommitGraph::new(repository.clone(), git)),
            Arc::new(users),
            tracker,
            ValidationOptions::default(),
        );

        Ok(Self {
            repository,
            config_dir,
            orchestrator,
        })
    }
}
