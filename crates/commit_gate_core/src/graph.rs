//! Commit graph capability.
//!
//! The gate never walks history itself. Hosts expose their repository
//! through [`CommitGraph`] and the orchestrator asks it which commits a push
//! introduces.

use async_trait::async_trait;
use config_manager::RepositoryKey;

use crate::commit::Commit;
use crate::errors::GateResult;

/// Read access to a repository's commit history.
#[async_trait]
pub trait CommitGraph: Send + Sync {
    /// Tips of every ref in the repository as they were before the push
    /// being validated.
    async fn ref_tips(&self, repository: &RepositoryKey) -> GateResult<Vec<String>>;

    /// Commits reachable from `until` but from none of `since`, newest first.
    async fn commits_between(
        &self,
        repository: &RepositoryKey,
        since: &[String],
        until: &str,
    ) -> GateResult<Vec<Commit>>;
}
