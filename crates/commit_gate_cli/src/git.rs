//! Commit graph over a local git repository.
//!
//! A `pre-receive` hook runs before any ref moves, so the repository's refs
//! are exactly the tips that existed before the push. New objects may sit in
//! git's quarantine directory; [`open_repository`] without a path honours the
//! `GIT_DIR` and alternate object directory variables git sets for hooks.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use commit_gate_core::{Commit, CommitGraph, GateError, GateResult, Person};
use config_manager::RepositoryKey;
use git2::{Oid, Repository, Signature, Sort};
use tracing::{debug, instrument, Span};

use crate::errors::Error;

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;

/// Open the repository at `path`, or the one git is running the hook in.
pub fn open_repository(path: Option<&Path>) -> Result<Repository, Error> {
    let repository = match path {
        Some(path) => Repository::open(path)?,
        None => Repository::open_from_env()?,
    };
    Ok(repository)
}

/// Map a repository directory onto a repository key.
///
/// The parent directory names the project and the directory itself, without
/// a `.git` suffix, names the slug: `/srv/git/PROJ/service.git` becomes
/// `PROJ/service`.
pub fn repository_key(dir: &Path) -> GateResult<RepositoryKey> {
    let name = |path: Option<&Path>| {
        path.and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .map(str::to_string)
    };

    let slug = name(Some(dir))
        .map(|slug| slug.strip_suffix(".git").map(str::to_string).unwrap_or(slug))
        .ok_or_else(|| GateError::InvalidRepository(format!("{} has no name", dir.display())))?;
    let project = name(dir.parent()).ok_or_else(|| {
        GateError::InvalidRepository(format!("{} has no parent directory", dir.display()))
    })?;

    RepositoryKey::new(project, slug).map_err(|e| GateError::InvalidRepository(e.to_string()))
}

/// Key for an opened repository, from its work tree or, when bare, its git
/// directory.
pub fn key_for(repository: &Repository) -> GateResult<RepositoryKey> {
    repository_key(repository.workdir().unwrap_or_else(|| repository.path()))
}

/// [`CommitGraph`] serving a single repository through libgit2.
///
/// libgit2 calls block, so every query runs on tokio's blocking pool.
pub struct GitCommitGraph {
    key: RepositoryKey,
    repository: Arc<Mutex<Repository>>,
}

impl GitCommitGraph {
    pub fn new(key: RepositoryKey, repository: Repository) -> Self {
        Self {
            key,
            repository: Arc::new(Mutex::new(repository)),
        }
    }

    pub fn key(&self) -> &RepositoryKey {
        &self.key
    }

    async fn with_repository<T, F>(&self, requested: &RepositoryKey, f: F) -> GateResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Repository) -> Result<T, git2::Error> + Send + 'static,
    {
        if requested != &self.key {
            return Err(GateError::InvalidRepository(format!(
                "{} is not served by the graph for {}",
                requested, self.key
            )));
        }

        let repository = Arc::clone(&self.repository);
        let span = Span::current();
        let outcome = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let repository = repository
                .lock()
                .map_err(|_| "repository lock poisoned".to_string())?;
            f(&repository).map_err(|e| e.message().to_string())
        })
        .await
        .map_err(|e| self.failure(&format!("git task failed: {}", e)))?;

        outcome.map_err(|reason| self.failure(&reason))
    }

    fn failure(&self, reason: &str) -> GateError {
        GateError::CommitGraph {
            repository: self.key.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl CommitGraph for GitCommitGraph {
    #[instrument(skip(self), fields(repository = %repository))]
    async fn ref_tips(&self, repository: &RepositoryKey) -> GateResult<Vec<String>> {
        self.with_repository(repository, |repo| {
            let mut tips = BTreeSet::new();
            for reference in repo.references()? {
                let reference = reference?;
                match reference.peel_to_commit() {
                    Ok(commit) => {
                        tips.insert(commit.id().to_string());
                    }
                    Err(e) => debug!(
                        reference = reference.name().unwrap_or("<non-utf8>"),
                        error = %e,
                        "Skipping ref that does not point at a commit"
                    ),
                }
            }
            Ok(tips.into_iter().collect())
        })
        .await
    }

    #[instrument(skip(self, since), fields(repository = %repository, hidden = since.len()))]
    async fn commits_between(
        &self,
        repository: &RepositoryKey,
        since: &[String],
        until: &str,
    ) -> GateResult<Vec<Commit>> {
        let since = since.to_vec();
        let until = until.to_string();
        self.with_repository(repository, move |repo| {
            let mut walk = repo.revwalk()?;
            walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
            walk.push(Oid::from_str(&until)?)?;
            for tip in &since {
                walk.hide(Oid::from_str(tip)?)?;
            }

            let commits = walk
                .map(|oid| repo.find_commit(oid?).map(|commit| to_commit(&commit)))
                .collect::<Result<Vec<_>, git2::Error>>()?;
            debug!(commits = commits.len(), "Listed new commits");
            Ok(commits)
        })
        .await
    }
}

fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    Commit {
        id: commit.id().to_string(),
        author: to_person(&commit.author()),
        committer: to_person(&commit.committer()),
        message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
    }
}

fn to_person(signature: &Signature<'_>) -> Person {
    Person::new(
        String::from_utf8_lossy(signature.name_bytes()),
        String::from_utf8_lossy(signature.email_bytes()),
    )
}
