//! Scratch git repositories.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{Oid, Repository, Signature};
use tempfile::TempDir;
use tracing::debug;

/// A non-bare repository at `<tmp>/<project>/<slug>`, deleted on drop.
pub struct GitFixture {
    _dir: TempDir,
    path: PathBuf,
    repo: Repository,
}

impl GitFixture {
    pub fn new(project: &str, slug: &str) -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp dir")?;
        let path = dir.path().join(project).join(slug);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let repo = Repository::init(&path).context("Failed to init repository")?;

        debug!(path = %path.display(), "Created git fixture");
        Ok(Self {
            _dir: dir,
            path,
            repo,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Write a commit and return its id.
    ///
    /// With `update_ref` the ref is moved to the new commit; its current tip
    /// must be the first parent. Without it the commit is only stored, the
    /// way objects sit in a repository while a pre-receive hook runs.
    pub fn commit(
        &self,
        update_ref: Option<&str>,
        parents: &[&str],
        message: &str,
        name: &str,
        email: &str,
    ) -> Result<String> {
        let signature = Signature::now(name, email)?;

        let blob = self.repo.blob(message.as_bytes())?;
        let mut builder = self.repo.treebuilder(None)?;
        builder.insert("CHANGES", blob, 0o100644)?;
        let tree = self.repo.find_tree(builder.write()?)?;

        let parents = parents
            .iter()
            .map(|id| {
                let oid = Oid::from_str(id)?;
                self.repo.find_commit(oid)
            })
            .collect::<Result<Vec<_>, git2::Error>>()?;
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        let oid = self.repo.commit(
            update_ref,
            &signature,
            &signature,
            message,
            &tree,
            &parent_refs,
        )?;
        Ok(oid.to_string())
    }

    /// Point `ref_id` at `target`, creating it if needed.
    pub fn set_ref(&self, ref_id: &str, target: &str) -> Result<()> {
        self.repo
            .reference(ref_id, Oid::from_str(target)?, true, "test fixture")?;
        Ok(())
    }
}
