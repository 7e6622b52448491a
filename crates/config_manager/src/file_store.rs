//! TOML file backed settings store.
//!
//! Layout under the configuration directory:
//!
//! ```text
//! <config-dir>/
//! ├── global.toml
//! └── repositories/
//!     └── PROJ/
//!         └── my-service.toml
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::store::SettingsStore;
use crate::{ConfigurationError, ConfigurationResult, RepositoryKey, SettingsMap};

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;

const GLOBAL_FILE: &str = "global.toml";
const REPOSITORIES_DIR: &str = "repositories";

/// Settings store that keeps each layer in its own TOML file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    root: PathBuf,
}

impl FileSettingsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn global_path(&self) -> PathBuf {
        self.root.join(GLOBAL_FILE)
    }

    pub fn repository_path(&self, repository: &RepositoryKey) -> PathBuf {
        self.root
            .join(REPOSITORIES_DIR)
            .join(repository.project())
            .join(format!("{}.toml", repository.slug()))
    }

    async fn read_map(&self, path: &Path) -> ConfigurationResult<Option<SettingsMap>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Settings file not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(ConfigurationError::FileAccessError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        parse_settings(&content)
            .map(Some)
            .map_err(|e| match e {
                ConfigurationError::ParseError { reason } => ConfigurationError::ParseError {
                    reason: format!("{}: {}", path.display(), reason),
                },
                other => other,
            })
    }

    async fn write_map(&self, path: &Path, settings: &SettingsMap) -> ConfigurationResult<()> {
        let content = toml::to_string_pretty(settings).map_err(|e| ConfigurationError::ParseError {
            reason: format!("{}: {}", path.display(), e),
        })?;

        let access_error = |e: std::io::Error| ConfigurationError::FileAccessError {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(access_error)?;
        }
        tokio::fs::write(path, content).await.map_err(access_error)?;

        debug!(path = %path.display(), keys = settings.len(), "Wrote settings file");
        Ok(())
    }
}

/// Parse a TOML document into a settings map.
///
/// Values keep their TOML types; a quoted `"true"` stays a string and is
/// interpreted later by the lenient settings readers.
pub fn parse_settings(content: &str) -> ConfigurationResult<SettingsMap> {
    toml::from_str::<SettingsMap>(content).map_err(|e| ConfigurationError::ParseError {
        reason: e.to_string(),
    })
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn global_settings(&self) -> ConfigurationResult<SettingsMap> {
        Ok(self.read_map(&self.global_path()).await?.unwrap_or_default())
    }

    #[instrument(skip(self), fields(repository = %repository))]
    async fn repository_settings(
        &self,
        repository: &RepositoryKey,
    ) -> ConfigurationResult<Option<SettingsMap>> {
        self.read_map(&self.repository_path(repository)).await
    }

    #[instrument(skip(self, settings))]
    async fn save_global_settings(&self, settings: SettingsMap) -> ConfigurationResult<()> {
        self.write_map(&self.global_path(), &settings).await
    }

    #[instrument(skip(self, settings), fields(repository = %repository))]
    async fn save_repository_settings(
        &self,
        repository: &RepositoryKey,
        settings: SettingsMap,
    ) -> ConfigurationResult<()> {
        self.write_map(&self.repository_path(repository), &settings)
            .await
    }
}
