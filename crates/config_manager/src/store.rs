//! Settings persistence interface.
//!
//! The gate reads its two settings layers from a [`SettingsStore`]. Stores
//! hand back raw [`SettingsMap`]s; typing and leniency rules are applied by
//! the caller so every backend parses values the same way.

use async_trait::async_trait;

use crate::{ConfigurationResult, RepositoryKey, SettingsMap};

/// Read and write access to the global and per-repository settings maps.
///
/// Implementations must be safe to share between concurrent validations.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the global settings map.
    ///
    /// A store that has never been written returns an empty map.
    async fn global_settings(&self) -> ConfigurationResult<SettingsMap>;

    /// Load the settings map stored for a repository.
    ///
    /// Returns `Ok(None)` when the repository has no settings of its own.
    async fn repository_settings(
        &self,
        repository: &RepositoryKey,
    ) -> ConfigurationResult<Option<SettingsMap>>;

    /// Replace the global settings map.
    async fn save_global_settings(&self, settings: SettingsMap) -> ConfigurationResult<()>;

    /// Replace the settings map for a repository.
    async fn save_repository_settings(
        &self,
        repository: &RepositoryKey,
        settings: SettingsMap,
    ) -> ConfigurationResult<()>;
}
