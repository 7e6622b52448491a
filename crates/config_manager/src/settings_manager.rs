//! Settings manager.
//!
//! Ties the [`SettingsStore`], [`SettingsResolver`] and [`SettingsValidator`]
//! together: reads both layers and resolves them for validation, and guards
//! every save with save-time validation.

use std::sync::Arc;

use issue_tracker::IssueTracker;
use tracing::{debug, info, instrument, warn};

use crate::effective_settings::EffectiveSettings;
use crate::resolver::SettingsResolver;
use crate::settings::{GlobalSettings, RepositoryHookSettings, SettingsMap};
use crate::store::SettingsStore;
use crate::validator::{SettingsValidator, ValidationResult};
use crate::{ConfigurationResult, RepositoryKey};

#[cfg(test)]
#[path = "settings_manager_tests.rs"]
mod tests;

/// Loads, resolves and saves commit gate settings.
///
/// Cheap to clone; clones share the underlying store and tracker.
#[derive(Clone)]
pub struct SettingsManager {
    store: Arc<dyn SettingsStore>,
    resolver: SettingsResolver,
    validator: Arc<SettingsValidator>,
}

impl SettingsManager {
    /// Creates a manager over `store`, using `tracker` for save-time checks.
    pub fn new(store: Arc<dyn SettingsStore>, tracker: Arc<dyn IssueTracker>) -> Self {
        Self {
            store,
            resolver: SettingsResolver::new(),
            validator: Arc::new(SettingsValidator::new(tracker)),
        }
    }

    /// Effective settings for a repository.
    ///
    /// # Errors
    ///
    /// Store failures are returned unchanged. Callers validating a push treat
    /// them as a reason to reject.
    #[instrument(skip(self), fields(repository = %repository))]
    pub async fn effective_settings(
        &self,
        repository: &RepositoryKey,
    ) -> ConfigurationResult<EffectiveSettings> {
        let global = self.load_global().await?;
        let repository_settings = self
            .store
            .repository_settings(repository)
            .await?
            .map(|map| RepositoryHookSettings::from_map(&map));

        Ok(self
            .resolver
            .resolve(&global, repository_settings.as_ref()))
    }

    /// Effective settings when no repository layer applies.
    #[instrument(skip(self))]
    pub async fn global_effective_settings(&self) -> ConfigurationResult<EffectiveSettings> {
        let global = self.load_global().await?;
        Ok(self.resolver.resolve(&global, None))
    }

    /// Check global settings without saving them.
    pub async fn validate_global_settings(&self, settings: &SettingsMap) -> ValidationResult {
        self.validator
            .validate_global(&GlobalSettings::from_map(settings))
            .await
    }

    /// Check repository settings without saving them.
    pub async fn validate_repository_settings(&self, settings: &SettingsMap) -> ValidationResult {
        self.validator
            .validate_repository(&RepositoryHookSettings::from_map(settings).settings)
            .await
    }

    /// Validate and persist the global settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ValidationFailed` and writes nothing when
    /// any field is invalid.
    #[instrument(skip(self, settings))]
    pub async fn save_global_settings(&self, settings: SettingsMap) -> ConfigurationResult<()> {
        let parsed = GlobalSettings::from_map(&settings);
        let result = self.validator.validate_global(&parsed).await;
        if !result.is_valid() {
            warn!(
                fields = ?result.field_ids(),
                "Rejected invalid global settings"
            );
            return result.into_result();
        }

        self.store.save_global_settings(parsed.to_map()).await?;
        info!("Saved global settings");
        Ok(())
    }

    /// Validate and persist the settings of one repository.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ValidationFailed` and writes nothing when
    /// any field is invalid.
    #[instrument(skip(self, settings), fields(repository = %repository))]
    pub async fn save_repository_settings(
        &self,
        repository: &RepositoryKey,
        settings: SettingsMap,
    ) -> ConfigurationResult<()> {
        let parsed = RepositoryHookSettings::from_map(&settings);
        let result = self.validator.validate_repository(&parsed.settings).await;
        if !result.is_valid() {
            warn!(
                fields = ?result.field_ids(),
                "Rejected invalid repository settings"
            );
            return result.into_result();
        }

        self.store
            .save_repository_settings(repository, parsed.to_map())
            .await?;
        info!("Saved repository settings");
        Ok(())
    }

    async fn load_global(&self) -> ConfigurationResult<GlobalSettings> {
        let map = self.store.global_settings().await?;
        debug!(keys = map.len(), "Loaded global settings");
        Ok(GlobalSettings::from_map(&map))
    }
}
