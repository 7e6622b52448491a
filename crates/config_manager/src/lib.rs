//! Settings for the commit gate.
//!
//! Settings live in two layers: a global layer and an optional layer per
//! repository. This crate parses both layers from loosely typed maps, merges
//! them into [`EffectiveSettings`], compiles their regular expressions, and
//! validates settings before they are saved.
//!
//! # Components
//!
//! - [`SettingsResolver`] merges the layers field by field
//! - [`PatternMatcher`] compiles pattern settings with a size limit
//! - [`SettingsValidator`] performs save-time validation
//! - [`SettingsStore`] abstracts persistence, with [`FileSettingsStore`] for TOML files
//! - [`SettingsManager`] ties the above together

pub mod effective_settings;
pub mod errors;
pub mod file_store;
pub mod pattern;
pub mod repository_key;
pub mod resolver;
pub mod settings;
pub mod settings_manager;
pub mod store;
pub mod validator;

pub use effective_settings::{EffectiveSettings, ErrorMessages, SettingScope, SettingsSourceTrace};
pub use errors::{ConfigurationError, ConfigurationResult};
pub use file_store::{parse_settings, FileSettingsStore};
pub use pattern::{CompiledPattern, PatternMatcher, PATTERN_SIZE_LIMIT};
pub use repository_key::RepositoryKey;
pub use resolver::SettingsResolver;
pub use settings::{
    GlobalSettings, HookSettings, RepositoryHookSettings, SettingField, SettingValue,
    SettingsMap, ENABLED_KEY, OVERRIDE_JIRA_USER_ENABLED_KEY, OVERRIDE_JIRA_USER_TEXT_KEY,
};
pub use settings_manager::SettingsManager;
pub use store::SettingsStore;
pub use validator::{SettingsValidator, ValidationError, ValidationResult};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
