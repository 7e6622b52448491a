//! Where the hook finds its configuration and who it is running for.
//!
//! Settings live in a configuration directory laid out for
//! [`config_manager::FileSettingsStore`], next to a `users.toml` identity
//! directory. The directory is taken from `--config-dir`, then
//! `COMMIT_GATE_CONFIG_DIR`, then `$GIT_DIR/commit-gate`.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Error;

/// Environment variable naming the configuration directory.
pub const CONFIG_DIR_ENV: &str = "COMMIT_GATE_CONFIG_DIR";

/// Configuration directory name inside `$GIT_DIR` when nothing else is set.
pub const DEFAULT_CONFIG_DIR_NAME: &str = "commit-gate";

/// Identity directory file inside the configuration directory.
pub const USERS_FILENAME: &str = "users.toml";

/// Environment variables consulted for the pushing user, in order.
pub const PUSHER_ENV_VARS: [&str; 3] = ["COMMIT_GATE_USER", "GL_USERNAME", "USER"];

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Resolve the configuration directory for a repository whose git directory
/// is `git_dir`.
pub fn resolve_config_dir(flag: Option<&Path>, git_dir: &Path) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }

    if let Some(dir) = non_blank_env(CONFIG_DIR_ENV) {
        debug!(env = CONFIG_DIR_ENV, dir = %dir, "Using configuration directory from environment");
        return PathBuf::from(dir);
    }

    git_dir.join(DEFAULT_CONFIG_DIR_NAME)
}

/// Resolve the authenticated user performing the push.
///
/// `--user` wins; otherwise the first non-blank variable in
/// [`PUSHER_ENV_VARS`] is used.
pub fn resolve_pusher(flag: Option<&str>) -> Result<String, Error> {
    if let Some(user) = flag.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(user.to_string());
    }

    PUSHER_ENV_VARS
        .iter()
        .find_map(|name| non_blank_env(name))
        .ok_or_else(|| {
            Error::Config(format!(
                "Unable to determine the pushing user; pass --user or set {}",
                PUSHER_ENV_VARS[0]
            ))
        })
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
