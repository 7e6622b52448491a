use config_manager::ConfigurationError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Failures of the capabilities the gate depends on.
///
/// The orchestrator turns every one of these into a violation; they are
/// only returned directly by capability implementations and adapters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("Commit graph query failed for {repository}: {reason}")]
    CommitGraph { repository: String, reason: String },

    #[error("Unable to resolve a verified identity for '{user}': {reason}")]
    Identity { user: String, reason: String },

    #[error("Unable to load settings: {0}")]
    Settings(#[from] ConfigurationError),

    #[error("Invalid repository: {0}")]
    InvalidRepository(String),
}

pub type GateResult<T> = Result<T, GateError>;
