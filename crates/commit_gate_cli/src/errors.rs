use std::io;

use commit_gate_core::GateError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that stop the `commit-gate` binary before it reaches a decision.
///
/// A rejected push is not an error. These cover the cases where the hook
/// could not run at all; `main` maps them to exit code 2.
#[derive(Error, Debug)]
pub enum Error {
    /// The CLI's own configuration could not be loaded or is incomplete.
    ///
    /// Returned for unreadable or malformed `users.toml` files, settings
    /// files that are not valid TOML, and a pusher that cannot be determined.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A git operation failed, usually while opening the repository.
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line on standard input is not `<old> <new> <ref>`.
    #[error("Invalid hook input '{line}': {reason}")]
    InvalidHookInput { line: String, reason: String },

    /// The repository cannot be mapped onto a gate repository key.
    #[error(transparent)]
    Gate(#[from] GateError),
}
