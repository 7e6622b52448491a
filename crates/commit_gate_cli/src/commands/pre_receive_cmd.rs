//! `commit-gate pre-receive`: the git hook entry point.
//!
//! Install as `hooks/pre-receive`:
//!
//! ```bash
//! #!/bin/sh
//! exec commit-gate pre-receive
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use commit_gate_core::PushEvent;
use tracing::{debug, instrument};

use super::{write_lines, Decision};
use crate::config::resolve_pusher;
use crate::errors::Error;
use crate::gate::RepositoryGate;
use crate::hook::read_ref_changes;

#[cfg(test)]
#[path = "pre_receive_cmd_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone, Default)]
pub struct PreReceiveArgs {
    /// Repository receiving the push. Defaults to the repository git runs
    /// the hook in.
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Authenticated user performing the push.
    #[arg(long)]
    pub user: Option<String>,

    /// Directory holding `global.toml`, `repositories/` and `users.toml`.
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

/// Validate the ref updates on `input` and write any report to `output`.
#[instrument(skip_all, fields(repo = ?args.repo))]
pub async fn execute(
    args: &PreReceiveArgs,
    input: impl BufRead,
    output: &mut impl Write,
) -> Result<Decision, Error> {
    let ref_changes = read_ref_changes(input)?;
    if ref_changes.is_empty() {
        debug!("No ref updates to validate");
        return Ok(Decision::Allow);
    }

    let pusher = resolve_pusher(args.user.as_deref())?;
    let gate = RepositoryGate::open(args.repo.as_deref(), args.config_dir.as_deref())?;
    let event = PushEvent {
        repository: gate.repository.clone(),
        pusher,
        ref_changes,
    };

    let report = gate.orchestrator.on_commits_added(&event).await;
    write_lines(output, &report.lines())?;
    Ok(Decision::from_allowed(report.is_allowed()))
}
