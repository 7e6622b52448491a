//! `commit-gate check-branch`: validates a branch before it is created.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use commit_gate_core::{Branch, BranchCreationRequest, BranchCreationVeto};
use tracing::instrument;

use super::{write_lines, Decision};
use crate::errors::Error;
use crate::gate::RepositoryGate;

#[cfg(test)]
#[path = "check_branch_cmd_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone)]
pub struct CheckBranchArgs {
    /// Branch name, short (`feature/x`) or full (`refs/heads/feature/x`).
    pub name: String,

    /// Repository the branch would be created in.
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Directory holding `global.toml` and `repositories/`.
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

/// Keeps the cancellation message so it can be printed.
#[derive(Debug, Default)]
struct CapturedVeto {
    reason: Option<String>,
}

impl BranchCreationVeto for CapturedVeto {
    fn cancel(&mut self, reason: String) {
        self.reason = Some(reason);
    }
}

#[instrument(skip_all, fields(branch = %args.name))]
pub async fn execute(args: &CheckBranchArgs, output: &mut impl Write) -> Result<Decision, Error> {
    let gate = RepositoryGate::open(args.repo.as_deref(), args.config_dir.as_deref())?;
    let request = BranchCreationRequest {
        repository: gate.repository.clone(),
        branch: Branch::new(args.name.as_str()),
        target: None,
    };

    let outcome = gate.orchestrator.on_branch_creation(&request).await;
    let mut veto = CapturedVeto::default();
    outcome.apply_to(&mut veto);

    match veto.reason {
        Some(reason) => {
            write_lines(output, &[reason])?;
            Ok(Decision::Reject)
        }
        None => Ok(Decision::Allow),
    }
}
