//! `commit-gate validate-config`: save-time checks for a settings file.
//!
//! Runs the same checks a settings save does, without writing anything.
//! Without an issue tracker a JQL filter or override user cannot be
//! verified and is reported as an error.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use config_manager::{
    parse_settings, GlobalSettings, RepositoryHookSettings, SettingsValidator,
};
use issue_tracker::UnconfiguredTracker;
use tracing::{info, instrument};

use super::{write_lines, Decision};
use crate::errors::Error;

#[cfg(test)]
#[path = "validate_config_cmd_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone)]
pub struct ValidateConfigArgs {
    /// TOML settings file to check.
    pub file: PathBuf,

    /// Check the file as global settings instead of repository settings.
    #[arg(long)]
    pub global: bool,
}

#[instrument(skip_all, fields(file = %args.file.display(), global = args.global))]
pub async fn execute(args: &ValidateConfigArgs, output: &mut impl Write) -> Result<Decision, Error> {
    let content = tokio::fs::read_to_string(&args.file).await?;
    let map = parse_settings(&content).map_err(|e| Error::Config(e.to_string()))?;

    let validator = SettingsValidator::new(Arc::new(UnconfiguredTracker::new()));
    let result = if args.global {
        validator
            .validate_global(&GlobalSettings::from_map(&map))
            .await
    } else {
        validator
            .validate_repository(&RepositoryHookSettings::from_map(&map).settings)
            .await
    };

    let lines: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
    write_lines(output, &lines)?;

    info!(errors = lines.len(), "Validated settings file");
    Ok(Decision::from_allowed(result.is_valid()))
}
