use std::io;

use clap::{Parser, Subcommand};
use commit_gate_cli::commands::check_branch_cmd::{self, CheckBranchArgs};
use commit_gate_cli::commands::pre_receive_cmd::{self, PreReceiveArgs};
use commit_gate_cli::commands::validate_config_cmd::{self, ValidateConfigArgs};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// Exit code for failures that prevented a decision.
const EXIT_ERROR: i32 = 2;

/// Commit Gate: reject pushes that break the repository's commit rules
#[derive(Parser)]
#[command(name = "commit-gate")]
#[command(about = "Validate pushes and branches against commit rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate ref updates read from stdin, as a pre-receive hook
    PreReceive(PreReceiveArgs),

    /// Validate a branch name before the branch is created
    CheckBranch(CheckBranchArgs),

    /// Check a settings file the way saving it would
    ValidateConfig(ValidateConfigArgs),

    /// Show the CLI version
    Version,
}

#[tokio::main]
async fn main() {
    // Hook output goes to the pusher's terminal; keep logs on stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("COMMIT_GATE_LOG"))
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::PreReceive(args) => {
            pre_receive_cmd::execute(args, io::stdin().lock(), &mut io::stderr()).await
        }
        Commands::CheckBranch(args) => check_branch_cmd::execute(args, &mut io::stderr()).await,
        Commands::ValidateConfig(args) => {
            validate_config_cmd::execute(args, &mut io::stdout()).await
        }
        Commands::Version => {
            println!(
                "commit-gate version {}",
                option_env!("COMMIT_GATE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
            std::process::exit(0);
        }
    };

    match result {
        Ok(decision) => std::process::exit(decision.exit_code()),
        Err(e) => {
            error!("Error: {e}");
            eprintln!("commit-gate: {e}");
            std::process::exit(EXIT_ERROR);
        }
    }
}
