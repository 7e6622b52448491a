//! Command implementations for the `commit-gate` binary.
//!
//! - `pre_receive_cmd`: validates a push from a git `pre-receive` hook
//! - `check_branch_cmd`: validates a branch name before it is created
//! - `validate_config_cmd`: checks a settings file before it is installed

pub mod check_branch_cmd;
pub mod pre_receive_cmd;
pub mod validate_config_cmd;

use std::io::Write;

use crate::errors::Error;

/// What a command decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Reject,
}

impl Decision {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Reject
        }
    }

    /// Process exit code; git refuses the push on anything but zero.
    pub fn exit_code(self) -> i32 {
        match self {
            Decision::Allow => 0,
            Decision::Reject => 1,
        }
    }
}

fn write_lines(output: &mut impl Write, lines: &[String]) -> Result<(), Error> {
    for line in lines {
        writeln!(output, "{}", line)?;
    }
    output.flush()?;
    Ok(())
}
