//! `commit-gate` command line adapter.
//!
//! Runs the validation engine from a git `pre-receive` hook against a local
//! repository, and exposes branch and settings checks for administrators.
//! The command implementations are public so they can be driven from tests.

pub mod commands;
pub mod config;
pub mod errors;
pub mod gate;
pub mod git;
pub mod hook;
pub mod identity;
