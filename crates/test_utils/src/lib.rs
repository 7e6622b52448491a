//! Test utilities shared by the commit gate crates.
//!
//! Provides in-memory implementations of every capability the validation
//! engine depends on, builders for commits and settings, and a scratch git
//! repository for exercising the hook adapter.

pub mod builders;
pub mod fakes;
pub mod git;

pub use builders::{CommitBuilder, settings_map};
pub use fakes::{
    InMemoryCommitGraph, InMemorySettingsStore, RecordingVeto, StaticIdentityService,
    StubIssueTracker,
};
pub use git::GitFixture;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
