//! # Commit Gate Core
//!
//! Validation engine that decides whether a push or a branch creation is
//! accepted.
//!
//! ## Overview
//!
//! A host (a git hook, a server plugin) hands the engine a [`PushEvent`] or a
//! [`BranchCreationRequest`]. The [`ValidationOrchestrator`]:
//! 1. Resolves the effective settings for the repository
//! 2. Compiles the configured patterns once for the request
//! 3. Finds the commits the push introduces through a [`CommitGraph`]
//! 4. Runs the [`CommitValidator`] on each new commit and the
//!    [`BranchValidator`] on new branches
//! 5. Returns a [`ViolationReport`]; an empty report allows the request
//!
//! Collaborators (settings store, issue tracker, identity service, commit
//! graph) are injected as trait objects. Their failures reject the request
//! with a violation naming the problem.
//!
//! ## Examples
//!
//! ```no_run
//! use commit_gate_core::{PushEvent, ValidationOrchestrator};
//!
//! # async fn example(orchestrator: ValidationOrchestrator, event: PushEvent) {
//! let report = orchestrator.on_commits_added(&event).await;
//! for line in report.lines() {
//!     eprintln!("{}", line);
//! }
//! # }
//! ```

pub mod branch;
pub mod branch_validator;
pub mod commit;
pub mod commit_validator;
pub mod errors;
pub mod graph;
pub mod identity;
pub mod issue_checker;
pub mod messages;
pub mod orchestrator;
pub mod rules;
pub mod violation;

pub use branch::{Branch, BranchCreationRequest, BranchCreationVeto};
pub use branch_validator::BranchValidator;
pub use commit::{short_id, short_ref_name, Commit, Person, PushEvent, RefChange, RefChangeType};
pub use commit_validator::{CommitValidator, PusherIdentity};
pub use errors::{GateError, GateResult};
pub use graph::CommitGraph;
pub use identity::{IdentityService, VerifiedIdentity};
pub use issue_checker::{IssueFinding, IssueKeyChecker};
pub use orchestrator::{ValidationOptions, ValidationOrchestrator, DEFAULT_TRACKER_TIMEOUT};
pub use rules::CompiledRules;
pub use violation::{ValidationOutcome, Violation, ViolationKind, ViolationReport};
