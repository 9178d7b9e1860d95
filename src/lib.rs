//! Graft: snippet-anchored patch engine for AI-proposed code edits.
//!
//! This library takes free-text edit proposals ("replace this snippet with
//! that snippet") and applies them to a real file whose content may have
//! drifted from what the proposal's author assumed. Ambiguity and drift are
//! first-class outcomes, not exceptions: a snippet that matches nowhere, or
//! in more than one place, is reported as data so the caller can decide what
//! to do instead of silently corrupting the file.

#![warn(missing_docs)]

pub mod apply;
pub mod cli;
pub mod error;
pub mod locate;
pub mod plan;
pub mod report;
pub mod source;
pub mod workspace;

/// Re-export common error types for convenience.
pub use error::{GraftError, Result};

/// Re-export the planner entry point and its data model.
pub use plan::{plan, ApplyOutcome, EditProposal, FailureReason};

/// Re-export the source text container.
pub use source::SourceText;

/// Graft version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
