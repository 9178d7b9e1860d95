//! Proposal validation and edit planning.
//!
//! `plan` takes an ordered sequence of untrusted edit proposals, resolves
//! each against one source text, and produces a single safe transformation:
//! - one bad proposal never blocks independent, valid ones
//! - overlapping edits are rejected, never silently merged
//! - accepted spans apply left-to-right regardless of proposal order
//! - verification failure aborts the whole apply with zero partial results

mod loader;

use crate::apply::{self, SpanEdit};
use crate::error::Result;
use crate::locate::{self, AnchorPlacement, LocateOutcome, Span};
use crate::source::SourceText;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use loader::load_proposals_from_file;

/// Anchor for a pure insertion (a proposal with an empty old snippet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionAnchor {
    /// Snippet to resolve as the reference point.
    pub snippet: String,
    /// Which side of the anchor the insertion lands on.
    pub placement: AnchorPlacement,
}

/// A candidate change produced by the upstream analysis collaborator.
///
/// Proposals are untrusted input: the snippet may be absent from the file,
/// present more than once, or collide with another proposal. All of those
/// are reported as [`FailureReason`] data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditProposal {
    /// Text to replace. Empty for a pure insertion, which requires `anchor`.
    pub old_snippet: String,
    /// Replacement text.
    pub new_snippet: String,
    /// Reference point for pure insertions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<InsertionAnchor>,
    /// Optional free-text justification from the proposal's author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl EditProposal {
    /// Create a plain replacement proposal.
    pub fn replacement(old_snippet: impl Into<String>, new_snippet: impl Into<String>) -> Self {
        Self {
            old_snippet: old_snippet.into(),
            new_snippet: new_snippet.into(),
            anchor: None,
            rationale: None,
        }
    }

    /// Create a pure insertion proposal next to an anchor snippet.
    pub fn insertion(
        new_snippet: impl Into<String>,
        anchor_snippet: impl Into<String>,
        placement: AnchorPlacement,
    ) -> Self {
        Self {
            old_snippet: String::new(),
            new_snippet: new_snippet.into(),
            anchor: Some(InsertionAnchor {
                snippet: anchor_snippet.into(),
                placement,
            }),
            rationale: None,
        }
    }

    /// True when old and new snippets are identical (no text change).
    pub fn is_identity(&self) -> bool {
        self.old_snippet == self.new_snippet
    }
}

/// Why a single proposal could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The snippet does not occur in the file under any strategy.
    #[error("snippet not found in file")]
    NotFound,
    /// The snippet occurs this many times with no disambiguating strategy.
    #[error("snippet matches {0} locations; a unique match is required")]
    Ambiguous(usize),
    /// The resolved span collides with an earlier accepted edit.
    #[error("resolved span overlaps an earlier accepted edit")]
    Overlap,
    /// A pure insertion arrived without an anchor.
    #[error("insertion proposal has an empty old snippet and no anchor")]
    MissingAnchor,
    /// The materialized text failed the post-apply sanity checks; the whole
    /// apply was aborted and the original text preserved.
    #[error("verification failed: {0}")]
    VerificationFailed(String),
}

/// One proposal that could not be applied, with its reason.
#[derive(Debug, Clone)]
pub struct ProposalFailure {
    /// The rejected proposal.
    pub proposal: EditProposal,
    /// Why it was rejected.
    pub reason: FailureReason,
}

/// One proposal that was applied.
#[derive(Debug, Clone)]
pub struct AppliedEdit {
    /// Index of the proposal in the input sequence.
    pub proposal_index: usize,
    /// Resolved span into the original text. `None` for identity no-ops,
    /// which are accepted without being located.
    pub span: Option<Span>,
    /// The replacement text that landed in the span.
    pub replacement: String,
}

/// Terminal result of one apply cycle. Never mutated after return.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// True when every proposal was applied and verification passed.
    pub success: bool,
    /// The transformed text. `Some` exactly when at least one proposal was
    /// applied and verification passed; absent otherwise, leaving the
    /// caller with the untouched original.
    pub new_text: Option<SourceText>,
    /// Proposals that were applied, in staging order.
    pub applied: Vec<AppliedEdit>,
    /// Proposals that were rejected, in input order.
    pub failures: Vec<ProposalFailure>,
}

impl ApplyOutcome {
    /// Number of proposals applied (identity no-ops included).
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    /// Total number of proposals this outcome accounts for.
    pub fn proposal_count(&self) -> usize {
        self.applied.len() + self.failures.len()
    }
}

/// Resolve, stage, and materialize a sequence of proposals against one
/// source text.
///
/// The returned outcome is all-or-nothing per proposal and all-or-nothing
/// for verification: a failed proposal is recorded and skipped, while a
/// failed verification discards the produced text entirely. Nothing here
/// touches persistent storage.
pub fn plan(source: &SourceText, proposals: &[EditProposal]) -> Result<ApplyOutcome> {
    let text = source.as_str();
    let mut staged: Vec<SpanEdit> = Vec::new();
    let mut applied: Vec<AppliedEdit> = Vec::new();
    let mut failures: Vec<ProposalFailure> = Vec::new();

    for (index, proposal) in proposals.iter().enumerate() {
        // Identity proposals are accepted trivially: the replacement is the
        // identity function wherever the snippet sits, so locating it would
        // only add failure modes without changing the output.
        if proposal.is_identity() && proposal.anchor.is_none() {
            log::debug!("Proposal {} is an identity no-op", index + 1);
            applied.push(AppliedEdit {
                proposal_index: index,
                span: None,
                replacement: proposal.new_snippet.clone(),
            });
            continue;
        }

        let outcome = if proposal.old_snippet.is_empty() {
            match &proposal.anchor {
                Some(anchor) => {
                    locate::locate_insertion(text, &anchor.snippet, anchor.placement)
                }
                None => {
                    failures.push(ProposalFailure {
                        proposal: proposal.clone(),
                        reason: FailureReason::MissingAnchor,
                    });
                    continue;
                }
            }
        } else {
            locate::locate(text, &proposal.old_snippet)
        };

        let span = match outcome {
            LocateOutcome::Unique(span) => span,
            LocateOutcome::NotFound => {
                log::debug!("Proposal {} snippet not found", index + 1);
                failures.push(ProposalFailure {
                    proposal: proposal.clone(),
                    reason: FailureReason::NotFound,
                });
                continue;
            }
            LocateOutcome::Ambiguous(count) => {
                log::debug!("Proposal {} ambiguous ({} matches)", index + 1, count);
                failures.push(ProposalFailure {
                    proposal: proposal.clone(),
                    reason: FailureReason::Ambiguous(count),
                });
                continue;
            }
        };

        if staged.iter().any(|edit| edit.span.overlaps(&span)) {
            failures.push(ProposalFailure {
                proposal: proposal.clone(),
                reason: FailureReason::Overlap,
            });
            continue;
        }

        staged.push(SpanEdit {
            span,
            replacement: proposal.new_snippet.clone(),
            proposal_index: index,
        });
    }

    // Edits apply left-to-right so offsets computed against the original
    // text stay valid; proposal order no longer matters past this point.
    staged.sort_by_key(|edit| (edit.span.start, edit.span.end));

    let produced = apply::materialize(text, &staged)?;

    if let Err(detail) = apply::verify(text, &staged, &produced) {
        log::error!("Apply verification failed: {}", detail);
        for edit in staged {
            failures.push(ProposalFailure {
                proposal: proposals[edit.proposal_index].clone(),
                reason: FailureReason::VerificationFailed(detail.clone()),
            });
        }
        return Ok(ApplyOutcome {
            success: false,
            new_text: None,
            applied,
            failures,
        });
    }

    for edit in &staged {
        applied.push(AppliedEdit {
            proposal_index: edit.proposal_index,
            span: Some(edit.span),
            replacement: edit.replacement.clone(),
        });
    }

    let new_text = if applied.is_empty() {
        None
    } else {
        Some(SourceText::new(produced))
    };

    Ok(ApplyOutcome {
        success: failures.is_empty(),
        new_text,
        applied,
        failures,
    })
}
