//! Span-safe materialization of staged edits.
//!
//! This module turns a sorted, non-overlapping set of span edits into new
//! text with a single left-to-right pass, then re-verifies the result:
//! - byte-length invariant (`len(produced) == len(original) - removed +
//!   inserted`)
//! - no control characters in the output that were absent from both the
//!   original and every replacement
//!
//! Verification failure means the materialization itself is untrustworthy;
//! the caller discards the produced text and keeps the original. No
//! persistent-storage I/O happens here — writing belongs to the caller, and
//! only after a successful outcome.

use crate::error::{GraftError, Result};
use crate::locate::Span;

/// One staged replacement: a resolved span and the text that replaces it.
#[derive(Debug, Clone)]
pub struct SpanEdit {
    /// Resolved span into the original text.
    pub span: Span,
    /// Replacement contents (may be empty for a deletion).
    pub replacement: String,
    /// Index of the proposal this edit came from.
    pub proposal_index: usize,
}

/// Materialize the new text from sorted, non-overlapping edits.
///
/// Walks the edits once, left to right, concatenating the unedited gap
/// before each span, the span's replacement, and finally the unedited tail.
/// This linear pass is why overlap must be rejected beforehand: it keeps
/// every offset computed against the original text valid throughout.
///
/// Out-of-bounds spans, spans off a character boundary, and unsorted or
/// overlapping input are caller bugs and surface as hard errors.
pub fn materialize(original: &str, edits: &[SpanEdit]) -> Result<String> {
    let removed: usize = edits.iter().map(|edit| edit.span.len()).sum();
    let inserted: usize = edits.iter().map(|edit| edit.replacement.len()).sum();
    let mut produced = String::with_capacity((original.len() + inserted).saturating_sub(removed));

    let mut cursor = 0;
    for edit in edits {
        let span = edit.span;
        if span.start > span.end || span.end > original.len() {
            return Err(GraftError::InvalidSpan {
                start: span.start,
                end: span.end,
                len: original.len(),
            });
        }
        if !original.is_char_boundary(span.start) || !original.is_char_boundary(span.end) {
            return Err(GraftError::InvalidSpan {
                start: span.start,
                end: span.end,
                len: original.len(),
            });
        }
        if span.start < cursor {
            return Err(GraftError::Other(
                "Staged edits are unsorted or overlapping".to_string(),
            ));
        }

        produced.push_str(&original[cursor..span.start]);
        produced.push_str(&edit.replacement);
        cursor = span.end;
    }
    produced.push_str(&original[cursor..]);

    Ok(produced)
}

/// Re-verify a materialized text against the edits that produced it.
///
/// Returns a human-readable reason on failure; the caller maps it to a
/// proposal-level `VerificationFailed` and discards the produced text.
pub fn verify(
    original: &str,
    edits: &[SpanEdit],
    produced: &str,
) -> std::result::Result<(), String> {
    let removed: usize = edits.iter().map(|edit| edit.span.len()).sum();
    let inserted: usize = edits.iter().map(|edit| edit.replacement.len()).sum();
    let expected = original.len() - removed + inserted;

    if produced.len() != expected {
        return Err(format!(
            "length check failed: expected {} bytes, produced {}",
            expected,
            produced.len()
        ));
    }

    for ch in produced.chars() {
        if !is_forbidden_control(ch) {
            continue;
        }
        let carried_over = original.contains(ch)
            || edits.iter().any(|edit| edit.replacement.contains(ch));
        if !carried_over {
            log::warn!(
                "Verification rejected foreign control character U+{:04X}",
                ch as u32
            );
            return Err(format!(
                "control character U+{:04X} absent from every input",
                ch as u32
            ));
        }
    }

    Ok(())
}

/// Control characters other than tab, newline, and carriage return are
/// never legitimate in source text unless an input carried them.
fn is_forbidden_control(ch: char) -> bool {
    ch.is_control() && ch != '\n' && ch != '\t' && ch != '\r'
}
