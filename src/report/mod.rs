//! Human-readable and structured summaries of an apply cycle.
//!
//! Purely descriptive: nothing here changes behavior. The text summary
//! feeds commit messages, change-request bodies, and operator logs; the
//! serializable per-edit statistics feed the CLI's JSON output.

use crate::plan::ApplyOutcome;
use crate::source::SourceText;
use ropey::Rope;
use serde::Serialize;

/// Per-edit change accounting, in the shape commit tooling expects.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeStat {
    /// 1-based line number where the change begins.
    pub line_start: usize,
    /// 1-based line number where the change ends.
    pub line_end: usize,
    /// Number of lines added by the edit.
    pub lines_added: usize,
    /// Number of lines removed by the edit.
    pub lines_removed: usize,
    /// Number of bytes inserted.
    pub bytes_added: usize,
    /// Number of bytes removed.
    pub bytes_removed: usize,
}

/// Produce one summary line per applied edit and per failure, plus an
/// `applied M of N proposals` trailer.
pub fn summarize(original: &SourceText, outcome: &ApplyOutcome) -> String {
    let mut lines = Vec::new();

    for edit in &outcome.applied {
        match edit.span {
            Some(span) if span.is_empty() => {
                lines.push(format!(
                    "inserted {} chars at line {}",
                    edit.replacement.chars().count(),
                    original.line_of(span.start)
                ));
            }
            Some(span) => {
                let removed = original.as_str()[span.start..span.end].chars().count();
                lines.push(format!(
                    "replaced {} chars at line {}",
                    removed,
                    original.line_of(span.start)
                ));
            }
            None => {
                lines.push(format!(
                    "no-op edit for proposal {} (old and new identical)",
                    edit.proposal_index + 1
                ));
            }
        }
    }

    for failure in &outcome.failures {
        lines.push(format!(
            "failed: {} (snippet: {})",
            failure.reason,
            snippet_preview(&failure.proposal.old_snippet)
        ));
    }

    lines.push(format!(
        "applied {} of {} proposals",
        outcome.applied_count(),
        outcome.proposal_count()
    ));

    lines.join("\n")
}

/// Per-edit line and byte accounting against the original text.
pub fn change_stats(original: &SourceText, outcome: &ApplyOutcome) -> Vec<ChangeStat> {
    let rope = Rope::from_str(original.as_str());
    let mut stats = Vec::new();

    for edit in &outcome.applied {
        let span = match edit.span {
            Some(span) => span,
            // Identity no-ops change nothing and report nothing.
            None => continue,
        };

        let start_line = rope.byte_to_line(span.start);
        let end_line = if span.is_empty() {
            start_line
        } else {
            rope.byte_to_line(span.end.saturating_sub(1))
        };

        let removed_text = &original.as_str()[span.start..span.end];
        let lines_removed = if span.is_empty() {
            0
        } else {
            removed_text.lines().count()
        };
        let lines_added = if edit.replacement.is_empty() {
            0
        } else {
            edit.replacement.lines().count()
        };

        stats.push(ChangeStat {
            line_start: start_line + 1,
            line_end: end_line + 1,
            lines_added,
            lines_removed,
            bytes_added: edit.replacement.len(),
            bytes_removed: span.len(),
        });
    }

    stats
}

/// First line of a snippet, capped for log readability.
fn snippet_preview(snippet: &str) -> String {
    const MAX: usize = 40;
    let first_line = snippet.lines().next().unwrap_or("");
    let mut preview: String = first_line.chars().take(MAX).collect();
    if snippet.len() > preview.len() {
        preview.push_str("...");
    }
    if preview.is_empty() {
        preview.push_str("<empty>");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{plan, EditProposal};

    #[test]
    fn test_summarize_replacement_and_failure() {
        let source = SourceText::new("def f():\n    return 1\n");
        let proposals = [
            EditProposal::replacement("return 1", "return 2"),
            EditProposal::replacement("missing", "nothing"),
        ];
        let outcome = plan(&source, &proposals).expect("Failed to plan");

        let summary = summarize(&source, &outcome);

        assert!(summary.contains("replaced 8 chars at line 2"));
        assert!(summary.contains("failed: snippet not found in file"));
        assert!(summary.contains("applied 1 of 2 proposals"));
    }

    #[test]
    fn test_change_stats_accounting() {
        let source = SourceText::new("aaa\nbbb\nccc\n");
        let proposals = [EditProposal::replacement("bbb\n", "BB\nB2\n")];
        let outcome = plan(&source, &proposals).expect("Failed to plan");

        let stats = change_stats(&source, &outcome);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].line_start, 2);
        assert_eq!(stats[0].line_end, 2);
        assert_eq!(stats[0].lines_removed, 1);
        assert_eq!(stats[0].lines_added, 2);
        assert_eq!(stats[0].bytes_removed, 4);
        assert_eq!(stats[0].bytes_added, 6);
    }

    #[test]
    fn test_snippet_preview_caps_length() {
        let long = "x".repeat(100);
        let preview = snippet_preview(&long);
        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= 43);
    }
}
