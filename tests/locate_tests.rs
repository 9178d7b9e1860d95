//! Integration tests for snippet location.
//!
//! These tests validate the strategy ladder (exact, whitespace-normalized,
//! line-trimmed), the uniqueness rule, and anchor-based insertion points.

use graft::locate::{locate, locate_insertion, AnchorPlacement, LocateOutcome};

fn expect_unique(haystack: &str, needle: &str) -> (usize, usize) {
    match locate(haystack, needle) {
        LocateOutcome::Unique(span) => (span.start, span.end),
        other => panic!("Expected unique match for {:?}, got {:?}", needle, other),
    }
}

#[test]
fn test_exact_unique_span_matches_needle_verbatim() {
    let haystack = "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n";
    let (start, end) = expect_unique(haystack, "a + b");
    assert_eq!(&haystack[start..end], "a + b");
}

#[test]
fn test_verbatim_duplicates_are_never_unique() {
    let haystack = "x = 1\nprint(x)\nx = 1\nprint(x)\nx = 1\n";
    assert_eq!(locate(haystack, "x = 1"), LocateOutcome::Ambiguous(3));
    assert_eq!(locate(haystack, "print(x)"), LocateOutcome::Ambiguous(2));
}

#[test]
fn test_absent_snippet_is_not_found() {
    let haystack = "fn main() {}\n";
    assert_eq!(locate(haystack, "fn helper()"), LocateOutcome::NotFound);
}

#[test]
fn test_indentation_drift_resolves_to_true_bytes() {
    // The proposal "saw" two-space indentation; the file uses four.
    let haystack = "def check(x):\n    if x:\n        return 1\n    return 0\n";
    let needle = "if x:\n    return 1";
    let (start, end) = expect_unique(haystack, needle);
    assert_eq!(&haystack[start..end], "if x:\n        return 1");
}

#[test]
fn test_trailing_whitespace_drift_resolves() {
    // The file carries trailing spaces the proposal never saw.
    let haystack = "alpha = 1  \nbeta = 2\n";
    let (start, end) = expect_unique(haystack, "alpha = 1\nbeta = 2");
    assert!(haystack[start..end].starts_with("alpha = 1"));
    assert!(haystack[start..end].ends_with("beta = 2"));
}

#[test]
fn test_fully_reindented_block_resolves_via_line_trimming() {
    let haystack = "impl Widget {\n    fn draw(&self) {\n        self.paint();\n    }\n}\n";
    let needle = "fn draw(&self) {\nself.paint();\n}";
    let (start, end) = expect_unique(haystack, needle);
    let matched = &haystack[start..end];
    assert!(matched.trim_start().starts_with("fn draw"));
    assert!(matched.ends_with('}'));
}

#[test]
fn test_drifted_snippet_duplicated_is_still_ambiguous() {
    // Both copies differ from the needle only in indentation; neither
    // strategy may pick one silently.
    let haystack = "  do_it()\nother\n    do_it()\n";
    assert_eq!(locate(haystack, "\tdo_it()"), LocateOutcome::Ambiguous(2));
}

#[test]
fn test_insertion_point_after_anchor() {
    let haystack = "use std::fs;\nuse std::path::Path;\n";
    match locate_insertion(haystack, "use std::fs;\n", AnchorPlacement::After) {
        LocateOutcome::Unique(span) => {
            assert_eq!(span.start, span.end);
            assert_eq!(span.start, "use std::fs;\n".len());
        }
        other => panic!("Expected unique insertion point, got {:?}", other),
    }
}

#[test]
fn test_insertion_point_before_anchor() {
    let haystack = "fn main() {\n    run();\n}\n";
    match locate_insertion(haystack, "run();", AnchorPlacement::Before) {
        LocateOutcome::Unique(span) => {
            assert_eq!(span.start, span.end);
            assert_eq!(&haystack[span.start..span.start + 6], "run();");
        }
        other => panic!("Expected unique insertion point, got {:?}", other),
    }
}

#[test]
fn test_insertion_with_missing_anchor_is_not_found() {
    assert_eq!(
        locate_insertion("fn main() {}\n", "mod tests;", AnchorPlacement::After),
        LocateOutcome::NotFound
    );
}

#[test]
fn test_insertion_with_ambiguous_anchor_reports_count() {
    let haystack = "check();\ncheck();\n";
    assert_eq!(
        locate_insertion(haystack, "check();", AnchorPlacement::After),
        LocateOutcome::Ambiguous(2)
    );
}

#[test]
fn test_multibyte_content_spans_stay_on_char_boundaries() {
    let haystack = "let greeting = \"héllo\";\nlet other = 1;\n";
    let (start, end) = expect_unique(haystack, "\"héllo\"");
    assert_eq!(&haystack[start..end], "\"héllo\"");
}
