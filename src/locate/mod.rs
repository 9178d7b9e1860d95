//! Snippet location with drift tolerance.
//!
//! This module resolves a free-text snippet to the unique byte span it
//! occupies in a haystack, using three strategies in priority order:
//! 1. Exact literal match
//! 2. Whitespace-normalized match (runs of spaces/tabs collapse to one
//!    space for comparison; returned spans use original offsets)
//! 3. Line-trimmed match (per-line leading/trailing whitespace ignored)
//!
//! Each strategy applies the same uniqueness rule: exactly one candidate
//! resolves, more than one is reported as ambiguous, zero falls through to
//! the next strategy. A wrong silent choice corrupts code, so the first of
//! several occurrences is never picked.

use serde::{Deserialize, Serialize};

/// Half-open byte range into a specific source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics in debug builds if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-width span (pure insertion point).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open intersection test.
    ///
    /// A zero-width span strictly inside another span overlaps it; a
    /// zero-width span sitting on another span's boundary does not, and two
    /// insertion points at the same offset do not overlap each other.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Result of resolving a snippet against a haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateOutcome {
    /// Exactly one location matched.
    Unique(Span),
    /// No strategy produced a match.
    NotFound,
    /// A strategy produced this many candidates; the caller must not guess.
    Ambiguous(usize),
}

/// Where an insertion lands relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPlacement {
    /// Insert immediately before the anchor's resolved span.
    Before,
    /// Insert immediately after the anchor's resolved span.
    After,
}

/// Resolve `needle` to its unique span in `haystack`.
pub fn locate(haystack: &str, needle: &str) -> LocateOutcome {
    if needle.is_empty() {
        return LocateOutcome::NotFound;
    }

    // Strategy 1: exact literal occurrences.
    let exact = exact_candidates(haystack, needle);
    match exact.len() {
        1 => return LocateOutcome::Unique(exact[0]),
        n if n > 1 => return LocateOutcome::Ambiguous(n),
        _ => {}
    }

    // Strategy 2: whitespace-normalized comparison view.
    let normalized = normalized_candidates(haystack, needle);
    match normalized.len() {
        1 => return LocateOutcome::Unique(normalized[0]),
        n if n > 1 => return LocateOutcome::Ambiguous(n),
        _ => {}
    }

    // Strategy 3: line-trimmed window scan.
    let trimmed = line_trimmed_candidates(haystack, needle);
    match trimmed.len() {
        1 => LocateOutcome::Unique(trimmed[0]),
        n if n > 1 => LocateOutcome::Ambiguous(n),
        _ => LocateOutcome::NotFound,
    }
}

/// Resolve a zero-width insertion point next to an anchor snippet.
///
/// The anchor is resolved with the same three-strategy algorithm as
/// [`locate`]; a unique anchor yields the empty span immediately before or
/// after it.
pub fn locate_insertion(
    haystack: &str,
    anchor: &str,
    placement: AnchorPlacement,
) -> LocateOutcome {
    match locate(haystack, anchor) {
        LocateOutcome::Unique(span) => {
            let point = match placement {
                AnchorPlacement::Before => span.start,
                AnchorPlacement::After => span.end,
            };
            LocateOutcome::Unique(Span::new(point, point))
        }
        other => other,
    }
}

/// Non-overlapping literal occurrences of `needle` in `haystack`.
fn exact_candidates(haystack: &str, needle: &str) -> Vec<Span> {
    haystack
        .match_indices(needle)
        .map(|(start, matched)| Span::new(start, start + matched.len()))
        .collect()
}

/// A comparison view of text with runs of horizontal whitespace collapsed
/// to a single space, plus a per-byte map back to original offsets.
struct NormalizedView {
    text: String,
    /// Original start offset of each normalized byte.
    starts: Vec<usize>,
    /// Original end offset (exclusive) of each normalized byte. For a
    /// collapsed whitespace run this is the end of the whole run.
    ends: Vec<usize>,
}

fn normalize_whitespace(source: &str) -> NormalizedView {
    let mut view = NormalizedView {
        text: String::with_capacity(source.len()),
        starts: Vec::with_capacity(source.len()),
        ends: Vec::with_capacity(source.len()),
    };

    let mut chars = source.char_indices().peekable();
    while let Some((pos, ch)) = chars.next() {
        if ch == ' ' || ch == '\t' {
            let run_start = pos;
            let mut run_end = pos + ch.len_utf8();
            while let Some(&(next_pos, next_ch)) = chars.peek() {
                if next_ch == ' ' || next_ch == '\t' {
                    run_end = next_pos + next_ch.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            view.text.push(' ');
            view.starts.push(run_start);
            view.ends.push(run_end);
        } else {
            let width = ch.len_utf8();
            for offset in 0..width {
                view.starts.push(pos + offset);
                view.ends.push(pos + offset + 1);
            }
            view.text.push(ch);
        }
    }

    view
}

/// Occurrences of the normalized needle in the normalized haystack, mapped
/// back to original byte spans.
fn normalized_candidates(haystack: &str, needle: &str) -> Vec<Span> {
    let hay = normalize_whitespace(haystack);
    let ndl = normalize_whitespace(needle);

    if ndl.text.is_empty() {
        return Vec::new();
    }

    hay.text
        .match_indices(ndl.text.as_str())
        .map(|(start, matched)| {
            let last = start + matched.len() - 1;
            Span::new(hay.starts[start], hay.ends[last])
        })
        .collect()
}

/// A haystack line's content range, excluding the line terminator.
fn line_ranges(source: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut line_start = 0;

    for (pos, ch) in source.char_indices() {
        if ch == '\n' {
            let mut content_end = pos;
            if source.as_bytes()[..pos].ends_with(b"\r") {
                content_end -= 1;
            }
            ranges.push((line_start, content_end));
            line_start = pos + 1;
        }
    }
    if line_start < source.len() {
        ranges.push((line_start, source.len()));
    }

    ranges
}

/// Contiguous runs of haystack lines whose trimmed forms equal the trimmed
/// needle lines. The candidate span covers the original untrimmed lines,
/// excluding the final line terminator.
fn line_trimmed_candidates(haystack: &str, needle: &str) -> Vec<Span> {
    let mut needle_lines: Vec<&str> = needle.split('\n').map(str::trim).collect();
    // A snippet ending in a newline produces one trailing empty element;
    // drop it so the snippet still matches its own last line.
    if needle_lines.len() > 1 && needle_lines.last() == Some(&"") {
        needle_lines.pop();
    }
    if needle_lines.is_empty() || needle_lines.iter().all(|line| line.is_empty()) {
        return Vec::new();
    }

    let ranges = line_ranges(haystack);
    let trimmed: Vec<&str> = ranges
        .iter()
        .map(|&(start, end)| haystack[start..end].trim())
        .collect();

    let window = needle_lines.len();
    let mut candidates = Vec::new();
    let mut index = 0;
    while index + window <= trimmed.len() {
        if trimmed[index..index + window] == needle_lines[..] {
            let start = ranges[index].0;
            let end = ranges[index + window - 1].1;
            candidates.push(Span::new(start, end));
            // Count non-overlapping runs, matching the exact strategy.
            index += window;
        } else {
            index += 1;
        }
    }

    candidates
}
