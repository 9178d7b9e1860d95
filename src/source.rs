//! Immutable source text with stable byte offsets.

use ropey::Rope;

/// The full content of one file at a point in time.
///
/// A `SourceText` is never mutated in place: every successful apply produces
/// a new value, and byte offsets resolved against one value are only valid
/// for that value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
}

impl SourceText {
    /// Capture a new source text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Borrow the content.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true when the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 1-based line number containing the given byte offset.
    ///
    /// An offset equal to the text length (end-of-file insertion point) maps
    /// to the last line.
    pub fn line_of(&self, byte: usize) -> usize {
        let rope = Rope::from_str(&self.text);
        let byte = byte.min(self.text.len());
        rope.byte_to_line(byte) + 1
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
