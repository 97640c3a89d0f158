//! Cursor-based mutable source buffer used during expansion.

use std::ops::Range;

use super::find_macro;

/// A source text being rewritten, plus the position up to which it is final.
///
/// Everything before the cursor has already been expanded or deliberately
/// skipped. Each splice moves the cursor past the inserted text, so offsets
/// computed before a splice are never reused after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
    cursor: usize,
}

impl SourceBuffer {
    /// Wraps `text` with the cursor at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
        }
    }

    /// The current text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Current cursor offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor back to the start, for scanning the next macro kind.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Next uncommented occurrence of `name` at or after the cursor.
    pub fn find(&self, name: &str) -> Option<usize> {
        find_macro(&self.text, name, self.cursor)
    }

    /// Replaces `range` with `replacement` and moves the cursor past the
    /// inserted text.
    pub fn splice(&mut self, range: Range<usize>, replacement: &str) {
        let start = range.start;
        self.text.replace_range(range, replacement);
        self.cursor = start + replacement.len();
    }

    /// Moves the cursor to `offset` without modifying the text.
    pub fn skip_to(&mut self, offset: usize) {
        self.cursor = offset.min(self.text.len());
    }

    /// Consumes the buffer, returning the text.
    pub fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_moves_cursor() {
        let mut buffer = SourceBuffer::new("A(1) A(2)");

        let first = buffer.find("A").unwrap();
        buffer.splice(first..first + 4, "BBBB_BBBB");
        assert_eq!(buffer.as_str(), "BBBB_BBBB A(2)");
        assert_eq!(buffer.cursor(), 9);

        let second = buffer.find("A").unwrap();
        assert_eq!(second, 10);
    }

    #[test]
    fn test_replacement_containing_name_is_not_rescanned() {
        let mut buffer = SourceBuffer::new("X;");
        buffer.splice(0..1, "X X");

        assert_eq!(buffer.find("X"), None);
        buffer.rewind();
        assert_eq!(buffer.find("X"), Some(0));
    }

    #[test]
    fn test_skip_to() {
        let mut buffer = SourceBuffer::new("A A");
        buffer.skip_to(1);
        assert_eq!(buffer.find("A"), Some(2));
        buffer.skip_to(100);
        assert_eq!(buffer.cursor(), 3);
        assert_eq!(buffer.into_string(), "A A");
    }
}
