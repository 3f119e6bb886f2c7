//! Text buffer implementation using ropey
//!
//! All offsets are character indices. Every edit operation performs its
//! splicing through the helpers here, so the clamping rules live in one place:
//! an index past the end is treated as the end, and an inverted range is empty.
//! Only `\n` counts as a line break.

use ropey::Rope;
use std::fmt;
use std::ops::Range;

/// Text buffer wrapping ropey::Rope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty text buffer
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a buffer from a string, without touching line endings
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get total character count
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Clamp a character index into `[0, len_chars]`
    pub fn clamp(&self, char_idx: usize) -> usize {
        char_idx.min(self.rope.len_chars())
    }

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end).max(start);
        start..end
    }

    /// Get a slice of the buffer as a string
    pub fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp_range(range);
        if range.is_empty() {
            return String::new();
        }
        self.rope.slice(range).to_string()
    }

    /// Everything before `char_idx`
    pub fn before(&self, char_idx: usize) -> String {
        self.slice(0..char_idx)
    }

    /// Whether the text immediately before `char_idx` ends with `pattern`
    pub fn ends_with_at(&self, char_idx: usize, pattern: &str) -> bool {
        let idx = self.clamp(char_idx);
        let len = pattern.chars().count();
        if len > idx {
            return false;
        }
        self.slice(idx - len..idx) == pattern
    }

    /// Whether the text starting at `char_idx` begins with `pattern`
    pub fn starts_with_at(&self, char_idx: usize, pattern: &str) -> bool {
        let idx = self.clamp(char_idx);
        let len = pattern.chars().count();
        if idx + len > self.rope.len_chars() {
            return false;
        }
        self.slice(idx..idx + len) == pattern
    }

    /// Insert text at character position
    pub fn insert_at(&mut self, char_idx: usize, text: &str) {
        let idx = self.clamp(char_idx);
        self.rope.insert(idx, text);
    }

    /// Delete a range of characters
    pub fn delete(&mut self, range: Range<usize>) {
        let range = self.clamp_range(range);
        if !range.is_empty() {
            self.rope.remove(range);
        }
    }

    /// Replace a range of characters
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let range = self.clamp_range(range);
        self.delete(range.clone());
        self.insert_at(range.start, text);
    }

    /// Index of the first character of the line containing `char_idx`
    pub fn line_start(&self, char_idx: usize) -> usize {
        let idx = self.clamp(char_idx);
        let mut chars = self.rope.chars_at(idx);
        let mut start = idx;
        while let Some(ch) = chars.prev() {
            if ch == '\n' {
                break;
            }
            start -= 1;
        }
        start
    }

    /// Index just past the last character of the line containing `char_idx`
    /// (the position of its `\n`, or the buffer end)
    pub fn line_end(&self, char_idx: usize) -> usize {
        let idx = self.clamp(char_idx);
        let mut end = idx;
        for ch in self.rope.chars_at(idx) {
            if ch == '\n' {
                break;
            }
            end += 1;
        }
        end
    }

    /// Text of the current line up to `char_idx`
    pub fn line_prefix(&self, char_idx: usize) -> String {
        self.slice(self.line_start(char_idx)..char_idx)
    }

    /// Full text of the line containing `char_idx`, without its `\n`
    pub fn current_line(&self, char_idx: usize) -> String {
        self.slice(self.line_start(char_idx)..self.line_end(char_idx))
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len_chars(), 0);
        assert_eq!(buf.line_start(0), 0);
        assert_eq!(buf.line_end(0), 0);
    }

    #[test]
    fn test_line_endings_untouched() {
        let buf = TextBuffer::from_text("Hello\r\nWorld");
        assert_eq!(buf.to_string(), "Hello\r\nWorld");
        assert_eq!(buf.len_chars(), 12);
    }

    #[test]
    fn test_insert_clamps_past_end() {
        let mut buf = TextBuffer::from_text("Hello");
        buf.insert_at(99, "!");
        assert_eq!(buf.to_string(), "Hello!");
    }

    #[test]
    fn test_delete_inverted_range_is_noop() {
        let mut buf = TextBuffer::from_text("Hello, World");
        #[allow(clippy::reversed_empty_ranges)]
        buf.delete(7..5);
        assert_eq!(buf.to_string(), "Hello, World");
        buf.delete(5..7);
        assert_eq!(buf.to_string(), "HelloWorld");
    }

    #[test]
    fn test_replace_range() {
        let mut buf = TextBuffer::from_text("Bold text");
        buf.replace_range(5..9, "**text**");
        assert_eq!(buf.to_string(), "Bold **text**");
    }

    #[test]
    fn test_ends_and_starts_with_at() {
        let buf = TextBuffer::from_text("a**|**b");
        assert!(buf.ends_with_at(3, "**"));
        assert!(buf.starts_with_at(4, "**"));
        assert!(!buf.ends_with_at(1, "**"));
        assert!(!buf.starts_with_at(6, "**"));
    }

    #[test]
    fn test_line_boundaries() {
        let buf = TextBuffer::from_text("first\n  - second\nthird");
        assert_eq!(buf.line_start(10), 6);
        assert_eq!(buf.line_end(10), 16);
        assert_eq!(buf.line_prefix(10), "  - ");
        assert_eq!(buf.current_line(10), "  - second");
        assert_eq!(buf.line_start(6), 6);
        assert_eq!(buf.current_line(22), "third");
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let buf = TextBuffer::from_text("héllo wörld");
        assert_eq!(buf.len_chars(), 11);
        assert_eq!(buf.slice(6..11), "wörld");
        assert_eq!(buf.before(2), "hé");
    }
}
