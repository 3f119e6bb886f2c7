//! The output of every engine operation

use serde::{Deserialize, Serialize};

use super::buffer::TextBuffer;
use super::selection::Selection;

/// Updated buffer plus the selection the host should restore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResult {
    pub buffer: String,
    pub selection: Selection,
}

impl EditResult {
    /// Finish an operation: the selection is rebuilt (and clamped) against
    /// the edited buffer
    pub fn new(buffer: TextBuffer, start: usize, end: usize) -> Self {
        let selection = Selection::new(&buffer, start, end);
        Self {
            buffer: buffer.to_string(),
            selection,
        }
    }

    /// A collapsed cursor result
    pub fn cursor(buffer: TextBuffer, position: usize) -> Self {
        Self::new(buffer, position, position)
    }

    /// Hand the input back untouched
    pub fn unchanged(buffer: &str, selection: &Selection) -> Self {
        let buf = TextBuffer::from_text(buffer);
        Self::new(buf, selection.start, selection.end)
    }

    /// Whether the operation left the text as it was
    pub fn is_noop_for(&self, buffer: &str) -> bool {
        self.buffer == buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_selection_clamped() {
        let result = EditResult::new(TextBuffer::from_text("abc"), 2, 10);
        assert_eq!(result.selection.start, 2);
        assert_eq!(result.selection.end, 3);
        assert_eq!(result.selection.text, "c");
    }

    #[test]
    fn test_unchanged() {
        let sel = Selection::new(&TextBuffer::from_text("hello"), 1, 3);
        let result = EditResult::unchanged("hello", &sel);
        assert!(result.is_noop_for("hello"));
        assert_eq!(result.selection, sel);
    }
}
