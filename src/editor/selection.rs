//! Selection tracking
//!
//! A [`Selection`] is a snapshot taken at the start of an operation. It is
//! never cached across buffer mutations; every constructor clamps against the
//! buffer it is given.

use serde::{Deserialize, Serialize};

use super::buffer::TextBuffer;

/// Cursor or range selection over a text buffer, in character offsets
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Start of selection (always `<= end`)
    pub start: usize,

    /// End of selection
    pub end: usize,

    /// The selected text, `buffer[start..end]`
    pub text: String,
}

impl Selection {
    /// Create a selection over `buffer`, clamping and ordering the offsets
    pub fn new(buffer: &TextBuffer, start: usize, end: usize) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let start = buffer.clamp(start);
        let end = buffer.clamp(end);
        Self {
            start,
            end,
            text: buffer.slice(start..end),
        }
    }

    /// Create a collapsed selection (cursor with no selection)
    pub fn collapsed(buffer: &TextBuffer, position: usize) -> Self {
        Self::new(buffer, position, position)
    }

    /// The zero selection used when the surface cannot be read
    pub fn zero() -> Self {
        Self::default()
    }

    /// Check if selection is collapsed (no text selected)
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Length of the selection in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Move both bounds by signed deltas, clamped to `buffer`
    pub fn shifted(&self, buffer: &TextBuffer, start_delta: isize, end_delta: isize) -> Self {
        Self::new(
            buffer,
            offset_by(self.start, start_delta),
            offset_by(self.end, end_delta),
        )
    }
}

/// Apply a signed delta to an offset, saturating at zero
pub fn offset_by(offset: usize, delta: isize) -> usize {
    if delta >= 0 {
        offset.saturating_add(delta.unsigned_abs())
    } else {
        offset.saturating_sub(delta.unsigned_abs())
    }
}

/// Build a selection from raw surface offsets.
///
/// Offsets are clamped into the buffer; `None` (the surface could not be
/// read) degrades to the zero selection.
pub fn capture_selection(buffer: &str, raw: Option<(usize, usize)>) -> Selection {
    match raw {
        Some((start, end)) => Selection::new(&TextBuffer::from_text(buffer), start, end),
        None => {
            log::debug!("capture_selection: no readable surface, using zero selection");
            Selection::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_clamps_to_buffer() {
        let sel = capture_selection("Hello", Some((2, 99)));
        assert_eq!(sel.start, 2);
        assert_eq!(sel.end, 5);
        assert_eq!(sel.text, "llo");
    }

    #[test]
    fn test_capture_orders_offsets() {
        let sel = capture_selection("Hello", Some((4, 1)));
        assert_eq!((sel.start, sel.end), (1, 4));
        assert_eq!(sel.text, "ell");
    }

    #[test]
    fn test_capture_failure_is_zero() {
        let sel = capture_selection("Hello", None);
        assert_eq!(sel, Selection::zero());
        assert!(sel.is_collapsed());
        assert_eq!(sel.text, "");
    }

    #[test]
    fn test_shift_never_negative() {
        let buf = TextBuffer::from_text("abc");
        let sel = Selection::new(&buf, 1, 2);
        let moved = sel.shifted(&buf, -5, 10);
        assert_eq!((moved.start, moved.end), (0, 3));
    }

    #[test]
    fn test_offset_by() {
        assert_eq!(offset_by(5, -2), 3);
        assert_eq!(offset_by(1, -2), 0);
        assert_eq!(offset_by(1, 4), 5);
    }
}
