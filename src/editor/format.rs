//! Inline format toggling
//!
//! Wraps or unwraps the selection (or the cursor) in a format's marker.
//! Detection is symmetric only: a marker must sit on both sides, either as
//! part of the selection or directly outside it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::buffer::TextBuffer;
use super::edit::EditResult;
use super::selection::Selection;
use crate::error::{EditorError, EditorResult};

/// The inline formats available from the toolbar and shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Subscript,
    Superscript,
    Mark,
    Code,
}

impl InlineFormat {
    /// All formats, in toolbar order
    pub const ALL: [InlineFormat; 8] = [
        InlineFormat::Bold,
        InlineFormat::Italic,
        InlineFormat::Underline,
        InlineFormat::Strikethrough,
        InlineFormat::Subscript,
        InlineFormat::Superscript,
        InlineFormat::Mark,
        InlineFormat::Code,
    ];

    /// The literal marker written on both sides of the content
    pub fn wrapper(&self) -> &'static str {
        match self {
            InlineFormat::Bold => "**",
            InlineFormat::Italic => "_",
            InlineFormat::Underline => "++",
            InlineFormat::Strikethrough => "~~",
            InlineFormat::Subscript => "~",
            InlineFormat::Superscript => "^",
            InlineFormat::Mark => "==",
            InlineFormat::Code => "`",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InlineFormat::Bold => "bold",
            InlineFormat::Italic => "italic",
            InlineFormat::Underline => "underline",
            InlineFormat::Strikethrough => "strikethrough",
            InlineFormat::Subscript => "subscript",
            InlineFormat::Superscript => "superscript",
            InlineFormat::Mark => "mark",
            InlineFormat::Code => "code",
        }
    }
}

impl fmt::Display for InlineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InlineFormat {
    type Err = EditorError;

    fn from_str(s: &str) -> EditorResult<Self> {
        InlineFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| EditorError::UnknownFormat(s.to_string()))
    }
}

/// Toggle `format` around the selection, or at the cursor when nothing is selected
pub fn toggle_inline_format(buffer: &str, selection: &Selection, format: InlineFormat) -> EditResult {
    let mut buf = TextBuffer::from_text(buffer);
    let sel = Selection::new(&buf, selection.start, selection.end);
    let wrapper = format.wrapper();
    let len = wrapper.chars().count();

    if sel.is_collapsed() {
        let cursor = sel.start;
        if buf.ends_with_at(cursor, wrapper) && buf.starts_with_at(cursor, wrapper) {
            // `w|w`: drop the empty pair
            buf.delete(cursor - len..cursor + len);
            return EditResult::cursor(buf, cursor - len);
        }

        buf.insert_at(cursor, &wrapper.repeat(2));
        return EditResult::cursor(buf, cursor + len);
    }

    let text = sel.text.as_str();
    let wrap_selected =
        sel.len() >= len * 2 && text.starts_with(wrapper) && text.ends_with(wrapper);
    let wrap_outside = buf.ends_with_at(sel.start, wrapper) && buf.starts_with_at(sel.end, wrapper);

    if wrap_selected {
        let inner: String = text.chars().skip(len).take(sel.len() - len * 2).collect();
        buf.replace_range(sel.start..sel.end, &inner);
        EditResult::new(buf, sel.start, sel.end - len * 2)
    } else if wrap_outside {
        buf.delete(sel.end..sel.end + len);
        buf.delete(sel.start - len..sel.start);
        EditResult::new(buf, sel.start - len, sel.end - len)
    } else {
        buf.replace_range(sel.start..sel.end, &format!("{wrapper}{text}{wrapper}"));
        EditResult::new(buf, sel.start, sel.end + len * 2)
    }
}
