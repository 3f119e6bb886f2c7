//! Indentation toggling
//!
//! Adds or removes one indentation unit. Removal only ever deletes spaces that
//! are actually there, so unrelated text is never eaten.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

use super::buffer::TextBuffer;
use super::edit::EditResult;
use super::selection::Selection;
use crate::error::{EditorError, EditorResult};

/// Whether to indent or outdent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentAction {
    Add,
    Remove,
}

impl FromStr for IndentAction {
    type Err = EditorError;

    fn from_str(s: &str) -> EditorResult<Self> {
        match s {
            "add" => Ok(IndentAction::Add),
            "remove" => Ok(IndentAction::Remove),
            other => Err(EditorError::UnknownIndentAction(other.to_string())),
        }
    }
}

/// `  - ` / `  * ` / `  - [ ] ` up to the cursor
fn unordered_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^( *)[-*+] (?:\[[ xX]\] )?$").expect("valid regex"))
}

/// `  3. ` up to the cursor
fn ordered_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^( *)\d+\. $").expect("valid regex"))
}

/// Width of the indentation in front of a list marker that ends the line
/// prefix, or `None` if the prefix is not a bare list marker
fn list_marker_indent(prefix: &str) -> Option<usize> {
    unordered_marker_re()
        .captures(prefix)
        .or_else(|| ordered_marker_re().captures(prefix))
        .and_then(|caps| caps.get(1))
        .map(|indent| indent.as_str().len())
}

/// Add or remove one indentation unit of `unit_width` spaces
pub fn toggle_indent(
    buffer: &str,
    selection: &Selection,
    action: IndentAction,
    unit_width: usize,
) -> EditResult {
    if unit_width == 0 {
        log::warn!("toggle_indent: unit width of zero ignored");
        return EditResult::unchanged(buffer, selection);
    }

    let mut buf = TextBuffer::from_text(buffer);
    let sel = Selection::new(&buf, selection.start, selection.end);
    let spaces = " ".repeat(unit_width);

    if sel.is_collapsed() {
        indent_at_cursor(buf, sel.start, action, &spaces)
    } else {
        if action == IndentAction::Remove && !buf.ends_with_at(sel.start, &spaces) {
            log::debug!("toggle_indent: nothing to remove before selection");
            return EditResult::new(buf, sel.start, sel.end);
        }
        let (text, breaks) = match action {
            IndentAction::Add => indent_line_breaks(&sel.text, &spaces),
            IndentAction::Remove => outdent_line_breaks(&sel.text, &spaces),
        };
        let shift = unit_width * (1 + breaks);
        match action {
            IndentAction::Add => {
                buf.replace_range(sel.start..sel.end, &format!("{spaces}{text}"));
                EditResult::new(buf, sel.start + unit_width, sel.end + shift)
            }
            IndentAction::Remove => {
                buf.replace_range(sel.start - unit_width..sel.end, &text);
                EditResult::new(buf, sel.start - unit_width, sel.end - shift)
            }
        }
    }
}

fn indent_at_cursor(mut buf: TextBuffer, cursor: usize, action: IndentAction, spaces: &str) -> EditResult {
    let unit = spaces.len();
    let prefix = buf.line_prefix(cursor);

    if let Some(indent) = list_marker_indent(&prefix) {
        // Indentation goes in front of the marker so it stays glued to the item
        let marker_start = buf.line_start(cursor) + indent;
        return match action {
            IndentAction::Add => {
                buf.insert_at(marker_start, spaces);
                EditResult::cursor(buf, cursor + unit)
            }
            IndentAction::Remove if indent >= unit => {
                buf.delete(marker_start - unit..marker_start);
                EditResult::cursor(buf, cursor - unit)
            }
            IndentAction::Remove => {
                log::debug!("toggle_indent: list item is not indented");
                EditResult::cursor(buf, cursor)
            }
        };
    }

    match action {
        IndentAction::Add => {
            buf.insert_at(cursor, spaces);
            EditResult::cursor(buf, cursor + unit)
        }
        IndentAction::Remove if buf.ends_with_at(cursor, spaces) => {
            buf.delete(cursor - unit..cursor);
            EditResult::cursor(buf, cursor - unit)
        }
        IndentAction::Remove => {
            log::debug!("toggle_indent: nothing to remove before cursor");
            EditResult::cursor(buf, cursor)
        }
    }
}

/// Indent after every `\n` that is not followed by another `\n`; blank
/// separator lines stay empty. Returns the new text and the breaks touched.
fn indent_line_breaks(text: &str, spaces: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut breaks = 0;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == '\n' && chars.peek() != Some(&'\n') {
            out.push_str(spaces);
            breaks += 1;
        }
    }
    (out, breaks)
}

fn outdent_line_breaks(text: &str, spaces: &str) -> (String, usize) {
    let needle = format!("\n{spaces}");
    let breaks = text.matches(needle.as_str()).count();
    (text.replace(needle.as_str(), "\n"), breaks)
}
