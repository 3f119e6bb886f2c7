//! Paragraph-break handling
//!
//! Pressing Enter inside a list or quote continues it; pressing Enter on an
//! empty item ends it. Outside of lists only the indentation carries over.

use regex::Regex;
use std::sync::OnceLock;

use super::buffer::TextBuffer;
use super::edit::EditResult;
use super::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Continuation {
    /// Marker as written on the current line
    marker: String,
    /// Marker to seed the next line with
    next: String,
}

fn task_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([-*+]) \[[ xX]\] ").expect("valid regex"))
}

fn unordered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+] ").expect("valid regex"))
}

fn ordered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\. ").expect("valid regex"))
}

/// Match the line (indentation already stripped) against the list and quote
/// markers. Task lists go first since `- [ ] ` also reads as `- `.
fn continuation_for(line: &str) -> Option<Continuation> {
    if let Some(caps) = task_re().captures(line) {
        return Some(Continuation {
            marker: caps[0].to_string(),
            next: format!("{} [ ] ", &caps[1]),
        });
    }
    if let Some(found) = unordered_re().find(line) {
        return Some(Continuation {
            marker: found.as_str().to_string(),
            next: found.as_str().to_string(),
        });
    }
    if let Some(caps) = ordered_re().captures(line) {
        // Renumbering trusts whatever number the previous item carries
        let next = caps[1].parse::<u64>().ok()?.checked_add(1)?;
        return Some(Continuation {
            marker: caps[0].to_string(),
            next: format!("{next}. "),
        });
    }
    if line.starts_with("> ") {
        return Some(Continuation {
            marker: "> ".to_string(),
            next: "> ".to_string(),
        });
    }
    None
}

/// Insert a paragraph break at the selection, continuing or ending the
/// surrounding list or quote
pub fn insert_newline(buffer: &str, selection: &Selection) -> EditResult {
    let mut buf = TextBuffer::from_text(buffer);
    let sel = Selection::new(&buf, selection.start, selection.end);

    let last_line = buf.line_prefix(sel.start);
    let indent: String = last_line.chars().take_while(|c| c.is_whitespace()).collect();
    let indent_len = indent.chars().count();
    let trimmed = &last_line[indent.len()..];

    let prefix = match continuation_for(trimmed) {
        Some(cont) if trimmed[cont.marker.len()..].trim().is_empty() => {
            // Empty item: end the block instead of continuing it
            let marker_start = buf.line_start(sel.start) + indent_len;
            buf.delete(marker_start..sel.end);
            return EditResult::cursor(buf, marker_start);
        }
        Some(cont) => format!("{indent}{}", cont.next),
        None => indent,
    };

    buf.replace_range(sel.start..sel.end, &format!("\n{prefix}"));
    EditResult::cursor(buf, sel.start + 1 + prefix.chars().count())
}
