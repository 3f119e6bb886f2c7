//! Block template insertion
//!
//! Templates only insert at a pure cursor position; a range selection is left
//! alone. Every template starts its own paragraph without doubling blank lines.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::buffer::TextBuffer;
use super::edit::EditResult;
use super::selection::Selection;
use crate::error::{EditorError, EditorResult};

/// The markdown template for a table
pub const MARKDOWN_TEMPLATE_TABLE: &str = "| Column1 | Column2 | Column3 |\n\
                                           | :--- | :--- | :--- |\n\
                                           | Content | Content | Content |";

/// The markdown template for a task. Ensure trailing space remains
pub const MARKDOWN_TEMPLATE_TASK: &str = "- [ ] ";

/// The markdown template for an unordered list. Ensure trailing space remains
pub const MARKDOWN_TEMPLATE_UL: &str = "- ";

/// The markdown template for an ordered list. Ensure trailing space remains
pub const MARKDOWN_TEMPLATE_OL: &str = "1. ";

/// The markdown template for a blockquote. Ensure trailing space remains
pub const MARKDOWN_TEMPLATE_BLOCKQUOTE: &str = "> ";

const CODE_FENCE: &str = "```";

/// Block-level constructs offered by the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkdownTemplate {
    Table,
    Codeblock,
    Task,
    UnorderedList,
    OrderedList,
    Blockquote,
}

impl MarkdownTemplate {
    pub const ALL: [MarkdownTemplate; 6] = [
        MarkdownTemplate::Table,
        MarkdownTemplate::Codeblock,
        MarkdownTemplate::Task,
        MarkdownTemplate::UnorderedList,
        MarkdownTemplate::OrderedList,
        MarkdownTemplate::Blockquote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkdownTemplate::Table => "table",
            MarkdownTemplate::Codeblock => "codeblock",
            MarkdownTemplate::Task => "task",
            MarkdownTemplate::UnorderedList => "unordered-list",
            MarkdownTemplate::OrderedList => "ordered-list",
            MarkdownTemplate::Blockquote => "blockquote",
        }
    }

    /// Single-line templates are guarded against duplicate markers
    pub fn is_single_line(&self) -> bool {
        !matches!(self, MarkdownTemplate::Table | MarkdownTemplate::Codeblock)
    }

    /// The snippet to insert; `language` fills the code fence placeholder
    pub fn snippet(&self, language: &str) -> String {
        match self {
            MarkdownTemplate::Table => MARKDOWN_TEMPLATE_TABLE.to_string(),
            MarkdownTemplate::Codeblock => format!("{CODE_FENCE}{language}\n\n{CODE_FENCE}"),
            MarkdownTemplate::Task => MARKDOWN_TEMPLATE_TASK.to_string(),
            MarkdownTemplate::UnorderedList => MARKDOWN_TEMPLATE_UL.to_string(),
            MarkdownTemplate::OrderedList => MARKDOWN_TEMPLATE_OL.to_string(),
            MarkdownTemplate::Blockquote => MARKDOWN_TEMPLATE_BLOCKQUOTE.to_string(),
        }
    }

    /// Whether `line` (indentation ignored) already starts with this marker
    fn already_on(&self, line: &str) -> bool {
        let line = line.trim_start();
        match self {
            MarkdownTemplate::OrderedList => ordered_line_re().is_match(line),
            MarkdownTemplate::Task => line.starts_with(MARKDOWN_TEMPLATE_TASK),
            MarkdownTemplate::UnorderedList => line.starts_with(MARKDOWN_TEMPLATE_UL),
            MarkdownTemplate::Blockquote => line.starts_with(MARKDOWN_TEMPLATE_BLOCKQUOTE),
            MarkdownTemplate::Table | MarkdownTemplate::Codeblock => false,
        }
    }
}

impl fmt::Display for MarkdownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkdownTemplate {
    type Err = EditorError;

    fn from_str(s: &str) -> EditorResult<Self> {
        MarkdownTemplate::ALL
            .into_iter()
            .find(|template| template.as_str() == s)
            .ok_or_else(|| EditorError::UnknownTemplate(s.to_string()))
    }
}

fn ordered_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s").expect("valid regex"))
}

/// Line breaks needed before a template so it opens its own paragraph
fn needs_new_line(before: &str) -> &'static str {
    if before.is_empty() || before.ends_with("\n\n") {
        ""
    } else if before.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    }
}

/// Insert `template` at the cursor
pub fn insert_template(
    buffer: &str,
    selection: &Selection,
    template: MarkdownTemplate,
    codeblock_language: &str,
) -> EditResult {
    let mut buf = TextBuffer::from_text(buffer);
    let sel = Selection::new(&buf, selection.start, selection.end);

    if !sel.is_collapsed() {
        log::debug!("insert_template: {template} ignored on a range selection");
        return EditResult::new(buf, sel.start, sel.end);
    }

    let cursor = sel.start;
    if template.is_single_line() && template.already_on(&buf.current_line(cursor)) {
        log::debug!("insert_template: line already carries a {template} marker");
        return EditResult::cursor(buf, cursor);
    }

    let lead = needs_new_line(&buf.before(cursor));
    let snippet = template.snippet(codeblock_language);
    let start = cursor + lead.len();
    buf.insert_at(cursor, &format!("{lead}{snippet}"));

    match template {
        MarkdownTemplate::Codeblock => {
            // Select the language so it can be overtyped
            let language_start = start + CODE_FENCE.len();
            EditResult::new(buf, language_start, language_start + codeblock_language.chars().count())
        }
        _ => EditResult::cursor(buf, start + snippet.chars().count()),
    }
}
