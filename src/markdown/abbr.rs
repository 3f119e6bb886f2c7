//! Abbreviations
//!
//! `*[HTML]: Hyper Text Markup Language` lines define an abbreviation. The
//! definition lines are removed from the source, and whole-word occurrences
//! in text are wrapped in `<abbr title="..">`.

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use super::attrs::leading_block_len;
use super::escape_html;

fn definition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ {0,3}\*\[([^\]]+)\]:[ \t]*(.*?)\s*$").expect("valid regex"))
}

/// Defined abbreviations, longest first
#[derive(Debug, Clone, Default)]
pub struct Abbreviations {
    entries: Vec<(String, String)>,
    matcher: Option<Regex>,
}

impl Abbreviations {
    /// Build from `(abbreviation, title)` pairs; the first definition of a
    /// name wins
    pub fn new(definitions: Vec<(String, String)>) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (name, title) in definitions {
            if !entries.iter().any(|(existing, _)| *existing == name) {
                entries.push((name, title));
            }
        }
        entries.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let matcher = if entries.is_empty() {
            None
        } else {
            let alternation: Vec<String> =
                entries.iter().map(|(name, _)| regex::escape(name)).collect();
            Regex::new(&alternation.join("|")).ok()
        };
        Self { entries, matcher }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn title(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, title)| title.as_str())
    }

    /// Wrap whole-word occurrences in `text`
    fn expand<'a>(&self, text: &str) -> Vec<Event<'a>> {
        let Some(matcher) = &self.matcher else {
            return vec![Event::Text(CowStr::from(text.to_string()))];
        };

        let mut events = Vec::new();
        let mut last = 0;
        let mut search = 0;
        while let Some(found) = matcher.find_at(text, search) {
            if !is_boundary(text[..found.start()].chars().next_back())
                || !is_boundary(text[found.end()..].chars().next())
            {
                // Retry one character further on
                search = found.start() + text[found.start()..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
            if found.start() > last {
                events.push(Event::Text(CowStr::from(text[last..found.start()].to_string())));
            }
            let title = self.title(found.as_str()).unwrap_or("");
            events.push(Event::Html(CowStr::from(format!(
                "<abbr title=\"{}\">",
                escape_html(title)
            ))));
            events.push(Event::Text(CowStr::from(found.as_str().to_string())));
            events.push(Event::Html(CowStr::from("</abbr>")));
            last = found.end();
            search = found.end();
        }
        if last < text.len() {
            events.push(Event::Text(CowStr::from(text[last..].to_string())));
        }
        events
    }
}

fn is_boundary(neighbour: Option<char>) -> bool {
    neighbour.map_or(true, |ch| !ch.is_alphanumeric())
}

/// Remove definition lines outside fenced code and collect them
pub fn extract(markdown: &str) -> (Cow<'_, str>, Abbreviations) {
    let mut definitions = Vec::new();
    let mut kept = String::with_capacity(markdown.len());
    let mut fence: Option<char> = None;

    for line in markdown.split_inclusive('\n') {
        let trimmed = line.trim_start_matches(' ');
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~');
        if let Some(marker) = marker {
            if trimmed.starts_with(&marker.to_string().repeat(3)) {
                fence = match fence {
                    Some(open) if open == marker => None,
                    Some(open) => Some(open),
                    None => Some(marker),
                };
            }
        }

        if fence.is_none() {
            if let Some(caps) = definition_re().captures(line) {
                definitions.push((caps[1].to_string(), caps[2].to_string()));
                continue;
            }
        }
        kept.push_str(line);
    }

    if definitions.is_empty() {
        return (Cow::Borrowed(markdown), Abbreviations::default());
    }
    log::debug!("Found {} abbreviation definitions", definitions.len());
    (Cow::Owned(kept), Abbreviations::new(definitions))
}

/// Wrap abbreviations in text events outside code
pub fn apply<'a>(events: Vec<Event<'a>>, abbreviations: &Abbreviations) -> Vec<Event<'a>> {
    if abbreviations.is_empty() {
        return events;
    }

    let mut out = Vec::with_capacity(events.len());
    let mut in_code = false;
    let mut after_link = false;
    for event in events {
        let follows_link = after_link;
        after_link = matches!(event, Event::End(TagEnd::Link));
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code = true;
                out.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code = false;
                out.push(event);
            }
            Event::Text(text)
                if !in_code && !(follows_link && leading_block_len(&text) == Some(text.len())) =>
            {
                out.extend(abbreviations.expand(&text));
            }
            other => out.push(other),
        }
    }
    out
}
