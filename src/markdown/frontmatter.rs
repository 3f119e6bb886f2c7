//! YAML-style frontmatter
//!
//! A leading `---` delimited block is removed from the rendered output and
//! returned next to the HTML.

use pulldown_cmark::{Event, Tag, TagEnd};
use serde::Serialize;

/// The raw frontmatter block with top-level `key: value` lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frontmatter {
    raw: String,
}

impl Frontmatter {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Value of a top-level scalar key, quotes stripped
    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw.lines().find_map(|line| {
            if line.starts_with(char::is_whitespace) || line.starts_with('#') {
                return None;
            }
            let (name, value) = line.split_once(':')?;
            if name.trim() != key {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some(value)
        })
    }

    /// All top-level keys in order
    pub fn keys(&self) -> Vec<&str> {
        self.raw
            .lines()
            .filter(|line| !line.starts_with(char::is_whitespace) && !line.starts_with('#'))
            .filter_map(|line| line.split_once(':').map(|(name, _)| name.trim()))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Remove the metadata block from the stream
pub fn extract(events: Vec<Event<'_>>) -> (Vec<Event<'_>>, Option<Frontmatter>) {
    let mut out = Vec::with_capacity(events.len());
    let mut raw: Option<String> = None;
    let mut inside = false;

    for event in events {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => {
                inside = true;
                raw.get_or_insert_with(String::new);
            }
            Event::End(TagEnd::MetadataBlock(_)) => inside = false,
            Event::Text(text) if inside => {
                if let Some(raw) = raw.as_mut() {
                    raw.push_str(&text);
                }
            }
            other if inside => log::debug!("Ignoring event in frontmatter: {:?}", other),
            other => out.push(other),
        }
    }

    (out, raw.map(|raw| Frontmatter { raw }))
}
