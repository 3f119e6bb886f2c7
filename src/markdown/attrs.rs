//! `{{ }}` attribute injection
//!
//! A trailing `{{ .class #id key=value }}` block attaches attributes to the
//! paragraph or heading it ends; one directly after a link attaches to the
//! link. Only allow-listed attribute names survive, everything else is dropped.

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use regex::Regex;
use std::sync::OnceLock;

use super::escape_html;

/// Attribute names accepted verbatim; `data*` names are accepted as well
pub const ALLOWED_ATTRIBUTES: [&str; 5] = ["id", "class", "style", "target", "rel"];

const LEFT_DELIMITER: &str = "{{";
const RIGHT_DELIMITER: &str = "}}";

fn trailing_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\{\{([^{}]*)\}\}\s*$").expect("valid regex"))
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_:][-A-Za-z0-9_:.]*$").expect("valid regex"))
}

pub fn is_allowed(name: &str) -> bool {
    name_re().is_match(name) && (ALLOWED_ATTRIBUTES.contains(&name) || name.starts_with("data"))
}

/// Parsed, allow-listed attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub pairs: Vec<(String, String)>,
}

impl Attributes {
    /// Parse the inside of a `{{ }}` block
    pub fn parse(body: &str) -> Self {
        let mut attrs = Self::default();
        for token in tokenize(body) {
            if let Some(class) = token.strip_prefix('.') {
                if !class.is_empty() {
                    attrs.classes.push(class.to_string());
                }
            } else if let Some(id) = token.strip_prefix('#') {
                if !id.is_empty() {
                    attrs.id = Some(id.to_string());
                }
            } else {
                let (name, value) = match token.split_once('=') {
                    Some((name, value)) => (name, unquote(value)),
                    None => (token.as_str(), ""),
                };
                attrs.set(name, value);
            }
        }
        attrs
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.pairs.is_empty()
    }

    /// Set an attribute, replacing an existing value of the same name.
    /// Names outside the allow-list are ignored.
    pub fn set(&mut self, name: &str, value: &str) {
        if !is_allowed(name) {
            log::debug!("Dropping attribute '{}' outside the allow-list", name);
            return;
        }
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => self
                .classes
                .extend(value.split_whitespace().map(str::to_string)),
            _ => match self.pairs.iter_mut().find(|(existing, _)| existing == name) {
                Some(pair) => pair.1 = value.to_string(),
                None => self.pairs.push((name.to_string(), value.to_string())),
            },
        }
    }

    /// Render as ` id=".." class=".." name=".."` (empty when there is nothing)
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        if let Some(id) = &self.id {
            html.push_str(&format!(" id=\"{}\"", escape_html(id)));
        }
        if !self.classes.is_empty() {
            html.push_str(&format!(" class=\"{}\"", escape_html(&self.classes.join(" "))));
        }
        for (name, value) in &self.pairs {
            html.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
        html
    }
}

/// Whitespace-separated tokens; quotes (straight or typographic) group
fn tokenize(body: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in body.chars() {
        match quote {
            Some(open) if closes(open, ch) => {
                quote = None;
                current.push(ch);
            }
            Some(_) => current.push(ch),
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => {
                if matches!(ch, '"' | '\'' | '“' | '‘') {
                    quote = Some(ch);
                }
                current.push(ch);
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn closes(open: char, ch: char) -> bool {
    match open {
        '“' => ch == '”',
        '‘' => ch == '’',
        other => ch == other,
    }
}

fn unquote(value: &str) -> &str {
    let quotes: &[char] = &['"', '\'', '“', '”', '‘', '’'];
    value.trim_start_matches(quotes).trim_end_matches(quotes)
}

/// Split a trailing `{{ }}` block off `text`
pub fn split_trailing(text: &str) -> Option<(String, Attributes)> {
    let caps = trailing_re().captures(text)?;
    let whole = caps.get(0)?;
    let attrs = Attributes::parse(&caps[1]);
    Some((text[..whole.start()].to_string(), attrs))
}

/// Byte length of a `{{ }}` block at the start of `text`
pub fn leading_block_len(text: &str) -> Option<usize> {
    let rest = text.strip_prefix(LEFT_DELIMITER)?;
    let close = rest.find(RIGHT_DELIMITER)?;
    if rest[..close].contains('{') {
        return None;
    }
    Some(LEFT_DELIMITER.len() + close + RIGHT_DELIMITER.len())
}

/// Split a leading `{{ }}` block off `text`
pub fn split_leading(text: &str) -> Option<(Attributes, String)> {
    let len = leading_block_len(text)?;
    let body = &text[LEFT_DELIMITER.len()..len - RIGHT_DELIMITER.len()];
    Some((Attributes::parse(body), text[len..].to_string()))
}

/// Attach trailing `{{ }}` blocks to their paragraph or heading
pub fn apply_block_attributes(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut open: Option<usize> = None;
    for index in 0..events.len() {
        match &events[index] {
            Event::Start(Tag::Paragraph) | Event::Start(Tag::Heading { .. }) => open = Some(index),
            Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Heading(_)) => {
                if let Some(start) = open.take() {
                    attach_trailing(&mut events, start, index);
                }
            }
            _ => {}
        }
    }
    events
}

fn attach_trailing(events: &mut [Event<'_>], start: usize, end: usize) {
    if end <= start + 1 {
        return;
    }
    let last = end - 1;
    let after_link = matches!(events[last - 1], Event::End(TagEnd::Link));
    let split = match &events[last] {
        // A block directly after a link belongs to the link
        Event::Text(text) if after_link && text.starts_with(LEFT_DELIMITER) => None,
        Event::Text(text) => split_trailing(text),
        _ => None,
    };
    let Some((rest, attrs)) = split else {
        return;
    };

    events[last] = Event::Text(rest.into());
    if matches!(events[start], Event::Start(Tag::Paragraph)) {
        events[start] = Event::Html(format!("<p{}>", attrs.to_html()).into());
        events[end] = Event::Html("</p>\n".into());
    } else if let Event::Start(Tag::Heading {
        id,
        classes,
        attrs: pairs,
        ..
    }) = &mut events[start]
    {
        if let Some(new_id) = attrs.id {
            *id = Some(CowStr::from(new_id));
        }
        classes.extend(attrs.classes.into_iter().map(CowStr::from));
        pairs.extend(
            attrs
                .pairs
                .into_iter()
                .map(|(name, value)| (CowStr::from(name), Some(CowStr::from(value)))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shorthand_and_pairs() {
        let attrs = Attributes::parse(".note #intro data-kind=tip rel=\"noopener noreferrer\"");
        assert_eq!(attrs.id.as_deref(), Some("intro"));
        assert_eq!(attrs.classes, vec!["note".to_string()]);
        assert_eq!(
            attrs.pairs,
            vec![
                ("data-kind".to_string(), "tip".to_string()),
                ("rel".to_string(), "noopener noreferrer".to_string()),
            ]
        );
    }

    #[test]
    fn test_disallowed_attributes_dropped() {
        let attrs = Attributes::parse("onclick=alert(1) href=javascript:x style=color:red");
        assert_eq!(attrs.pairs, vec![("style".to_string(), "color:red".to_string())]);
    }

    #[test]
    fn test_malformed_names_dropped() {
        let attrs = Attributes::parse("data-x\"onload=1");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_typographic_quotes_accepted() {
        let attrs = Attributes::parse("title=“x” target=“_self”");
        assert_eq!(attrs.pairs, vec![("target".to_string(), "_self".to_string())]);
    }

    #[test]
    fn test_values_escaped_when_rendered() {
        let mut attrs = Attributes::default();
        attrs.set("data-x", "\"><script>");
        assert_eq!(attrs.to_html(), " data-x=\"&quot;&gt;&lt;script&gt;\"");
    }

    #[test]
    fn test_split_trailing() {
        let (rest, attrs) = split_trailing("Some text {{.lead}}").unwrap();
        assert_eq!(rest, "Some text");
        assert_eq!(attrs.classes, vec!["lead".to_string()]);
        assert!(split_trailing("no attributes").is_none());
    }

    #[test]
    fn test_split_leading() {
        let (attrs, rest) = split_leading("{{target=_self}} and more").unwrap();
        assert_eq!(attrs.pairs, vec![("target".to_string(), "_self".to_string())]);
        assert_eq!(rest, " and more");
    }

    #[test]
    fn test_leading_block_len() {
        assert_eq!(leading_block_len("{{.a}} rest"), Some(6));
        assert_eq!(leading_block_len("{{.a rest"), None);
        assert_eq!(leading_block_len(" {{.a}}"), None);
    }

    #[test]
    fn test_url_valued_attribute() {
        let (attrs, rest) = split_leading("{{data-src=https://b.test/x?y=1}}").unwrap();
        assert_eq!(
            attrs.pairs,
            vec![("data-src".to_string(), "https://b.test/x?y=1".to_string())]
        );
        assert_eq!(rest, "");
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut attrs = Attributes::parse("target=_self");
        attrs.set("target", "_blank");
        assert_eq!(attrs.pairs, vec![("target".to_string(), "_blank".to_string())]);
    }
}
