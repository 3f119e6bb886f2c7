//! Heading anchors
//!
//! Headings at or above the configured level get a unique slug id and a
//! permalink placed before their text.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};
use std::collections::HashMap;

use super::{escape_html, HEADER_ANCHOR_CLASS, HEADER_LINK_ICON};

/// Generate a URL-safe slug from heading text
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Hands out unique slugs by suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(&mut self, slug: &str) -> String {
        let base = if slug.is_empty() { "section" } else { slug };
        let mut candidate = base.to_string();
        let mut counter = self.seen.get(base).copied().unwrap_or(0);
        while self.seen.contains_key(&candidate) {
            counter += 1;
            candidate = format!("{}-{}", base, counter);
        }
        self.seen.insert(base.to_string(), counter);
        self.seen.entry(candidate.clone()).or_insert(0);
        candidate
    }
}

struct OpenHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    inner: Vec<Event<'a>>,
}

/// Render headings, adding ids and permalinks from `min_level` down
pub fn heading_anchors(events: Vec<Event<'_>>, min_level: u8) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut slugs = SlugRegistry::new();
    let mut open: Option<OpenHeading<'_>> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                open = Some(OpenHeading {
                    level,
                    id,
                    classes,
                    attrs,
                    inner: Vec::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = open.take() {
                    render_heading(&mut out, heading, min_level, &mut slugs);
                }
            }
            other => match open.as_mut() {
                Some(heading) => heading.inner.push(other),
                None => out.push(other),
            },
        }
    }
    out
}

fn render_heading<'a>(
    out: &mut Vec<Event<'a>>,
    heading: OpenHeading<'a>,
    min_level: u8,
    slugs: &mut SlugRegistry,
) {
    let level = heading.level as u8;
    let anchored = level >= min_level;
    let id = match heading.id {
        Some(id) => Some(slugs.unique(&id)),
        None if anchored => Some(slugs.unique(&slugify(&plain_text(&heading.inner)))),
        None => None,
    };

    let mut open = format!("<h{}", level);
    if let Some(id) = &id {
        open.push_str(&format!(" id=\"{}\"", escape_html(id)));
    }
    if anchored {
        open.push_str(" tabindex=\"-1\"");
    }
    if !heading.classes.is_empty() {
        let classes: Vec<&str> = heading.classes.iter().map(|class| class.as_ref()).collect();
        open.push_str(&format!(" class=\"{}\"", escape_html(&classes.join(" "))));
    }
    for (name, value) in &heading.attrs {
        let value = value.as_deref().unwrap_or("");
        open.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
    }
    open.push('>');

    if let (true, Some(id)) = (anchored, &id) {
        open.push_str(&format!(
            "<a class=\"{}\" href=\"#{}\" aria-hidden=\"true\">{}</a> ",
            HEADER_ANCHOR_CLASS,
            escape_html(id),
            HEADER_LINK_ICON
        ));
    }

    out.push(Event::Html(CowStr::from(open)));
    out.extend(heading.inner);
    out.push(Event::Html(CowStr::from(format!("</h{}>\n", level))));
}

fn plain_text(events: &[Event<'_>]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) | Event::Code(text) => Some(text.as_ref()),
            _ => None,
        })
        .collect()
}
