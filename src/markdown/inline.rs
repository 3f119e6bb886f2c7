//! Inline text extensions
//!
//! Runs over merged text events outside code:
//! `==mark==`, `++insert++`, `:shortcode:` emoji, typographic symbol
//! replacements and autolinking of `http(s)://`, `ftp://` and `mailto:` URLs.
//! Linked URLs are left untouched by the replacements.

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::attrs::leading_block_len;

/// Plain-text symbol replacements
const TYPOGRAPHER: [(&str, &str); 7] = [
    ("(c)", "©"),
    ("(C)", "©"),
    ("(r)", "®"),
    ("(R)", "®"),
    ("(tm)", "™"),
    ("(TM)", "™"),
    ("+-", "±"),
];

fn emoji_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":([a-z0-9_+\-]+):").expect("valid regex"))
}

fn inline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"==(?P<mark>[^=\s](?:[^=]*[^=\s])?)==",
            r"|\+\+(?P<ins>[^+\s](?:[^+]*[^+\s])?)\+\+",
            r#"|(?P<url>(?:https?://|ftp://)[^\s<>]*[^\s<>.,;:!?'")\]]"#,
            r#"|mailto:[^\s<>@]+@[^\s<>]*[^\s<>.,;:!?'")\]])"#,
        ))
        .expect("valid regex")
    })
}

/// Merge runs of adjacent text events outside code blocks
pub fn coalesce_text(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out: Vec<Event<'_>> = Vec::with_capacity(events.len());
    let mut in_code = false;
    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code = true;
                out.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code = false;
                out.push(event);
            }
            Event::Text(text) if !in_code => {
                if let Some(Event::Text(previous)) = out.last_mut() {
                    let mut merged = previous.to_string();
                    merged.push_str(&text);
                    *previous = CowStr::from(merged);
                } else {
                    out.push(Event::Text(text));
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Apply inline extensions; soft breaks become hard breaks
pub fn expand_inline(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut in_code = false;
    let mut link_depth = 0usize;
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
            Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                link_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1);
                out.push(event);
            }
            Event::SoftBreak => out.push(Event::HardBreak),
            Event::Text(text) if !in_code => {
                // An attribute block owned by the preceding link stays verbatim
                let split = if follows_link { leading_block_len(&text).unwrap_or(0) } else { 0 };
                if split > 0 {
                    out.push(Event::Text(CowStr::from(text[..split].to_string())));
                }
                out.extend(expand_text(&text[split..], link_depth == 0));
            }
            other => out.push(other),
        }
    }
    out
}

/// Replace known `:shortcode:`s with their emoji
pub fn replace_emoji(text: &str) -> String {
    emoji_re()
        .replace_all(text, |caps: &Captures| match emojis::get_by_shortcode(&caps[1]) {
            Some(emoji) => emoji.as_str().to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

pub fn replace_symbols(text: &str) -> String {
    TYPOGRAPHER
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Emoji and symbol replacement for plain text
fn decorate(text: &str) -> String {
    replace_symbols(&replace_emoji(text))
}

fn expand_text<'a>(text: &str, autolink: bool) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut last = 0;

    for caps in inline_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if caps.name("url").is_some() && !autolink {
            continue;
        }
        if whole.start() > last {
            events.push(Event::Text(CowStr::from(decorate(&text[last..whole.start()]))));
        }

        if let Some(body) = caps.name("mark") {
            push_wrapped(&mut events, "mark", &decorate(body.as_str()));
        } else if let Some(body) = caps.name("ins") {
            push_wrapped(&mut events, "ins", &decorate(body.as_str()));
        } else if let Some(url) = caps.name("url") {
            let url = url.as_str();
            let link_type = if url.starts_with("mailto:") {
                LinkType::Email
            } else {
                LinkType::Autolink
            };
            events.push(Event::Start(Tag::Link {
                link_type,
                dest_url: CowStr::from(url.to_string()),
                title: CowStr::from(""),
                id: CowStr::from(""),
            }));
            events.push(Event::Text(CowStr::from(url.to_string())));
            events.push(Event::End(TagEnd::Link));
        }
        last = whole.end();
    }

    if last < text.len() {
        events.push(Event::Text(CowStr::from(decorate(&text[last..]))));
    }
    events
}

fn push_wrapped(events: &mut Vec<Event<'_>>, element: &str, body: &str) {
    events.push(Event::Html(CowStr::from(format!("<{}>", element))));
    events.push(Event::Text(CowStr::from(body.to_string())));
    events.push(Event::Html(CowStr::from(format!("</{}>", element))));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(events: &[Event<'_>]) -> Vec<String> {
        events
            .iter()
            .map(|event| match event {
                Event::Text(text) => format!("text:{}", text),
                Event::Html(html) => format!("html:{}", html),
                Event::Start(Tag::Link { dest_url, .. }) => format!("link:{}", dest_url),
                Event::End(TagEnd::Link) => "/link".to_string(),
                other => format!("{:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_coalesce_merges_adjacent_text() {
        let events = vec![
            Event::Text("a ".into()),
            Event::Text("==".into()),
            Event::Text("b==".into()),
        ];
        let merged = coalesce_text(events);
        assert_eq!(merged, vec![Event::Text("a ==b==".into())]);
    }

    #[test]
    fn test_mark_and_insert() {
        let events = expand_text("x ==hi== and ++new++", true);
        assert_eq!(
            texts(&events),
            vec![
                "text:x ",
                "html:<mark>",
                "text:hi",
                "html:</mark>",
                "text: and ",
                "html:<ins>",
                "text:new",
                "html:</ins>",
            ]
        );
    }

    #[test]
    fn test_autolink_trims_trailing_punctuation() {
        let events = expand_text("see https://example.com/a.", true);
        assert_eq!(
            texts(&events),
            vec![
                "text:see ",
                "link:https://example.com/a",
                "text:https://example.com/a",
                "/link",
                "text:.",
            ]
        );
    }

    #[test]
    fn test_scheme_less_hosts_are_not_linked() {
        let events = expand_text("www.example.com", true);
        assert_eq!(texts(&events), vec!["text:www.example.com"]);
    }

    #[test]
    fn test_ftp_and_mailto_are_linked() {
        let events = expand_text("ftp://files.test/a mailto:me@home.test", true);
        assert_eq!(
            texts(&events),
            vec![
                "link:ftp://files.test/a",
                "text:ftp://files.test/a",
                "/link",
                "text: ",
                "link:mailto:me@home.test",
                "text:mailto:me@home.test",
                "/link",
            ]
        );
    }

    #[test]
    fn test_replacements_skip_urls() {
        let events = expand_text("(c) https://example.com/a+-b/(r)/:wave:/x +-", true);
        assert_eq!(
            texts(&events),
            vec![
                "text:© ",
                "link:https://example.com/a+-b/(r)/:wave:/x",
                "text:https://example.com/a+-b/(r)/:wave:/x",
                "/link",
                "text: ±",
            ]
        );
    }

    #[test]
    fn test_mark_body_is_decorated() {
        let events = expand_text("==(tm) :wave:==", true);
        assert_eq!(texts(&events), vec!["html:<mark>", "text:™ 👋", "html:</mark>"]);
    }

    #[test]
    fn test_link_attribute_block_left_verbatim() {
        let events = vec![
            Event::End(TagEnd::Link),
            Event::Text("{{data-src=https://b.test}} (c)".into()),
        ];
        let expanded = expand_inline(events);
        assert_eq!(
            texts(&expanded),
            vec!["/link", "text:{{data-src=https://b.test}}", "text: ©"]
        );
    }

    #[test]
    fn test_no_autolink_inside_links() {
        let events = expand_text("https://example.com", false);
        assert_eq!(texts(&events), vec!["text:https://example.com"]);
    }

    #[test]
    fn test_emoji_shortcodes() {
        assert_eq!(replace_emoji("hi :wave:"), "hi 👋");
        assert_eq!(replace_emoji("at 10:30:00"), "at 10:30:00");
        assert_eq!(replace_emoji(":not_an_emoji_name:"), ":not_an_emoji_name:");
    }

    #[test]
    fn test_symbols() {
        assert_eq!(replace_symbols("(c) 2024 (tm) +-5"), "© 2024 ™ ±5");
    }

    #[test]
    fn test_code_blocks_untouched() {
        let events = vec![
            Event::Start(Tag::CodeBlock(pulldown_cmark::CodeBlockKind::Indented)),
            Event::Text("==x== (c)".into()),
            Event::End(TagEnd::CodeBlock),
        ];
        let expanded = expand_inline(events.clone());
        assert_eq!(expanded, events);
    }

    #[test]
    fn test_soft_break_becomes_hard() {
        let expanded = expand_inline(vec![Event::SoftBreak]);
        assert_eq!(expanded, vec![Event::HardBreak]);
    }
}
