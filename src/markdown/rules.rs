//! Block and link render rules
//!
//! Each rule is an event pass that replaces the default rendering of one
//! construct with its own HTML:
//! - raw HTML is shown as text
//! - links carry `{{ }}` attributes and open external targets in a new tab
//! - fenced code is highlighted and wrapped with a copy button, diagram
//!   fences become diagrams
//! - tables get a scroll wrapper

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Tag, TagEnd};

use super::attrs::{split_leading, Attributes};
use super::diagram::{render_diagram, DiagramKind};
use super::highlight::{plain_code_block, CodeHighlighter};
use super::{
    escape_attribute, escape_html, CODE_CONTAINER_CLASS, COPY_BUTTON_CLASS, COPY_ICON,
    TABLE_CLASS, TABLE_WRAPPER_CLASS,
};

/// Link schemes that never become anchors
const BLOCKED_SCHEMES: [&str; 4] = ["javascript:", "vbscript:", "file:", "data:"];

/// Render raw HTML as literal text
pub fn escape_raw_html(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::HtmlBlock) => Event::Start(Tag::Paragraph),
            Event::End(TagEnd::HtmlBlock) => Event::End(TagEnd::Paragraph),
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        })
        .collect()
}

fn is_blocked(href: &str) -> bool {
    let href = href.trim().to_ascii_lowercase();
    BLOCKED_SCHEMES.iter().any(|scheme| href.starts_with(scheme))
}

/// Opening `<a>` tag for a link
pub fn anchor_open(href: &str, title: &str, mut attrs: Attributes) -> String {
    if href.contains("http") {
        attrs.set("target", "_blank");
    }
    let mut open = format!("<a href=\"{}\"", escape_html(href));
    if !title.is_empty() {
        open.push_str(&format!(" title=\"{}\"", escape_html(title)));
    }
    open.push_str(&attrs.to_html());
    open.push('>');
    open
}

/// Render links, attaching a `{{ }}` block that directly follows them
pub fn links(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    // Links with a blocked scheme render their text only
    let mut suppressed = false;

    for index in 0..events.len() {
        let link = match &events[index] {
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => Some((dest_url.to_string(), title.to_string())),
            _ => None,
        };

        if let Some((href, title)) = link {
            let close = events[index..]
                .iter()
                .position(|event| matches!(event, Event::End(TagEnd::Link)))
                .map(|offset| index + offset);

            let trailing = close.map(|close| close + 1);
            let leading = match trailing.and_then(|next| events.get(next)) {
                Some(Event::Text(text)) => split_leading(text),
                _ => None,
            };
            let mut attrs = Attributes::default();
            if let (Some(next), Some((parsed, rest))) = (trailing, leading) {
                attrs = parsed;
                events[next] = Event::Text(CowStr::from(rest));
            }

            if is_blocked(&href) {
                log::debug!("Rendering link with blocked scheme as text: {}", href);
                suppressed = true;
            } else {
                out.push(Event::Html(CowStr::from(anchor_open(&href, &title, attrs))));
            }
            continue;
        }

        match &events[index] {
            Event::End(TagEnd::Link) if suppressed => suppressed = false,
            Event::End(TagEnd::Link) => out.push(Event::Html(CowStr::from("</a>"))),
            other => out.push(other.clone()),
        }
    }
    out
}

/// Render fenced code through the highlighter inside a copy container
pub fn code_blocks<'a>(events: Vec<Event<'a>>, highlighter: &CodeHighlighter) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut in_fence = false;
    let mut language = String::new();
    let mut code = String::new();

    for event in events {
        if in_fence {
            match event {
                Event::Text(text) => code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    in_fence = false;
                    let rendered = render_fence(&language, &code, highlighter);
                    out.push(Event::Html(CowStr::from(rendered)));
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                in_fence = true;
                language = info.split_whitespace().next().unwrap_or("").to_string();
                code.clear();
            }
            other => out.push(other),
        }
    }
    out
}

/// Highlighted block with a copy button holding the raw code.
/// Empty blocks are returned without the container; diagram fences render
/// as diagrams.
pub fn render_fence(language: &str, code: &str, highlighter: &CodeHighlighter) -> String {
    if let Some(kind) = DiagramKind::from_language(language) {
        match render_diagram(kind, code) {
            Ok(html) => return html,
            Err(err) => log::warn!("Rendering {} diagram failed: {}", kind.as_str(), err),
        }
    }

    let body = highlighter.highlight(code, language).unwrap_or_else(|err| {
        log::warn!("Highlighting '{}' failed: {}", language, err);
        plain_code_block(code, language)
    });

    let copy_text = code.strip_suffix('\n').unwrap_or(code);
    if copy_text.is_empty() {
        return body;
    }

    format!(
        concat!(
            "<div class=\"{container}\" style=\"position: relative\">\n",
            "{body}",
            "<button class=\"{button}\" data-copytext=\"{copy}\" aria-label=\"Copy code\" ",
            "tabindex=\"0\" type=\"button\">{icon}</button>\n",
            "</div>\n"
        ),
        container = CODE_CONTAINER_CLASS,
        body = body,
        button = COPY_BUTTON_CLASS,
        copy = escape_attribute(copy_text),
        icon = COPY_ICON,
    )
}

/// Render tables inside a scroll wrapper
pub fn tables(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut table: Option<Vec<Event<'_>>> = None;

    for event in events {
        match event {
            Event::Start(Tag::Table(_)) => table = Some(vec![event]),
            Event::End(TagEnd::Table) => match table.take() {
                Some(mut rows) => {
                    rows.push(event);
                    out.push(Event::Html(CowStr::from(render_table(rows))));
                }
                None => out.push(event),
            },
            other => match table.as_mut() {
                Some(rows) => rows.push(other),
                None => out.push(other),
            },
        }
    }
    if let Some(rows) = table {
        out.extend(rows);
    }
    out
}

fn render_table(events: Vec<Event<'_>>) -> String {
    let mut inner = String::new();
    html::push_html(&mut inner, events.into_iter());
    let inner = inner.replacen(
        "<table>",
        &format!("<table class=\"{}\">", TABLE_CLASS),
        1,
    );
    format!("<div class=\"{}\">\n{}</div>\n", TABLE_WRAPPER_CLASS, inner.trim_start())
}
