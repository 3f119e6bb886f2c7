//! Markdown module for Markdown Kit
//!
//! Renders markdown to HTML for preview:
//! - CommonMark parsing with tables, footnotes, task lists, definition lists
//! - Inline extensions (mark, insert, emoji, typographic symbols, autolinks)
//! - `{{ }}` attribute injection with an allow-list
//! - Heading anchors
//! - Highlighted code blocks with a copy button
//! - Mermaid and PlantUML diagram fences
//! - Abbreviations
//! - Frontmatter extraction
//!
//! Raw HTML in the source is never passed through.

pub mod abbr;
pub mod anchor;
pub mod attrs;
pub mod diagram;
pub mod frontmatter;
pub mod highlight;
pub mod inline;
pub mod rules;

pub use abbr::Abbreviations;
pub use anchor::{slugify, SlugRegistry};
pub use attrs::{Attributes, ALLOWED_ATTRIBUTES};
pub use diagram::DiagramKind;
pub use frontmatter::Frontmatter;
pub use highlight::CodeHighlighter;

use pulldown_cmark::{html, Options, Parser};

use crate::config::{RenderConfig, Theme};
use crate::error::RenderResult;

pub const TABLE_WRAPPER_CLASS: &str = "markdown-ui-table-wrapper";
pub const TABLE_CLASS: &str = "markdown-ui-table";
pub const CODE_CONTAINER_CLASS: &str = "markdown-ui-code-block-container";
pub const COPY_BUTTON_CLASS: &str = "markdown-ui-code-block-copy-button";
pub const HEADER_ANCHOR_CLASS: &str = "header-anchor";

pub const COPY_ICON: &str = concat!(
    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"16\" height=\"16\" viewBox=\"0 0 24 24\" ",
    "fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\" aria-hidden=\"true\">",
    "<rect x=\"9\" y=\"9\" width=\"13\" height=\"13\" rx=\"2\"/>",
    "<path d=\"M5 15H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2h9a2 2 0 0 1 2 2v1\"/></svg>"
);

pub const HEADER_LINK_ICON: &str = concat!(
    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"16\" height=\"16\" viewBox=\"0 0 24 24\" ",
    "fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\">",
    "<path d=\"M10 13a5 5 0 0 0 7.54.54l3-3a5 5 0 0 0-7.07-7.07l-1.72 1.71\"/>",
    "<path d=\"M14 11a5 5 0 0 0-7.54-.54l-3 3a5 5 0 0 0 7.07 7.07l1.71-1.71\"/></svg>"
);

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape for a `data-copytext` attribute
pub fn escape_attribute(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Parser extensions enabled for every document
pub fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options.insert(Options::ENABLE_DEFINITION_LIST);
    options.insert(Options::ENABLE_SUPERSCRIPT);
    options.insert(Options::ENABLE_SUBSCRIPT);
    options
}

/// Output of one render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html: String,
    pub frontmatter: Option<Frontmatter>,
}

/// Markdown to HTML renderer, configured for one theme
#[derive(Debug)]
pub struct RenderPipeline {
    options: Options,
    highlighter: CodeHighlighter,
    anchor_min_level: u8,
}

impl RenderPipeline {
    pub fn new(config: &RenderConfig) -> RenderResult<Self> {
        log::debug!("Creating render pipeline with {} theme", config.theme.as_str());
        Ok(Self {
            options: parser_options(),
            highlighter: CodeHighlighter::new(config.theme)?,
            anchor_min_level: config.heading_anchor_min_level,
        })
    }

    /// Pipeline with default settings for `theme`
    pub fn with_theme(theme: Theme) -> RenderResult<Self> {
        Self::new(&RenderConfig {
            theme,
            ..RenderConfig::default()
        })
    }

    /// Switch the highlight theme. A no-op when it is already active.
    pub fn reconfigure(&mut self, theme: Theme) -> RenderResult<()> {
        if self.highlighter.theme() == theme {
            return Ok(());
        }
        log::debug!("Switching render theme to {}", theme.as_str());
        self.highlighter.set_theme(theme)
    }

    pub fn theme(&self) -> Theme {
        self.highlighter.theme()
    }

    /// Render a document
    pub fn render(&self, markdown: &str) -> RenderedDocument {
        let (source, abbreviations) = abbr::extract(markdown);
        let events: Vec<_> = Parser::new_ext(&source, self.options).collect();

        let events = rules::escape_raw_html(events);
        let (events, frontmatter) = frontmatter::extract(events);
        let events = inline::coalesce_text(events);
        let events = attrs::apply_block_attributes(events);
        let events = inline::expand_inline(events);
        let events = abbr::apply(events, &abbreviations);
        let events = rules::links(events);
        let events = anchor::heading_anchors(events, self.anchor_min_level);
        let events = rules::code_blocks(events, &self.highlighter);
        let events = rules::tables(events);

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        RenderedDocument {
            html: output,
            frontmatter,
        }
    }

    /// Render a document to HTML only
    pub fn render_html(&self, markdown: &str) -> String {
        self.render(markdown).html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        RenderPipeline::with_theme(Theme::Light)
            .unwrap()
            .render_html(markdown)
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render("<script>alert(1)</script>\n\nInline <b>bold</b> tag");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_script_in_table_cell_is_escaped() {
        let html = render("| a |\n|---|\n| <script>x</script> |\n");
        assert!(!html.contains("<script>"));
        assert!(html.contains("<td>&lt;script&gt;x&lt;/script&gt;</td>"));
    }

    #[test]
    fn test_table_is_wrapped() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.starts_with("<div class=\"markdown-ui-table-wrapper\">"));
        assert!(html.contains("<table class=\"markdown-ui-table\">"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_external_links_open_in_new_tab() {
        let html = render("[site](https://example.com) and [doc](/local)");
        assert!(html.contains("<a href=\"https://example.com\" target=\"_blank\">site</a>"));
        assert!(html.contains("<a href=\"/local\">doc</a>"));
    }

    #[test]
    fn test_fenced_code_gets_copy_container() {
        let html = render("```rust\nfn main() {}\n```\n");
        assert!(html.contains(CODE_CONTAINER_CLASS));
        assert!(html.contains("data-copytext=\"fn main() {}\""));
    }

    #[test]
    fn test_heading_anchor_levels() {
        let html = render("# Title\n\n## Getting Started\n\n## Getting Started\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<h2 id=\"getting-started\" tabindex=\"-1\">"));
        assert!(html.contains("<h2 id=\"getting-started-1\" tabindex=\"-1\">"));
        assert!(html.contains("href=\"#getting-started\""));
    }

    #[test]
    fn test_paragraph_attributes() {
        let html = render("A note {{.callout #first onclick=alert(1)}}\n");
        assert!(html.contains("<p id=\"first\" class=\"callout\">A note</p>"));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn test_heading_attributes() {
        let html = render("### Setup {{.wide}}\n");
        assert!(html.contains("<h3 id=\"setup\" tabindex=\"-1\" class=\"wide\">"));
    }

    #[test]
    fn test_link_attributes() {
        let html = render("[a](https://a.test){{rel=nofollow}} end\n");
        assert!(html.contains("<a href=\"https://a.test\" rel=\"nofollow\" target=\"_blank\">a</a> end"));
    }

    #[test]
    fn test_inline_extensions() {
        let html = render("==hot== ++new++ :wave: (c) ~low~ ^high^ ~~gone~~\n");
        assert!(html.contains("<mark>hot</mark>"));
        assert!(html.contains("<ins>new</ins>"));
        assert!(html.contains("👋"));
        assert!(html.contains("©"));
        assert!(html.contains("<sub>low</sub>"));
        assert!(html.contains("<sup>high</sup>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_autolinked_url_keeps_its_characters() {
        let html = render("see https://example.com/a+-b/(c)/:wave:/x now (c)\n");
        assert!(html.contains(
            "<a href=\"https://example.com/a+-b/(c)/:wave:/x\" target=\"_blank\">https://example.com/a+-b/(c)/:wave:/x</a>"
        ));
        assert!(html.contains("now ©"));
    }

    #[test]
    fn test_url_valued_link_attribute() {
        let html = render("[a](https://a.test){{data-src=https://b.test}} end\n");
        assert!(html.contains(
            "<a href=\"https://a.test\" data-src=\"https://b.test\" target=\"_blank\">a</a> end"
        ));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_abbreviations() {
        let html = render("Write HTML by hand.\n\n*[HTML]: Hyper Text Markup Language\n");
        assert!(html.contains("<abbr title=\"Hyper Text Markup Language\">HTML</abbr>"));
        assert!(!html.contains("*[HTML]"));
    }

    #[test]
    fn test_diagram_fences() {
        let html = render("```mermaid\ngraph TD\nA-->B\n```\n\n```plantuml\nBob -> Alice : hello\n```\n");
        assert!(html.contains("<div class=\"mermaid\">graph TD\nA--&gt;B\n</div>"));
        assert!(html.contains("<img class=\"plantuml\" src=\"https://www.plantuml.com/plantuml/svg/"));
        assert!(!html.contains(CODE_CONTAINER_CLASS));
    }

    #[test]
    fn test_bare_urls_are_linked() {
        let html = render("Visit https://example.com/docs today\n");
        assert!(html.contains(
            "<a href=\"https://example.com/docs\" target=\"_blank\">https://example.com/docs</a>"
        ));
    }

    #[test]
    fn test_soft_breaks_render_as_br() {
        let html = render("line one\nline two\n");
        assert!(html.contains("line one<br />"));
    }

    #[test]
    fn test_frontmatter_is_extracted() {
        let pipeline = RenderPipeline::with_theme(Theme::Light).unwrap();
        let doc = pipeline.render("---\ntitle: Notes\n---\n\nBody\n");
        assert_eq!(doc.frontmatter.unwrap().get("title"), Some("Notes"));
        assert!(!doc.html.contains("title:"));
        assert!(doc.html.contains("<p>Body</p>"));
    }

    #[test]
    fn test_task_list_and_footnote() {
        let html = render("- [x] done\n- [ ] todo\n\nText[^1]\n\n[^1]: Note\n");
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("footnote"));
    }

    #[test]
    fn test_reconfigure_theme() {
        let mut pipeline = RenderPipeline::with_theme(Theme::Light).unwrap();
        pipeline.reconfigure(Theme::Dark).unwrap();
        assert_eq!(pipeline.theme(), Theme::Dark);
        assert!(pipeline.render_html("```\ncode\n```\n").contains("code"));
    }

    #[test]
    fn test_escape_helpers() {
        assert_eq!(escape_html("<a href='x'>"), "&lt;a href=&#39;x&#39;&gt;");
        assert_eq!(escape_attribute("'&\""), "&apos;&amp;&quot;");
    }
}
