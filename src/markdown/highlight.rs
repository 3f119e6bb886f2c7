//! Fenced code highlighting
//!
//! With the `code-highlight` feature the code is highlighted by syntect using
//! a light or dark theme. Without it, blocks render as plain escaped code.

use crate::config::Theme;
use crate::error::RenderResult;

use super::escape_html;

/// Plain `<pre><code>` rendering, also the fallback when highlighting fails
pub fn plain_code_block(code: &str, language: &str) -> String {
    if language.is_empty() {
        format!("<pre><code>{}</code></pre>\n", escape_html(code))
    } else {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(language),
            escape_html(code)
        )
    }
}

#[cfg(feature = "code-highlight")]
mod syntect_backend {
    use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
    use syntect::html::highlighted_html_for_string;
    use syntect::parsing::SyntaxSet;

    use super::*;
    use crate::error::RenderError;

    pub const LIGHT_THEME: &str = "InspiredGitHub";
    pub const DARK_THEME: &str = "base16-ocean.dark";

    pub fn theme_name(theme: Theme) -> &'static str {
        match theme {
            Theme::Light => LIGHT_THEME,
            Theme::Dark => DARK_THEME,
        }
    }

    /// Syntax highlighter bound to one color theme
    pub struct CodeHighlighter {
        syntax_set: SyntaxSet,
        theme: SyntectTheme,
        kind: Theme,
    }

    impl CodeHighlighter {
        pub fn new(theme: Theme) -> RenderResult<Self> {
            Ok(Self {
                syntax_set: SyntaxSet::load_defaults_newlines(),
                theme: load_theme(theme)?,
                kind: theme,
            })
        }

        /// Swap the color theme; the syntax definitions are kept
        pub fn set_theme(&mut self, theme: Theme) -> RenderResult<()> {
            self.theme = load_theme(theme)?;
            self.kind = theme;
            Ok(())
        }

        pub fn theme(&self) -> Theme {
            self.kind
        }

        /// Highlight `code`; unknown languages are highlighted as plain text
        pub fn highlight(&self, code: &str, language: &str) -> RenderResult<String> {
            let syntax = self
                .syntax_set
                .find_syntax_by_token(language)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
            highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme)
                .map_err(|e| RenderError::Highlight(e.to_string()))
        }
    }

    impl std::fmt::Debug for CodeHighlighter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("CodeHighlighter")
                .field("theme", &theme_name(self.kind))
                .finish()
        }
    }

    fn load_theme(theme: Theme) -> RenderResult<SyntectTheme> {
        let name = theme_name(theme);
        let mut themes = ThemeSet::load_defaults();
        themes
            .themes
            .remove(name)
            .ok_or_else(|| RenderError::MissingHighlightTheme(name.to_string()))
    }
}

#[cfg(feature = "code-highlight")]
pub use syntect_backend::{theme_name, CodeHighlighter, DARK_THEME, LIGHT_THEME};

#[cfg(not(feature = "code-highlight"))]
mod plain_backend {
    use super::*;

    /// Renders code without syntax coloring
    #[derive(Debug, Clone)]
    pub struct CodeHighlighter {
        kind: Theme,
    }

    impl CodeHighlighter {
        pub fn new(theme: Theme) -> RenderResult<Self> {
            Ok(Self { kind: theme })
        }

        pub fn set_theme(&mut self, theme: Theme) -> RenderResult<()> {
            self.kind = theme;
            Ok(())
        }

        pub fn theme(&self) -> Theme {
            self.kind
        }

        pub fn highlight(&self, code: &str, language: &str) -> RenderResult<String> {
            Ok(plain_code_block(code, language))
        }
    }
}

#[cfg(not(feature = "code-highlight"))]
pub use plain_backend::CodeHighlighter;
