//! Editor module for Markdown Kit
//!
//! Contains the text-manipulation engine:
//! - Text buffer splicing (using ropey)
//! - Selection tracking
//! - Inline format toggling
//! - Indentation
//! - Block template insertion
//! - Newline continuation of lists and quotes
//! - Keyboard shortcut resolution
//!
//! The engine functions are pure: `(buffer, selection, params) -> EditResult`.
//! [`MarkdownActions`] is the host-side glue that reads a [`TextSurface`],
//! runs one operation and writes the result back.

pub mod buffer;
pub mod edit;
pub mod format;
pub mod indent;
pub mod newline;
pub mod selection;
pub mod shortcuts;
pub mod surface;
pub mod template;

pub use buffer::TextBuffer;
pub use edit::EditResult;
pub use format::{toggle_inline_format, InlineFormat};
pub use indent::{toggle_indent, IndentAction};
pub use newline::insert_newline;
pub use selection::{capture_selection, Selection};
pub use shortcuts::{key_binds, resolve_shortcut, EditorAction, KeyBind, Modifier};
pub use surface::{MemorySurface, SurfaceProvider, SurfaceRegistry, TextSurface};
pub use template::{insert_template, MarkdownTemplate};

use crate::config::EditorConfig;
use crate::error::EditorError;

/// Editor actions bound to one text surface
#[derive(Debug, Clone)]
pub struct MarkdownActions {
    /// Identifier of the surface to edit
    surface_id: String,
    /// Tab size and code block language
    config: EditorConfig,
}

impl MarkdownActions {
    pub fn new(surface_id: &str, config: EditorConfig) -> Self {
        Self {
            surface_id: surface_id.to_string(),
            config,
        }
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current selection of the surface; the zero selection if it cannot be read
    pub fn selected_text(&self, provider: &mut dyn SurfaceProvider) -> Selection {
        match provider.surface(&self.surface_id) {
            Some(surface) => capture_selection(&surface.value(), surface.selection_range()),
            None => {
                log::warn!("selected_text: {}", self.missing_surface());
                Selection::zero()
            }
        }
    }

    /// Toggle inline formatting. Only applies while the surface has focus.
    pub fn toggle_inline_formatting(
        &self,
        provider: &mut dyn SurfaceProvider,
        format: InlineFormat,
    ) -> Option<EditResult> {
        self.apply(provider, "toggle_inline_formatting", true, |buffer, selection| {
            toggle_inline_format(buffer, selection, format)
        })
    }

    /// Toggle inline formatting from a format name, rejecting unknown names
    pub fn toggle_inline_formatting_named(
        &self,
        provider: &mut dyn SurfaceProvider,
        format: &str,
    ) -> Option<EditResult> {
        match format.parse::<InlineFormat>() {
            Ok(format) => self.toggle_inline_formatting(provider, format),
            Err(err) => {
                log::warn!("toggle_inline_formatting: {}", err);
                None
            }
        }
    }

    /// Indent or outdent by the configured tab size
    pub fn toggle_tab(
        &self,
        provider: &mut dyn SurfaceProvider,
        action: IndentAction,
    ) -> Option<EditResult> {
        let tab_size = self.config.tab_size;
        self.apply(provider, "toggle_tab", false, |buffer, selection| {
            toggle_indent(buffer, selection, action, tab_size)
        })
    }

    /// Insert a block template at the cursor
    pub fn insert_markdown_template(
        &self,
        provider: &mut dyn SurfaceProvider,
        template: MarkdownTemplate,
    ) -> Option<EditResult> {
        let language = self.config.default_codeblock_language.as_str();
        self.apply(provider, "insert_markdown_template", false, |buffer, selection| {
            insert_template(buffer, selection, template, language)
        })
    }

    /// Insert a template from its name, rejecting unknown names
    pub fn insert_markdown_template_named(
        &self,
        provider: &mut dyn SurfaceProvider,
        template: &str,
    ) -> Option<EditResult> {
        match template.parse::<MarkdownTemplate>() {
            Ok(template) => self.insert_markdown_template(provider, template),
            Err(err) => {
                log::warn!("insert_markdown_template: {}", err);
                None
            }
        }
    }

    /// Paragraph break with list and quote continuation
    pub fn insert_new_line(&self, provider: &mut dyn SurfaceProvider) -> Option<EditResult> {
        self.apply(provider, "insert_new_line", false, insert_newline)
    }

    /// Dispatch a logical action, e.g. one resolved from a shortcut
    pub fn perform(
        &self,
        provider: &mut dyn SurfaceProvider,
        action: EditorAction,
    ) -> Option<EditResult> {
        match action {
            EditorAction::Format(format) => self.toggle_inline_formatting(provider, format),
            EditorAction::Indent(indent) => self.toggle_tab(provider, indent),
            EditorAction::Template(template) => self.insert_markdown_template(provider, template),
            EditorAction::Newline => self.insert_new_line(provider),
        }
    }

    /// Read the surface, run one engine operation, write value and selection
    /// back. Returns `None` when nothing was applied.
    fn apply<F>(
        &self,
        provider: &mut dyn SurfaceProvider,
        name: &str,
        requires_focus: bool,
        operation: F,
    ) -> Option<EditResult>
    where
        F: FnOnce(&str, &Selection) -> EditResult,
    {
        let Some(surface) = provider.surface(&self.surface_id) else {
            log::warn!("{}: {}", name, self.missing_surface());
            return None;
        };

        if requires_focus && !surface.is_focused() {
            log::debug!("{}: surface '{}' is not focused", name, self.surface_id);
            return None;
        }

        let buffer = surface.value();
        let selection = capture_selection(&buffer, surface.selection_range());
        let result = operation(&buffer, &selection);

        if !result.is_noop_for(&buffer) {
            surface.set_value(&result.buffer);
        }
        surface.focus();
        surface.set_selection_range(result.selection.start, result.selection.end);
        Some(result)
    }

    fn missing_surface(&self) -> EditorError {
        EditorError::SurfaceNotFound {
            id: self.surface_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(value: &str, start: usize, end: usize) -> (MarkdownActions, SurfaceRegistry) {
        let mut registry = SurfaceRegistry::new();
        registry.insert(
            "md-editor",
            MemorySurface::new(value).with_selection(start, end).focused(),
        );
        (MarkdownActions::new("md-editor", EditorConfig::default()), registry)
    }

    #[test]
    fn test_format_writes_back_to_surface() {
        let (actions, mut registry) = setup("Bold text", 5, 9);
        let result = actions
            .toggle_inline_formatting(&mut registry, InlineFormat::Bold)
            .unwrap();
        assert_eq!(result.buffer, "Bold **text**");

        let surface = registry.get("md-editor").unwrap();
        assert_eq!(surface.value(), "Bold **text**");
        assert_eq!(surface.selection(), (5, 13));
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let (_, mut registry) = setup("text", 0, 0);
        let actions = MarkdownActions::new("elsewhere", EditorConfig::default());
        assert!(actions.insert_new_line(&mut registry).is_none());
        assert_eq!(actions.selected_text(&mut registry), Selection::zero());
        assert_eq!(registry.get("md-editor").unwrap().value(), "text");
    }

    #[test]
    fn test_unfocused_surface_ignores_formatting() {
        let mut registry = SurfaceRegistry::new();
        registry.insert("md-editor", MemorySurface::new("abc").with_selection(0, 3));
        let actions = MarkdownActions::new("md-editor", EditorConfig::default());
        assert!(actions
            .toggle_inline_formatting(&mut registry, InlineFormat::Italic)
            .is_none());
        assert_eq!(registry.get("md-editor").unwrap().value(), "abc");
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let (actions, mut registry) = setup("abc", 0, 3);
        assert!(actions
            .toggle_inline_formatting_named(&mut registry, "blink")
            .is_none());
        assert!(actions
            .insert_markdown_template_named(&mut registry, "diagram")
            .is_none());
        assert_eq!(registry.get("md-editor").unwrap().value(), "abc");
    }

    #[test]
    fn test_tab_uses_configured_width() {
        let mut registry = SurfaceRegistry::new();
        registry.insert("md-editor", MemorySurface::new("x").with_selection(0, 0));
        let config = EditorConfig {
            tab_size: 4,
            ..EditorConfig::default()
        };
        let actions = MarkdownActions::new("md-editor", config);
        actions.toggle_tab(&mut registry, IndentAction::Add).unwrap();
        let surface = registry.get("md-editor").unwrap();
        assert_eq!(surface.value(), "    x");
        assert_eq!(surface.selection(), (4, 4));
        assert!(surface.is_focused());
    }

    #[test]
    fn test_shortcut_dispatch() {
        let (actions, mut registry) = setup("- item", 6, 6);
        let action = resolve_shortcut("Enter", &[]).unwrap();
        actions.perform(&mut registry, action).unwrap();
        assert_eq!(registry.get("md-editor").unwrap().value(), "- item\n- ");
    }

    #[test]
    fn test_named_template_uses_configured_language() {
        let mut registry = SurfaceRegistry::new();
        registry.insert("md-editor", MemorySurface::new("").focused());
        let config = EditorConfig {
            default_codeblock_language: "rust".to_string(),
            ..EditorConfig::default()
        };
        let actions = MarkdownActions::new("md-editor", config);
        let result = actions
            .insert_markdown_template_named(&mut registry, "codeblock")
            .unwrap();
        assert_eq!(result.selection.text, "rust");
    }
}
