//! Markdown Kit - markdown editing engine and preview renderer
//!
//! Two halves:
//! - [`editor`]: selection-aware text operations for a plain-text markdown
//!   surface (inline format toggling, indentation, templates, list
//!   continuation) plus the host glue that applies them
//! - [`markdown`]: the HTML render pipeline used for preview
//!
//! ```
//! use markdown_kit::editor::{toggle_inline_format, InlineFormat, Selection};
//! use markdown_kit::editor::TextBuffer;
//!
//! let buffer = TextBuffer::from_text("Bold text");
//! let selection = Selection::new(&buffer, 5, 9);
//! let result = toggle_inline_format("Bold text", &selection, InlineFormat::Bold);
//! assert_eq!(result.buffer, "Bold **text**");
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod markdown;
pub mod utils;

pub use config::{Config, EditorConfig, RenderConfig, Theme};
pub use editor::{EditResult, MarkdownActions, Selection};
pub use error::{KitError, KitResult};
pub use markdown::{RenderPipeline, RenderedDocument};
