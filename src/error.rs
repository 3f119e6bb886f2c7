//! Error types for Markdown Kit
//!
//! Edit operations never surface these to the host: they are raised while
//! parsing identifiers, loading configuration, or highlighting code, and the
//! operation boundary turns them into a logged no-op.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type encompassing all error categories
#[derive(Error, Debug)]
pub enum KitError {
    /// Editor identifier or surface errors
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Render pipeline errors
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Editor operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Format identifier outside the closed set
    #[error("Unknown inline format: {0}")]
    UnknownFormat(String),

    /// Template identifier outside the closed set
    #[error("Unknown markdown template: {0}")]
    UnknownTemplate(String),

    /// Indent action other than add/remove
    #[error("Unknown indent action: {0}")]
    UnknownIndentAction(String),

    /// No text surface registered under the identifier
    #[error("Could not find text surface '{id}'")]
    SurfaceNotFound { id: String },
}

/// Render pipeline errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Theme identifier other than light/dark
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Highlighter theme missing from the loaded theme set
    #[error("Highlight theme not available: {0}")]
    MissingHighlightTheme(String),

    /// Highlighting a code block failed
    #[error("Could not highlight code block: {0}")]
    Highlight(String),

    /// Encoding a diagram source failed
    #[error("Could not encode diagram: {0}")]
    Diagram(String),
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading a configuration file
    #[error("Could not load configuration: {path}")]
    LoadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Result type alias for operations that can fail with KitError
pub type KitResult<T> = Result<T, KitError>;

/// Result type alias for editor identifier parsing and surface lookup
pub type EditorResult<T> = Result<T, EditorError>;

/// Result type alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
