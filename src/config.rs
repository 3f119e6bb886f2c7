//! Configuration management for Markdown Kit
//!
//! Handles loading and managing engine and render configuration.
//! Configuration is stored as JSON, either at an explicit path or in the
//! user configuration directory.

use crate::error::{ConfigError, ConfigResult, RenderError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory name used under the platform configuration directory
pub const APP_ID: &str = "markdown-kit";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default indentation unit in spaces
pub const DEFAULT_TAB_SIZE: usize = 2;

/// The time, in milliseconds, to debounce change notifications
pub const EDITOR_DEBOUNCE_TIMEOUT: u64 = 400;

/// Language placeholder written into inserted code blocks
pub const DEFAULT_CODEBLOCK_LANGUAGE: &str = "markdown";

/// Lowest heading level that receives a permalink anchor
pub const DEFAULT_ANCHOR_MIN_LEVEL: u8 = 2;

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Edit engine configuration
    pub editor: EditorConfig,

    /// Render pipeline configuration
    pub render: RenderConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    /// when no file exists yet
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.editor.tab_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "editor.tab_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.editor.default_codeblock_language.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                key: "editor.default_codeblock_language".to_string(),
                reason: "must be a single token".to_string(),
            });
        }
        if !(1..=6).contains(&self.render.heading_anchor_min_level) {
            return Err(ConfigError::InvalidValue {
                key: "render.heading_anchor_min_level".to_string(),
                reason: "must be between 1 and 6".to_string(),
            });
        }
        Ok(())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the default configuration file path
    pub fn config_path() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE_NAME))
    }
}

/// Edit engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Indentation unit in spaces
    pub tab_size: usize,

    /// Debounce window for change notifications, in milliseconds
    pub debounce_ms: u64,

    /// Language placeholder for inserted code blocks
    pub default_codeblock_language: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            debounce_ms: EDITOR_DEBOUNCE_TIMEOUT,
            default_codeblock_language: DEFAULT_CODEBLOCK_LANGUAGE.to_string(),
        }
    }
}

/// Render pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Theme used for code highlighting
    pub theme: Theme,

    /// Lowest heading level that receives a permalink anchor
    pub heading_anchor_min_level: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            heading_anchor_min_level: DEFAULT_ANCHOR_MIN_LEVEL,
        }
    }
}

/// Light/dark theme signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(RenderError::UnknownTheme(other.to_string())),
        }
    }
}
