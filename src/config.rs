//! Sheet layout configuration.
//!
//! The defaults reproduce the built-in sheet. A TOML document may override
//! any subset of the fields:
//!
//! ```toml
//! wrap_width = 72
//! aspect_indent = 26
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Widths, indents and derived-stat factors used by the projector.
///
/// # Examples
///
/// ```rust
/// use chargen::SheetConfig;
///
/// let config = SheetConfig::from_toml_str("wrap_width = 60").unwrap();
/// assert_eq!(config.wrap_width, 60);
/// assert_eq!(config.stamina_per_level, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Column at which wrapped text breaks.
    pub wrap_width: usize,
    /// Indent of every line of a wrapped stunt description.
    pub stunt_indent: usize,
    /// Indent applied to aspect and concept text before the first line is
    /// stripped.
    pub aspect_indent: usize,
    /// Stamina granted per character level.
    pub stamina_per_level: i64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            wrap_width: 80,
            stunt_indent: 8,
            aspect_indent: 28,
            stamina_per_level: 20,
        }
    }
}

impl SheetConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded sheet config");
        Ok(config)
    }
}
