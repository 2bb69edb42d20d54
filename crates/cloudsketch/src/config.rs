//! Configuration types for cloudsketch layout and rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file by the CLI. Every section and field is optional.
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Tunables of the block layout engine.
//! - [`StyleConfig`] - Colors and fonts used by the SVG renderer.
//!
//! # Example
//!
//! ```
//! # use cloudsketch::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().relocation_limit(), 100);
//! assert!(config.style().header_color().is_ok());
//! ```

use serde::Deserialize;

use cloudsketch_core::color::Color;

const DEFAULT_RELOCATION_LIMIT: usize = 100;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Layout engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Maximum number of element moves while applying layout hints.
    #[serde(default = "default_relocation_limit")]
    relocation_limit: usize,
}

fn default_relocation_limit() -> usize {
    DEFAULT_RELOCATION_LIMIT
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `relocation_limit` - How many moves layout hints may cause before
    ///   the layout is abandoned.
    pub fn new(relocation_limit: usize) -> Self {
        Self { relocation_limit }
    }

    pub fn relocation_limit(&self) -> usize {
        self.relocation_limit
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RELOCATION_LIMIT)
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Header bar color, as a `#RRGGBB` string.
    #[serde(default)]
    header_color: Option<String>,

    /// Stroke color of paths, as a `#RRGGBB` string.
    #[serde(default)]
    path_color: Option<String>,

    /// CSS font family for all text.
    #[serde(default)]
    font_family: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed header [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a `#RRGGBB` color.
    pub fn header_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.header_color.as_deref(), "header")
    }

    /// Returns the parsed path [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a `#RRGGBB` color.
    pub fn path_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.path_color.as_deref(), "path")
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }
}

fn parse_color(value: Option<&str>, what: &str) -> Result<Option<Color>, String> {
    value
        .map(Color::from_hex)
        .transpose()
        .map_err(|err| format!("Invalid {what} color in config: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.layout().relocation_limit(), 100);
        assert_eq!(config.style().header_color(), Ok(None));
        assert_eq!(config.style().path_color(), Ok(None));
        assert_eq!(config.style().font_family(), None);
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let style = StyleConfig {
            header_color: Some("blue".to_string()),
            ..StyleConfig::default()
        };

        let err = style.header_color().unwrap_err();
        assert!(err.starts_with("Invalid header color in config"), "{err}");
    }

    #[test]
    fn test_valid_color() {
        let style = StyleConfig {
            path_color: Some("#112233".to_string()),
            ..StyleConfig::default()
        };

        assert_eq!(
            style.path_color().unwrap().map(Color::to_hex),
            Some("#112233".to_string())
        );
    }
}
