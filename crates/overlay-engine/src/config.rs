//! Overlay configuration
//!
//! Presentation knobs for highlight spans and page containers, loadable from
//! TOML. Every field has a default so an empty table is a valid config.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::identity::IdentifierScheme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Class carried by every highlight span
    pub highlight_class: String,
    /// Extra class carried by user-authored highlight spans
    pub user_class: String,
    /// Class marking page-level container elements
    pub page_class: String,
    /// How annotation identifiers are derived
    pub identifier_scheme: IdentifierScheme,
    /// Alpha of the fill tint derived from the clause color
    pub fill_alpha: f64,
    /// Alpha of the soft shadow under the highlight
    pub shadow_alpha: f64,
    /// Color for user annotations whose type is not catalogued
    pub user_color: String,
    /// Color for detected annotations whose type is not catalogued
    pub fallback_color: String,
    /// Emit a `title` tooltip on highlight spans
    pub tooltips: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            highlight_class: "clause-highlight".to_string(),
            user_class: "user-annotation".to_string(),
            page_class: "page".to_string(),
            identifier_scheme: IdentifierScheme::default(),
            fill_alpha: 0.18,
            shadow_alpha: 0.35,
            user_color: "#f59e0b".to_string(),
            fallback_color: "#9ca3af".to_string(),
            tooltips: true,
        }
    }
}

impl OverlayConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read overlay config: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse overlay configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = OverlayConfig::from_toml_str("").unwrap();
        assert_eq!(config, OverlayConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let toml = r##"
            page_class = "doc-page"
            identifier_scheme = "type_start_and_end"
            user_color = "#2563eb"
            tooltips = false
        "##;
        let config = OverlayConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.page_class, "doc-page");
        assert_eq!(config.identifier_scheme, IdentifierScheme::TypeStartAndEnd);
        assert_eq!(config.user_color, "#2563eb");
        assert!(!config.tooltips);
        assert_eq!(config.highlight_class, "clause-highlight");
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(OverlayConfig::from_toml_str("fill_alpha = \"lots\"").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = OverlayConfig::from_file("/nonexistent/overlay.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read overlay config"));
    }
}
