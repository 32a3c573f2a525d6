//! CLI configuration file
//!
//! ```toml
//! [overlay]
//! page_class = "page"
//! identifier_scheme = "type_start_and_end"
//!
//! [catalog]
//! indemnity = { name = "Indemnity", color = "#ef4444" }
//! governing-law = { name = "Governing Law", color = "#3b82f6" }
//! ```

use anyhow::Context;
use overlay_engine::OverlayConfig;
use serde::{Deserialize, Serialize};
use shared_types::ClauseCatalog;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub overlay: OverlayConfig,
    /// Display name and color per clause type
    #[serde(default)]
    pub catalog: ClauseCatalog,
}

impl CliConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse CLI configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_engine::IdentifierScheme;
    use shared_types::ClauseType;

    #[test]
    fn test_parse_full_config() {
        let config = CliConfig::from_toml_str(
            r##"
            [overlay]
            highlight_class = "hl"
            identifier_scheme = "type_start_and_end"

            [catalog]
            indemnity = { name = "Indemnity", color = "#ef4444" }
            governing_law = { name = "Governing Law", color = "#3b82f6" }
            "##,
        )
        .unwrap();

        assert_eq!(config.overlay.highlight_class, "hl");
        assert_eq!(config.overlay.page_class, "page");
        assert_eq!(
            config.overlay.identifier_scheme,
            IdentifierScheme::TypeStartAndEnd
        );
        assert_eq!(config.catalog.len(), 2);
        assert_eq!(
            config.catalog.display_name(&ClauseType::new("governing-law")),
            "Governing Law"
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config.overlay, OverlayConfig::default());
        assert!(config.catalog.is_empty());
    }

    #[test]
    fn test_rejects_malformed_catalog() {
        let err = CliConfig::from_toml_str("[catalog]\nindemnity = 3").unwrap_err();
        assert!(err.to_string().contains("Failed to parse CLI configuration"));
    }
}
