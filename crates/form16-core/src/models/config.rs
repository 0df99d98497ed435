//! Configuration structures for the Form 16 pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Form16Error, Result};
use crate::form16::DocumentLayout;

/// Main configuration for the form16 pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Form16Config {
    /// PDF decoding configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Suggestion sampling configuration.
    pub suggestions: SuggestionConfig,

    /// Report rendering configuration.
    pub report: ReportConfig,
}

/// PDF decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to decode (0 = unlimited).
    pub max_pages: usize,

    /// Decoded text shorter than this is reported as a likely decode failure.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Skip template detection and always use this layout.
    pub force_layout: Option<DocumentLayout>,

    /// Log a warning when every field falls back to its default.
    pub warn_on_defaults: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            force_layout: None,
            warn_on_defaults: true,
        }
    }
}

/// Suggestion sampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Include the suggestion bundle in reports.
    pub enabled: bool,

    /// Fixed seed for reproducible sampling. Fresh entropy when unset.
    pub seed: Option<u64>,

    /// Quick tips drawn per category.
    pub quick_tips_per_section: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: None,
            quick_tips_per_section: 2,
        }
    }
}

/// Report rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Currency symbol prefixed to amounts.
    pub currency_symbol: String,

    /// Group digits in lakhs and crores (12,34,567) instead of thousands.
    pub indian_grouping: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            indian_grouping: true,
        }
    }
}

impl Form16Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Form16Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Form16Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Form16Config =
            serde_json::from_str(r#"{ "extraction": { "force_layout": "new" } }"#).unwrap();

        assert_eq!(config.extraction.force_layout, Some(DocumentLayout::New));
        assert!(config.extraction.warn_on_defaults);
        assert_eq!(config.suggestions.quick_tips_per_section, 2);
        assert_eq!(config.report.currency_symbol, "₹");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Form16Config::default();
        config.suggestions.seed = Some(7);
        config.save(&path).unwrap();

        let loaded = Form16Config::from_file(&path).unwrap();
        assert_eq!(loaded.suggestions.seed, Some(7));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Form16Config::from_file(&path), Err(Form16Error::Config(_))));
    }
}
