//! Configuration structures for the receipt pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Main configuration for the rcpt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Receipt text extraction configuration.
    pub extraction: ExtractionConfig,

    /// OCR provider configuration.
    pub ocr: OcrConfig,
}

/// Tunables for the heuristic extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of leading lines searched for the store address.
    pub address_scan_lines: usize,

    /// How many lines back a discount may reach to find its item.
    pub discount_window: usize,

    /// Lines after a TOTAL marker searched for the grand total.
    pub total_lookahead: usize,

    /// Smallest amount accepted as a price (inclusive).
    pub min_price: Decimal,

    /// Upper price bound (exclusive).
    pub max_price: Decimal,

    /// Fold repeated scans of the same item into one line.
    pub merge_duplicates: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            address_scan_lines: 15,
            discount_window: 3,
            total_lookahead: 15,
            min_price: Decimal::new(1, 2),
            max_price: Decimal::new(10_000, 0),
            merge_duplicates: true,
        }
    }
}

/// OCR provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Text annotation endpoint.
    pub endpoint: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            api_key_env: "GOOGLE_VISION_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RcptConfig =
            serde_json::from_str(r#"{ "extraction": { "discount_window": 5 } }"#).unwrap();

        assert_eq!(config.extraction.discount_window, 5);
        assert_eq!(config.extraction.total_lookahead, 15);
        assert_eq!(config.extraction.min_price, Decimal::new(1, 2));
        assert_eq!(config.ocr.api_key_env, "GOOGLE_VISION_API_KEY");
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("rcpt-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = RcptConfig::default();
        config.extraction.address_scan_lines = 8;
        config.save(&path).unwrap();

        let loaded = RcptConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.address_scan_lines, 8);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
