use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::common::error::{MatcherError, Result};

/// Tuning knobs for the matching pipeline.
///
/// Similarity thresholds are on the 0-100 token-set scale; a candidate must
/// score at or above the threshold to be linked.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum similarity for two brand spellings to fall into one cluster
    pub brand_similarity_threshold: u32,
    /// Minimum similarity for two aliases to be linked as the same product
    pub alias_similarity_threshold: u32,
    /// Marketing suffixes stripped from brand text, in removal order
    pub brand_stop_words: Vec<String>,
    /// What to do with a record that fails normalization
    pub on_invalid_record: InvalidRecordPolicy,
}

/// Policy for records missing a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRecordPolicy {
    /// Log a warning, count the record, keep going
    Skip,
    /// Abort the whole run with the record's error
    Fail,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            brand_similarity_threshold: 85,
            alias_similarity_threshold: 85,
            brand_stop_words: vec![
                "professional".to_string(),
                "cosmetics".to_string(),
                "professionnel".to_string(),
            ],
            on_invalid_record: InvalidRecordPolicy::Skip,
        }
    }
}

impl MatcherConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MatcherError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: MatcherConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = MatcherConfig::default();
        assert_eq!(config.brand_similarity_threshold, 85);
        assert_eq!(config.alias_similarity_threshold, 85);
        assert_eq!(config.brand_stop_words.len(), 3);
        assert_eq!(config.on_invalid_record, InvalidRecordPolicy::Skip);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: MatcherConfig =
            toml::from_str("alias_similarity_threshold = 90").expect("valid toml");
        assert_eq!(config.alias_similarity_threshold, 90);
        assert_eq!(config.brand_similarity_threshold, 85);
        assert_eq!(config.on_invalid_record, InvalidRecordPolicy::Skip);
    }

    #[test]
    fn policy_deserializes_from_snake_case() {
        let config: MatcherConfig =
            toml::from_str("on_invalid_record = \"fail\"").expect("valid toml");
        assert_eq!(config.on_invalid_record, InvalidRecordPolicy::Fail);
    }
}
