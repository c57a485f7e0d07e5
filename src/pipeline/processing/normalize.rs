//! Normalization of raw source records into matchable items.

use crate::common::error::{MatcherError, Result};
use crate::domain::{NormalizedItem, SourceRecord};
use crate::pipeline::processing::size::ParsedSize;

/// Turns one raw record into a normalized item: cleaned brand, canonical
/// weight string, and a de-branded/de-sized alias text.
pub struct ItemNormalizer {
    stop_words: Vec<String>,
}

impl ItemNormalizer {
    pub fn new(stop_words: &[String]) -> Self {
        Self {
            stop_words: stop_words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Missing `id` or `name` is a required-field violation and fails the
    /// whole record; it is never silently dropped.
    pub fn normalize(
        &self,
        source: &str,
        record: &SourceRecord,
        size: &ParsedSize,
    ) -> Result<NormalizedItem> {
        if record.id.trim().is_empty() {
            return Err(MatcherError::MissingField {
                source: source.to_string(),
                field: "id",
            });
        }
        if record.name.trim().is_empty() {
            return Err(MatcherError::MissingField {
                source: source.to_string(),
                field: "name",
            });
        }

        let mut name = record.name.to_lowercase();

        // Strip the size out of the name at every plausible rendering, from
        // most to least precise, so "250.0 ml" embedded in the display name
        // disappears even when the size field said "250 ml".
        let mut weight_key = String::new();
        if let Some(amount) = size.amount {
            let unit = size.unit.as_deref().unwrap_or("");
            for precision in (0..=3).rev() {
                let rendered = format!("{amount:.precision$} {unit}").trim().to_string();
                name = remove_substring(&name, &rendered);
            }
            weight_key = format!("{} {}", render_amount(amount), unit)
                .trim()
                .to_string();
        }

        // Two brand-removal passes: the raw lowercased brand first, then the
        // stop-word-trimmed brand, since a name may embed either form.
        let raw_brand = record
            .brand
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        name = remove_substring(&name, &raw_brand);

        let mut brand = raw_brand;
        for word in &self.stop_words {
            brand = brand.replace(word.as_str(), "");
        }
        name = remove_substring(&name, &brand);

        // Too short to cluster meaningfully
        let brand = brand.trim();
        let brand = if brand.chars().count() <= 3 {
            "other".to_string()
        } else {
            brand.to_string()
        };

        Ok(NormalizedItem {
            source: source.to_string(),
            id: record.id.clone(),
            code: None,
            brand,
            display_name: record.name.clone(),
            weight_key,
            alias: name.trim().to_string(),
            codes: record.codes.clone(),
            group: None,
        })
    }
}

/// Naive substring removal; not word-boundary aware on purpose.
fn remove_substring(text: &str, pattern: &str) -> String {
    if pattern.trim().is_empty() {
        return text.to_string();
    }
    text.replace(pattern, "")
}

/// The least precise rendering: an integer when the amount has no fractional
/// part (to 3 decimals), otherwise the plain float form.
fn render_amount(amount: f64) -> String {
    let rounded3 = (amount * 1000.0).round() / 1000.0;
    if (amount.round() - rounded3).abs() < f64::EPSILON {
        format!("{}", amount.round() as i64)
    } else {
        format!("{amount}")
    }
}
