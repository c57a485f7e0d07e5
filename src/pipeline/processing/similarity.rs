//! Token-set string similarity on the 0-100 scale used by the thresholds.
//!
//! The score is robust to word reordering and duplicate tokens: both inputs
//! are tokenized into sets, and the best ratio among the sorted intersection
//! and the two intersection-plus-remainder strings is taken.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Scores two strings 0-100, ignoring word order and duplicate words.
///
/// Identical token sets score 100 regardless of ordering. A side with no
/// tokens at all scores 0 against anything, so empty alias or brand text
/// never fuzzy-matches.
pub fn token_set_ratio(a: &str, b: &str) -> u32 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let intersection = tokens_a.intersection(&tokens_b).copied().collect::<Vec<_>>();
    let only_a = tokens_a.difference(&tokens_b).copied().collect::<Vec<_>>();
    let only_b = tokens_b.difference(&tokens_a).copied().collect::<Vec<_>>();

    let sect = intersection.join(" ");
    let combined_a = join_tokens(&sect, &only_a);
    let combined_b = join_tokens(&sect, &only_b);

    let best = [
        normalized_levenshtein(&sect, &combined_a),
        normalized_levenshtein(&sect, &combined_b),
        normalized_levenshtein(&combined_a, &combined_b),
    ]
    .into_iter()
    .fold(0.0_f64, f64::max);

    (best * 100.0).round() as u32
}

fn join_tokens(sect: &str, rest: &[&str]) -> String {
    if rest.is_empty() {
        return sect.to_string();
    }
    if sect.is_empty() {
        return rest.join(" ");
    }
    format!("{} {}", sect, rest.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(token_set_ratio("acme shampoo", "acme shampoo"), 100);
    }

    #[test]
    fn word_order_is_ignored() {
        assert_eq!(token_set_ratio("shampoo acme", "acme shampoo"), 100);
    }

    #[test]
    fn duplicate_tokens_are_ignored() {
        assert_eq!(token_set_ratio("acme acme shampoo", "shampoo acme"), 100);
    }

    #[test]
    fn subset_scores_high() {
        let score = token_set_ratio("acme shampoo", "acme shampoo repair formula");
        assert!(score >= 50, "score was {score}");
    }

    #[test]
    fn unrelated_strings_score_low() {
        let score = token_set_ratio("acme shampoo", "zorro conditioner");
        assert!(score < 50, "score was {score}");
    }

    #[test]
    fn empty_sides_score_zero() {
        assert_eq!(token_set_ratio("", "acme"), 0);
        assert_eq!(token_set_ratio("acme", ""), 0);
        assert_eq!(token_set_ratio("", ""), 0);
        assert_eq!(token_set_ratio("   ", "acme"), 0);
    }

    #[test]
    fn near_miss_spellings_score_above_default_threshold() {
        let score = token_set_ratio("loreal paris", "loreal pariss");
        assert!(score >= 85, "score was {score}");
    }
}
