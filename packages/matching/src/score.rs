//! Additive fuzzy match scoring and tier thresholds.

use heritage_map_models::MatchMethod;

use crate::normalize::MatchTarget;

/// Points awarded when both sides carry an equal house number.
const HOUSE_NUMBER_POINTS: u32 = 4;

/// Points awarded when one normalized address contains the other.
const SUBSTRING_POINTS: u32 = 4;

/// Score thresholds for the two fuzzy confidence tiers.
///
/// Kept as configuration rather than hard-coded constants so the CLI and
/// tests can probe boundary behavior exactly at a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchThresholds {
    /// Minimum score for an `address-fuzzy` (medium confidence) match.
    pub high: u32,
    /// Minimum score for an `address-fuzzy-low` (low confidence) match.
    pub low: u32,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self { high: 8, low: 6 }
    }
}

impl MatchThresholds {
    /// Maps a fuzzy score to a match tier, or `None` below the low
    /// threshold.
    #[must_use]
    pub const fn classify(self, score: u32) -> Option<MatchMethod> {
        if score >= self.high {
            Some(MatchMethod::AddressFuzzy)
        } else if score >= self.low {
            Some(MatchMethod::AddressFuzzyLow)
        } else {
            None
        }
    }
}

/// Scores one survey row against one inventory candidate.
///
/// Three independent signals accumulate; all may fire on the same pair:
/// - equal extracted house numbers (+4, digit string equality),
/// - +1 per token shared between the two sides' address∪name token sets,
/// - one normalized address a substring of the other, either direction,
///   when both are non-empty (+4).
///
/// The result is an unbounded integer; higher is better.
#[must_use]
pub fn score(a: &MatchTarget, b: &MatchTarget) -> u32 {
    let mut total = 0;

    if let (Some(ha), Some(hb)) = (&a.house_number, &b.house_number)
        && ha == hb
    {
        total += HOUSE_NUMBER_POINTS;
    }

    let overlap = a.tokens.intersection(&b.tokens).count();
    total += u32::try_from(overlap).unwrap_or(u32::MAX);

    if !a.address.is_empty()
        && !b.address.is_empty()
        && (a.address.contains(&b.address) || b.address.contains(&a.address))
    {
        total += SUBSTRING_POINTS;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_spec_example_above_high_threshold() {
        // "121 Long St" vs "121 long street": house number +4, substring
        // +4, token overlap 3 -> 11.
        let source = MatchTarget::new("121 Long St", "");
        let candidate = MatchTarget::new("121 long street", "");

        let s = score(&source, &candidate);
        assert!(s >= 10, "score was {s}");
        assert_eq!(
            MatchThresholds::default().classify(s),
            Some(MatchMethod::AddressFuzzy)
        );
    }

    #[test]
    fn token_overlap_is_symmetric() {
        let a = MatchTarget::new("10 Loop Street", "Market House");
        let b = MatchTarget::new("Loop Street Market", "");
        assert_eq!(score(&a, &b), score(&b, &a));
    }

    #[test]
    fn house_number_mismatch_scores_no_bonus() {
        let a = MatchTarget::new("121 Long Street", "");
        let b = MatchTarget::new("123 Long Street", "");
        // Tokens "long" and "street" overlap, substring does not apply,
        // house numbers differ: exactly 2.
        assert_eq!(score(&a, &b), 2);
    }

    #[test]
    fn substring_requires_both_sides_non_empty() {
        let a = MatchTarget::new("", "City Hall");
        let b = MatchTarget::new("", "City Hall");
        // Both addresses empty: only the token overlap fires.
        assert_eq!(score(&a, &b), 2);
    }

    #[test]
    fn unrelated_addresses_score_near_zero() {
        let a = MatchTarget::new("121 Long Street", "");
        let b = MatchTarget::new("7 Kloof Nek Road", "");
        assert_eq!(score(&a, &b), 0);
    }

    #[test]
    fn classify_boundaries_sit_exactly_at_thresholds() {
        let thresholds = MatchThresholds::default();
        assert_eq!(thresholds.classify(8), Some(MatchMethod::AddressFuzzy));
        assert_eq!(thresholds.classify(7), Some(MatchMethod::AddressFuzzyLow));
        assert_eq!(thresholds.classify(6), Some(MatchMethod::AddressFuzzyLow));
        assert_eq!(thresholds.classify(5), None);
    }

    #[test]
    fn classify_honors_overridden_thresholds() {
        let thresholds = MatchThresholds { high: 3, low: 1 };
        assert_eq!(thresholds.classify(3), Some(MatchMethod::AddressFuzzy));
        assert_eq!(thresholds.classify(2), Some(MatchMethod::AddressFuzzyLow));
        assert_eq!(thresholds.classify(0), None);
    }
}
