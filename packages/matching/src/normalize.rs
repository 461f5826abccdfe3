//! Address/name canonicalization and tokenization.
//!
//! Survey addresses and inventory addresses were typed by different hands
//! decades apart ("121 Long St" vs "121 Long Street, Cape Town"), so both
//! sides are lower-cased, de-abbreviated, and tokenized before comparison.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Whole-word "st" → "street".
static ST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bst\b").expect("valid regex"));

/// Whole-word "rd" → "road".
static RD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\brd\b").expect("valid regex"));

/// Whole-word "ave" → "avenue".
static AVE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bave\b").expect("valid regex"));

/// First standalone 1-5 digit token, taken as the house number.
static HOUSE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,5}\b").expect("valid regex"));

/// Canonicalizes free-text address or name fields.
///
/// Lower-cases, turns commas into spaces, expands `&` to `and`, expands
/// the street-type abbreviations `st`/`rd`/`ave` as whole words only, and
/// collapses runs of whitespace.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let spaced = lower.replace(',', " ").replace('&', " and ");
    let expanded = ST_RE.replace_all(&spaced, "street");
    let expanded = RD_RE.replace_all(&expanded, "road");
    let expanded = AVE_RE.replace_all(&expanded, "avenue");
    expanded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits normalized text on runs of non-alphanumeric characters into a
/// set of comparison tokens. Order is irrelevant and duplicates collapse
/// since scoring uses set intersection.
#[must_use]
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Extracts the first standalone 1-5 digit token from normalized address
/// text, compared digit-for-digit between the two sides.
#[must_use]
pub fn house_number(normalized_address: &str) -> Option<String> {
    HOUSE_NUMBER_RE
        .find(normalized_address)
        .map(|m| m.as_str().to_owned())
}

/// One side of a fuzzy comparison, precomputed once.
///
/// Inventory candidates build theirs at load time; survey rows build
/// theirs per row in the fallback path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTarget {
    /// Normalized address text.
    pub address: String,
    /// Normalized name / site-name text.
    pub name: String,
    /// Union of the address and name token sets.
    pub tokens: BTreeSet<String>,
    /// House number extracted from the normalized address, if any.
    pub house_number: Option<String>,
}

impl MatchTarget {
    /// Builds a target from raw address and name text.
    #[must_use]
    pub fn new(raw_address: &str, raw_name: &str) -> Self {
        let address = normalize(raw_address);
        let name = normalize(raw_name);

        let mut tokens = tokenize(&address);
        tokens.extend(tokenize(&name));

        let house_number = house_number(&address);

        Self {
            address,
            name,
            tokens,
            house_number,
        }
    }

    /// Whether this target carries no comparable text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.address.is_empty() && self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_commas_and_abbreviations() {
        assert_eq!(normalize("121 Long St, Cape Town"), "121 long street cape town");
        assert_eq!(normalize("5 Church Rd"), "5 church road");
        assert_eq!(normalize("12 Main Ave"), "12 main avenue");
    }

    #[test]
    fn expands_ampersand() {
        assert_eq!(normalize("Long & Loop Streets"), "long and loop streets");
    }

    #[test]
    fn abbreviations_expand_whole_words_only() {
        // "rd" inside a word must not expand.
        assert_eq!(normalize("Bird Street"), "bird street");
        assert_eq!(normalize("Stone Road"), "stone road");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  10   Loop   St  "), "10 loop street");
    }

    #[test]
    fn tokenizes_on_non_alphanumeric_runs() {
        let tokens = tokenize("121 long street (cnr. loop)");
        let expected: BTreeSet<String> = ["121", "long", "street", "cnr", "loop"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn extracts_first_house_number() {
        assert_eq!(house_number("121 long street"), Some("121".to_owned()));
        assert_eq!(
            house_number("erf 99 at 14 loop street"),
            Some("99".to_owned())
        );
    }

    #[test]
    fn ignores_numbers_longer_than_five_digits() {
        assert_eq!(house_number("123456 long street"), None);
    }

    #[test]
    fn target_unions_address_and_name_tokens() {
        let target = MatchTarget::new("121 Long St", "Old Mutual Building");
        assert!(target.tokens.contains("street"));
        assert!(target.tokens.contains("mutual"));
        assert_eq!(target.house_number, Some("121".to_owned()));
    }

    #[test]
    fn empty_target_is_detected() {
        assert!(MatchTarget::new("", "").is_empty());
        assert!(!MatchTarget::new("", "City Hall").is_empty());
    }
}
