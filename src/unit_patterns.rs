//! # Unit Patterns Module
//!
//! This module contains the unit vocabulary used when parsing ingredient lines and
//! the synonym table that folds abbreviations and plurals into one canonical
//! singular unit.

use log::trace;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Unit tokens recognized directly after an amount
pub const UNIT_VOCABULARY: &[&str] = &[
    "tablespoons", "tablespoon", "tbsp",
    "teaspoons", "teaspoon", "tsp",
    "cups", "cup",
    "ounces", "ounce", "oz",
    "pounds", "pound", "lbs", "lb",
    "grams", "gram", "g",
    "kilograms", "kilogram", "kg",
    "milliliters", "milliliter", "ml",
    "liters", "liter", "l",
    "pinches", "pinch",
    "dashes", "dash",
    "cloves", "clove",
    "slices", "slice",
    "pieces", "piece",
    "cans", "can",
    "packages", "package", "pkg",
    "bunches", "bunch",
    "heads", "head",
    "stalks", "stalk",
    "sprigs", "sprig",
    "leaves", "leaf",
    "small", "medium", "large",
];

/// Vocabulary sorted so that longer tokens are tried first ("tablespoons" before "tbsp")
static UNITS_LONGEST_FIRST: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut units = UNIT_VOCABULARY.to_vec();
    units.sort_by(|a, b| b.len().cmp(&a.len()));
    units
});

/// Abbreviations and plurals mapped to their canonical singular form
static UNIT_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Volume units
    map.insert("tbsp", "tablespoon");
    map.insert("tablespoons", "tablespoon");
    map.insert("tsp", "teaspoon");
    map.insert("teaspoons", "teaspoon");
    map.insert("cups", "cup");
    map.insert("ml", "milliliter");
    map.insert("milliliters", "milliliter");
    map.insert("l", "liter");
    map.insert("liters", "liter");

    // Weight units
    map.insert("oz", "ounce");
    map.insert("ounces", "ounce");
    map.insert("lb", "pound");
    map.insert("lbs", "pound");
    map.insert("pounds", "pound");
    map.insert("g", "gram");
    map.insert("grams", "gram");
    map.insert("kg", "kilogram");
    map.insert("kilograms", "kilogram");

    // Count units
    map.insert("cloves", "clove");
    map.insert("slices", "slice");
    map.insert("pieces", "piece");
    map.insert("cans", "can");
    map.insert("packages", "package");
    map.insert("pkg", "package");
    map.insert("bunches", "bunch");
    map.insert("heads", "head");
    map.insert("stalks", "stalk");
    map.insert("sprigs", "sprig");
    map.insert("leaves", "leaf");

    // Small amounts
    map.insert("pinches", "pinch");
    map.insert("dashes", "dash");

    map
});

/// A unit token recognized at the start of a string
#[derive(Debug, Clone, PartialEq)]
pub struct UnitMatch {
    /// Canonical singular unit (e.g. "tablespoon" for "Tbsp")
    pub unit: String,
    /// Vocabulary token that matched
    pub token: &'static str,
    /// Number of bytes consumed, including an optional trailing period
    pub consumed: usize,
}

/// Match a unit token at the start of `text`.
///
/// The token is compared case-insensitively and must be followed by whitespace or
/// the end of the text, optionally with a single `.` in between (`tbsp. oil`).
///
/// # Examples
///
/// ```rust
/// use recipe_features::unit_patterns::match_unit;
///
/// let m = match_unit("Tablespoons olive oil").unwrap();
/// assert_eq!(m.unit, "tablespoon");
/// assert_eq!(m.consumed, "Tablespoons".len());
///
/// assert!(match_unit("leeks, sliced").is_none());
/// ```
pub fn match_unit(text: &str) -> Option<UnitMatch> {
    for &token in UNITS_LONGEST_FIRST.iter() {
        let Some(prefix) = text.get(..token.len()) else {
            continue;
        };
        if !prefix.eq_ignore_ascii_case(token) {
            continue;
        }

        let mut consumed = token.len();
        if text[consumed..].starts_with('.') {
            consumed += 1;
        }

        let rest = &text[consumed..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            trace!("Matched unit token '{}' in '{}'", token, text);
            return Some(UnitMatch {
                unit: normalize_unit(token),
                token,
                consumed,
            });
        }
    }
    None
}

/// Fold a unit into its canonical singular form.
///
/// Unrecognized units pass through lowercased and trimmed; an empty unit stays
/// empty. The mapping is idempotent.
///
/// # Examples
///
/// ```rust
/// use recipe_features::unit_patterns::normalize_unit;
///
/// assert_eq!(normalize_unit("Tbsp"), "tablespoon");
/// assert_eq!(normalize_unit("lbs"), "pound");
/// assert_eq!(normalize_unit("large"), "large");
/// assert_eq!(normalize_unit(""), "");
/// ```
pub fn normalize_unit(unit: &str) -> String {
    let unit = unit.trim().to_lowercase();
    match UNIT_SYNONYMS.get(unit.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_token_wins() {
        let m = match_unit("tablespoons sugar").unwrap();
        assert_eq!(m.token, "tablespoons");
        assert_eq!(m.unit, "tablespoon");

        let m = match_unit("large eggs").unwrap();
        assert_eq!(m.token, "large");

        let m = match_unit("lbs ground beef").unwrap();
        assert_eq!(m.token, "lbs");
        assert_eq!(m.unit, "pound");
    }

    #[test]
    fn test_unit_requires_word_boundary() {
        assert!(match_unit("leeks").is_none());
        assert!(match_unit("garlic").is_none());
        assert!(match_unit("cupboard").is_none());
        assert!(match_unit("canola oil").is_none());
    }

    #[test]
    fn test_unit_at_end_of_text() {
        let m = match_unit("cups").unwrap();
        assert_eq!(m.unit, "cup");
        assert_eq!(m.consumed, 4);
    }

    #[test]
    fn test_unit_with_trailing_period() {
        let m = match_unit("tsp. salt").unwrap();
        assert_eq!(m.unit, "teaspoon");
        assert_eq!(m.consumed, 4);

        let m = match_unit("oz.").unwrap();
        assert_eq!(m.unit, "ounce");
    }

    #[test]
    fn test_unit_case_insensitive() {
        assert_eq!(match_unit("CUPS flour").unwrap().unit, "cup");
        assert_eq!(match_unit("Tbsp butter").unwrap().unit, "tablespoon");
        assert_eq!(match_unit("L water").unwrap().unit, "liter");
    }

    #[test]
    fn test_non_ascii_text_does_not_panic() {
        assert!(match_unit("½ cup").is_none());
        assert!(match_unit("œufs").is_none());
        assert!(match_unit("").is_none());
    }

    #[test]
    fn test_normalize_unit_synonyms() {
        assert_eq!(normalize_unit("tsp"), "teaspoon");
        assert_eq!(normalize_unit("ounces"), "ounce");
        assert_eq!(normalize_unit("g"), "gram");
        assert_eq!(normalize_unit("ML"), "milliliter");
        assert_eq!(normalize_unit("pkg"), "package");
        assert_eq!(normalize_unit("leaves"), "leaf");
        assert_eq!(normalize_unit("dashes"), "dash");
        assert_eq!(normalize_unit("cup"), "cup");
        assert_eq!(normalize_unit("handful"), "handful");
    }

    #[test]
    fn test_normalize_unit_is_idempotent() {
        for &token in UNIT_VOCABULARY {
            let once = normalize_unit(token);
            assert_eq!(normalize_unit(&once), once, "not idempotent for {token}");
        }
    }

    #[test]
    fn test_every_vocabulary_token_matches_itself() {
        for &token in UNIT_VOCABULARY {
            let text = format!("{token} x");
            let m = match_unit(&text).unwrap();
            assert_eq!(m.token, token);
        }
    }
}
