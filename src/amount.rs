//! # Amount Representation
//!
//! Converts the numeric prefix of an ingredient line into a decimal value and
//! renders decimal values back as the nearest common cooking fraction.
//!
//! ## Supported notations
//!
//! In priority order, at the start of the text:
//!
//! 1. Whole number followed by a unicode vulgar fraction: `1½`, `2 ¾`
//! 2. A unicode vulgar fraction on its own: `⅓`
//! 3. A mixed ASCII fraction: `1 1/2`
//! 4. A simple ASCII fraction: `3/4`
//! 5. A decimal or integer literal: `2`, `0.5`
//!
//! Unicode fractions map to fixed three-decimal approximations (`⅓` is `0.333`),
//! so values are not exact rationals. Formatting snaps back to the same grid, which
//! keeps `parse -> format` stable for every notation above.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_features::amount::{format_amount, parse_amount};
//!
//! let parsed = parse_amount("1 1/2 cups flour").unwrap();
//! assert_eq!(parsed.value, 1.5);
//! assert_eq!(parsed.consumed, "1 1/2".len());
//! assert_eq!(format_amount(parsed.value), "1 ½");
//! ```

use log::trace;
use regex::Regex;
use std::sync::LazyLock;

/// Unicode vulgar fractions and their fixed decimal values
pub const UNICODE_FRACTIONS: [(char, f64); 15] = [
    ('½', 0.5),
    ('⅓', 0.333),
    ('⅔', 0.667),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 0.167),
    ('⅚', 0.833),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

/// Display grid for `format_amount`, scanned in ascending order.
///
/// `0` and `1` carry no glyph: they resolve to "no fraction" and "carry into the
/// integer part" respectively.
const DISPLAY_FRACTIONS: [(f64, Option<char>); 11] = [
    (0.0, None),
    (0.125, Some('⅛')),
    (0.25, Some('¼')),
    (0.333, Some('⅓')),
    (0.375, Some('⅜')),
    (0.5, Some('½')),
    (0.625, Some('⅝')),
    (0.667, Some('⅔')),
    (0.75, Some('¾')),
    (0.875, Some('⅞')),
    (1.0, None),
];

static MIXED_UNICODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s*([½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])").expect("mixed unicode pattern should be valid")
});
static UNICODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞]").expect("unicode fraction pattern should be valid")
});
static MIXED_FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s+([0-9]+)/([0-9]+)").expect("mixed fraction pattern should be valid")
});
static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)/([0-9]+)").expect("fraction pattern should be valid"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.?[0-9]*").expect("number pattern should be valid"));

/// A successfully recognized amount prefix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountMatch {
    /// Decimal value of the amount
    pub value: f64,
    /// Number of bytes of the input consumed by the amount
    pub consumed: usize,
}

/// Look up the decimal value of a unicode vulgar fraction
pub fn unicode_fraction_value(glyph: char) -> Option<f64> {
    UNICODE_FRACTIONS
        .iter()
        .find(|(c, _)| *c == glyph)
        .map(|(_, value)| *value)
}

/// Recognize an amount at the very start of `text`.
///
/// Returns `None` when the text does not begin with a supported notation, and also
/// when a fraction literal has a zero denominator (`1/0`, `2 1/0`).
pub fn parse_amount(text: &str) -> Option<AmountMatch> {
    if let Some(caps) = MIXED_UNICODE.captures(text) {
        let whole: f64 = caps[1].parse().ok()?;
        let glyph = caps[2].chars().next()?;
        let fraction = unicode_fraction_value(glyph)?;
        trace!("Matched whole + unicode fraction '{}'", &caps[0]);
        return Some(AmountMatch {
            value: whole + fraction,
            consumed: caps[0].len(),
        });
    }

    if let Some(m) = UNICODE.find(text) {
        let glyph = m.as_str().chars().next()?;
        trace!("Matched unicode fraction '{}'", m.as_str());
        return Some(AmountMatch {
            value: unicode_fraction_value(glyph)?,
            consumed: m.end(),
        });
    }

    if let Some(caps) = MIXED_FRACTION.captures(text) {
        let whole: f64 = caps[1].parse().ok()?;
        let fraction = divide(&caps[2], &caps[3])?;
        trace!("Matched mixed fraction '{}'", &caps[0]);
        return Some(AmountMatch {
            value: whole + fraction,
            consumed: caps[0].len(),
        });
    }

    if let Some(caps) = FRACTION.captures(text) {
        trace!("Matched simple fraction '{}'", &caps[0]);
        return Some(AmountMatch {
            value: divide(&caps[1], &caps[2])?,
            consumed: caps[0].len(),
        });
    }

    if let Some(m) = NUMBER.find(text) {
        let value: f64 = m.as_str().trim_end_matches('.').parse().ok()?;
        trace!("Matched number '{}'", m.as_str());
        return Some(AmountMatch {
            value,
            consumed: m.end(),
        });
    }

    None
}

fn divide(numerator: &str, denominator: &str) -> Option<f64> {
    let numerator: f64 = numerator.parse().ok()?;
    let denominator: f64 = denominator.parse().ok()?;
    if denominator == 0.0 {
        trace!("Rejected fraction with zero denominator");
        return None;
    }
    Some(numerator / denominator)
}

/// Render a nonnegative decimal as a whole number plus the nearest display fraction.
///
/// # Examples
///
/// ```rust
/// use recipe_features::amount::format_amount;
///
/// assert_eq!(format_amount(0.0), "0");
/// assert_eq!(format_amount(2.0), "2");
/// assert_eq!(format_amount(0.5), "½");
/// assert_eq!(format_amount(1.334), "1 ⅓");
/// assert_eq!(format_amount(2.97), "3");
/// assert_eq!(format_amount(0.01), "0.01");
/// ```
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() || value < 0.0 {
        return format!("{value:.2}");
    }

    let mut whole = value.floor();
    let remainder = value - whole;

    let mut closest = DISPLAY_FRACTIONS[0];
    let mut min_diff = f64::MAX;
    for candidate in DISPLAY_FRACTIONS {
        let diff = (remainder - candidate.0).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = candidate;
        }
    }

    let mut glyph = closest.1;
    if closest.0 >= 1.0 {
        whole += 1.0;
        glyph = None;
    }

    let mut result = String::new();
    if whole > 0.0 {
        result.push_str(&format!("{whole:.0}"));
    }
    if let Some(glyph) = glyph {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push(glyph);
    }

    if result.is_empty() {
        return format!("{value:.2}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(text: &str) -> Option<f64> {
        parse_amount(text).map(|m| m.value)
    }

    #[test]
    fn test_parse_integer_and_decimal() {
        assert_eq!(value_of("2 cups"), Some(2.0));
        assert_eq!(value_of("0.5 kg"), Some(0.5));
        assert_eq!(value_of("12"), Some(12.0));
        assert_eq!(parse_amount("250g butter").unwrap().consumed, 3);
    }

    #[test]
    fn test_parse_trailing_period_number() {
        let m = parse_amount("3. eggs").unwrap();
        assert_eq!(m.value, 3.0);
        assert_eq!(m.consumed, 2);
    }

    #[test]
    fn test_parse_ascii_fractions() {
        assert_eq!(value_of("1/2 cup sugar"), Some(0.5));
        assert_eq!(value_of("3/4"), Some(0.75));

        let mixed = parse_amount("2 1/4 cups butter").unwrap();
        assert_eq!(mixed.value, 2.25);
        assert_eq!(mixed.consumed, "2 1/4".len());
    }

    #[test]
    fn test_parse_unicode_fractions() {
        let half = parse_amount("½ cup milk").unwrap();
        assert_eq!(half.value, 0.5);
        assert_eq!(half.consumed, '½'.len_utf8());

        assert_eq!(value_of("⅓ cup"), Some(0.333));
        assert_eq!(value_of("⅞"), Some(0.875));
    }

    #[test]
    fn test_parse_whole_plus_unicode() {
        let m = parse_amount("1½ cups").unwrap();
        assert_eq!(m.value, 1.5);
        assert_eq!(m.consumed, "1½".len());

        let spaced = parse_amount("2 ¾ cups").unwrap();
        assert_eq!(spaced.value, 2.75);
        assert_eq!(spaced.consumed, "2 ¾".len());
    }

    #[test]
    fn test_parse_miss() {
        assert_eq!(parse_amount("cups of flour"), None);
        assert_eq!(parse_amount("a pinch of salt"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount(" 2 cups"), None); // caller trims first
    }

    #[test]
    fn test_zero_denominator_is_a_miss() {
        assert_eq!(parse_amount("1/0"), None);
        assert_eq!(parse_amount("2 1/0 cups"), None);
        assert_eq!(value_of("0/4"), Some(0.0));
    }

    #[test]
    fn test_unicode_fraction_lookup() {
        assert_eq!(unicode_fraction_value('¼'), Some(0.25));
        assert_eq!(unicode_fraction_value('x'), None);
    }

    #[test]
    fn test_format_whole_numbers() {
        assert_eq!(format_amount(1.0), "1");
        assert_eq!(format_amount(4.0), "4");
        assert_eq!(format_amount(10.02), "10");
    }

    #[test]
    fn test_format_fractions() {
        assert_eq!(format_amount(0.25), "¼");
        assert_eq!(format_amount(0.667), "⅔");
        assert_eq!(format_amount(1.5), "1 ½");
        assert_eq!(format_amount(0.667 * 2.0), "1 ⅓");
        assert_eq!(format_amount(2.125), "2 ⅛");
    }

    #[test]
    fn test_format_rounds_up_into_whole() {
        assert_eq!(format_amount(0.95), "1");
        assert_eq!(format_amount(1.97), "2");
    }

    #[test]
    fn test_format_small_and_invalid_values() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(0.04), "0.04");
        assert_eq!(format_amount(-1.5), "-1.50");
    }

    #[test]
    fn test_format_ties_go_to_smaller_fraction() {
        // exact midpoint of ⅜ and ½
        assert_eq!(format_amount(0.4375), "⅜");
    }

    #[test]
    fn test_parse_then_format_is_stable() {
        for text in ["1 1/2", "½", "2¼", "3/4", "1 ⅔", "2", "1/3"] {
            let value = parse_amount(text).unwrap().value;
            let formatted = format_amount(value);
            let reparsed = parse_amount(&formatted).unwrap().value;
            assert_eq!(format_amount(reparsed), formatted, "unstable for {text}");
        }
        assert_eq!(format_amount(parse_amount("1 1/2").unwrap().value), "1 ½");
    }
}
