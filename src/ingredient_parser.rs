//! # Ingredient Parser
//!
//! This module parses free-form ingredient lines into structured data.
//! It handles parenthetical and trailing-comma notes, ASCII and unicode fractions,
//! unit tokens from an overlapping vocabulary, and a leading "of".
//!
//! ## Pipeline
//!
//! Each stage consumes part of the working text and hands the rest on:
//!
//! 1. The first `(...)` group anywhere in the line becomes a note
//! 2. Everything after the first comma becomes a further note
//! 3. A leading amount is recognized (see [`crate::amount`])
//! 4. A unit token is matched, longest token first (see [`crate::unit_patterns`])
//! 5. A leading "of " is dropped; what remains is the item
//!
//! No stage fails: a stage that does not match leaves the text untouched, so every
//! line produces a complete [`ParsedIngredient`].
//!
//! ## Usage
//!
//! ```rust
//! use recipe_features::ingredient_parser::parse_ingredient_list;
//!
//! let text = "2 cups flour\n1 tbsp salt\n1/2 tsp pepper";
//! let parsed = parse_ingredient_list(text);
//!
//! assert_eq!(parsed.len(), 3);
//! assert_eq!(parsed[2].amount, Some(0.5));
//! assert_eq!(parsed[2].unit.as_deref(), Some("teaspoon"));
//! ```

use crate::amount::parse_amount;
use crate::ingredient_model::ParsedIngredient;
use crate::unit_patterns::match_unit;
use log::{debug, trace};
use regex::Regex;
use std::sync::LazyLock;

/// First parenthetical group in a line
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("parenthetical pattern should be valid"));

/// Indefinite article that may stand in for an amount ("a pinch of salt")
static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^an?\s+").expect("article pattern should be valid"));

static LEADING_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^of\s+").expect("'of' pattern should be valid"));

/// Parse every non-empty line of `text`
pub fn parse_ingredient_list(text: &str) -> Vec<ParsedIngredient> {
    let parsed: Vec<ParsedIngredient> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_ingredient)
        .collect();

    debug!("Parsed {} ingredient lines", parsed.len());
    parsed
}

/// Parse a single ingredient line
pub fn parse_ingredient(raw: &str) -> ParsedIngredient {
    let mut result = ParsedIngredient::new(raw);
    let mut text = collapse_whitespace(raw);
    let mut notes: Vec<String> = Vec::new();

    let parenthetical = PARENTHETICAL.captures(&text).and_then(|caps| {
        let group = caps.get(0)?.range();
        Some((group, caps[1].trim().to_string()))
    });
    if let Some((group, inner)) = parenthetical {
        trace!("Extracted parenthetical note '{}'", inner);
        if !inner.is_empty() {
            notes.push(inner);
        }
        text = collapse_whitespace(&format!("{}{}", &text[..group.start], &text[group.end..]));
    }

    if let Some((before, after)) = text.split_once(',') {
        let after = after.trim();
        trace!("Extracted trailing note '{}'", after);
        if !after.is_empty() {
            notes.push(after.to_string());
        }
        text = before.trim().to_string();
    }

    let mut rest = text.as_str();

    if let Some(amount) = parse_amount(rest) {
        result.amount = Some(amount.value);
        rest = rest[amount.consumed..].trim_start();
    }

    if let Some(unit) = match_unit(rest) {
        result.unit = Some(unit.unit);
        rest = rest[unit.consumed..].trim_start();
    } else if result.amount.is_none() {
        if let Some(article) = LEADING_ARTICLE.find(rest) {
            let after_article = &rest[article.end()..];
            if let Some(unit) = match_unit(after_article) {
                result.unit = Some(unit.unit);
                rest = after_article[unit.consumed..].trim_start();
            }
        }
    }

    result.item = LEADING_OF.replace(rest, "").trim().to_string();
    if !notes.is_empty() {
        result.notes = Some(notes.join(", "));
    }

    debug!(
        "Parsed '{}' -> amount={:?} unit={:?} item='{}' notes={:?}",
        raw, result.amount, result.unit, result.item, result.notes
    );
    result
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}
