//! # Scaling Engine
//!
//! Display-time multiplication of parsed ingredient amounts, plus the persisted
//! per-recipe multiplier preference.

use crate::amount::format_amount;
use crate::ingredient_model::ParsedIngredient;
use crate::storage::{scale_key, KeyValueStore};
use log::{debug, info, warn};
use serde_json::Value;

/// Multiplier that leaves a recipe untouched
pub const DEFAULT_MULTIPLIER: f64 = 1.0;

/// Scale an amount by `multiplier`
pub fn scale(amount: f64, multiplier: f64) -> f64 {
    amount * multiplier
}

/// Copy of `parsed` with its amount multiplied; amount-less ingredients are unchanged
pub fn scale_ingredient(parsed: &ParsedIngredient, multiplier: f64) -> ParsedIngredient {
    let mut scaled = parsed.clone();
    scaled.amount = parsed.amount.map(|amount| scale(amount, multiplier));
    scaled
}

/// Render an ingredient line at `multiplier`.
///
/// A multiplier of 1, or an ingredient without an amount, yields the original
/// text unchanged. Otherwise the line is reassembled as
/// `"{amount} {unit} {item}, {notes}"` with empty segments omitted.
///
/// # Examples
///
/// ```rust
/// use recipe_features::ingredient_parser::parse_ingredient;
/// use recipe_features::scaling::render_scaled;
///
/// let flour = parse_ingredient("1 1/2 cups flour, sifted");
/// assert_eq!(render_scaled(&flour, 2.0), "3 cup flour, sifted");
/// assert_eq!(render_scaled(&flour, 1.0), "1 1/2 cups flour, sifted");
/// ```
pub fn render_scaled(parsed: &ParsedIngredient, multiplier: f64) -> String {
    if multiplier == DEFAULT_MULTIPLIER || parsed.amount.is_none() {
        return parsed.original.clone();
    }
    scale_ingredient(parsed, multiplier).to_string()
}

/// Label shown next to a scaled recipe; `None` at the default multiplier
pub fn scale_indicator(multiplier: f64) -> Option<String> {
    if multiplier == DEFAULT_MULTIPLIER {
        None
    } else {
        Some(format!("Scaled to {}×", multiplier))
    }
}

/// Render the amount alone at `multiplier`
pub fn render_scaled_amount(amount: f64, multiplier: f64) -> String {
    format_amount(scale(amount, multiplier))
}

/// Persisted multiplier per recipe
pub struct ScalePreferences<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> ScalePreferences<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Stored multiplier for `recipe_id`, or 1 when absent or unusable
    pub fn load(&self, recipe_id: &str) -> f64 {
        let value = match self.store.get(&scale_key(recipe_id)) {
            Ok(value) => value,
            Err(e) => {
                warn!("Error reading scale for recipe {}: {}", recipe_id, e);
                return DEFAULT_MULTIPLIER;
            }
        };

        let multiplier = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match multiplier {
            Some(m) if m.is_finite() && m > 0.0 => {
                debug!("Loaded scale {} for recipe {}", m, recipe_id);
                m
            }
            _ => DEFAULT_MULTIPLIER,
        }
    }

    /// Persist `multiplier` for `recipe_id`; returns whether the write succeeded
    pub fn save(&self, recipe_id: &str, multiplier: f64) -> bool {
        let Some(number) = serde_json::Number::from_f64(multiplier) else {
            warn!("Refusing to store non-finite scale {} for recipe {}", multiplier, recipe_id);
            return false;
        };

        match self.store.set(&scale_key(recipe_id), Value::Number(number)) {
            Ok(()) => {
                info!("Stored scale {} for recipe {}", multiplier, recipe_id);
                true
            }
            Err(e) => {
                warn!("Error saving scale for recipe {}: {}", recipe_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient_parser::parse_ingredient;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_scale() {
        assert_eq!(scale(1.5, 2.0), 3.0);
        assert_eq!(scale(2.0, 0.5), 1.0);
        assert_eq!(scale(0.75, 1.0), 0.75);
    }

    #[test]
    fn test_render_scaled_identity_keeps_original_text() {
        for line in ["1 1/2 cups flour, sifted", "2  Tbsp. butter", "salt to taste", ""] {
            let parsed = parse_ingredient(line);
            assert_eq!(render_scaled(&parsed, 1.0), line);
        }
    }

    #[test]
    fn test_render_scaled_reassembles_line() {
        let parsed = parse_ingredient("2 tbsp olive oil (extra virgin)");
        assert_eq!(render_scaled(&parsed, 0.5), "1 tablespoon olive oil, extra virgin");

        let parsed = parse_ingredient("3 eggs");
        assert_eq!(render_scaled(&parsed, 2.0), "6 eggs");

        let parsed = parse_ingredient("⅔ cup milk");
        assert_eq!(render_scaled(&parsed, 2.0), "1 ⅓ cup milk");
    }

    #[test]
    fn test_render_scaled_without_amount_is_noop() {
        let parsed = parse_ingredient("a pinch of salt");
        assert_eq!(render_scaled(&parsed, 3.0), "a pinch of salt");
    }

    #[test]
    fn test_scale_ingredient_keeps_other_fields() {
        let parsed = parse_ingredient("1 cup rice, rinsed");
        let scaled = scale_ingredient(&parsed, 3.0);
        assert_eq!(scaled.amount, Some(3.0));
        assert_eq!(scaled.unit, parsed.unit);
        assert_eq!(scaled.item, parsed.item);
        assert_eq!(scaled.notes, parsed.notes);
        assert_eq!(scaled.original, parsed.original);
    }

    #[test]
    fn test_scale_indicator() {
        assert_eq!(scale_indicator(1.0), None);
        assert_eq!(scale_indicator(2.0).as_deref(), Some("Scaled to 2×"));
        assert_eq!(scale_indicator(0.5).as_deref(), Some("Scaled to 0.5×"));
    }

    #[test]
    fn test_render_scaled_amount() {
        assert_eq!(render_scaled_amount(0.25, 3.0), "¾");
    }

    #[test]
    fn test_preferences_default_and_roundtrip() {
        let store = MemoryStore::new();
        let prefs = ScalePreferences::new(&store);

        assert_eq!(prefs.load("12"), 1.0);
        assert!(prefs.save("12", 2.0));
        assert_eq!(prefs.load("12"), 2.0);
        assert_eq!(prefs.load("13"), 1.0);
    }

    #[test]
    fn test_preferences_reject_unusable_values() {
        let store = MemoryStore::new();
        let prefs = ScalePreferences::new(&store);

        store.set(&scale_key("a"), json!(0)).unwrap();
        store.set(&scale_key("b"), json!(-2)).unwrap();
        store.set(&scale_key("c"), json!("abc")).unwrap();
        store.set(&scale_key("d"), json!("3")).unwrap();

        assert_eq!(prefs.load("a"), 1.0);
        assert_eq!(prefs.load("b"), 1.0);
        assert_eq!(prefs.load("c"), 1.0);
        assert_eq!(prefs.load("d"), 3.0);
        assert!(!prefs.save("e", f64::NAN));
    }
}
