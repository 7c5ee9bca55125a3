//! # Ingredient and Shopping List Data Model
//!
//! This module defines the data structures shared by the parser, the scaling engine
//! and the shopping list aggregator, plus the persisted saved-recipe records.
//!
//! ## Core Concepts
//!
//! - **ParsedIngredient**: one ingredient line split into amount, unit, item and notes
//! - **ShoppingListItem**: a persisted, possibly merged, shopping list entry
//! - **Provenance**: the ordered set of recipes that contributed to an entry
//! - **SavedRecipe**: a recipe bookmarked for later
//!
//! ## Usage
//!
//! ```rust
//! use recipe_features::ingredient_model::ParsedIngredient;
//!
//! let flour = ParsedIngredient::new("2 cups flour, sifted")
//!     .with_amount(2.0)
//!     .with_unit("cup")
//!     .with_item("flour")
//!     .with_notes("sifted");
//!
//! assert_eq!(flour.to_string(), "2 cup flour, sifted");
//! ```

use crate::amount::format_amount;
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Bucket name used for shopping list entries without a recipe
pub const OTHER_RECIPE_ID: &str = "other";

/// Display title of the [`OTHER_RECIPE_ID`] bucket
pub const OTHER_RECIPE_TITLE: &str = "Other Items";

/// One ingredient line decomposed into its parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    /// The untouched input line
    pub original: String,

    /// Leading quantity, if one was recognized
    pub amount: Option<f64>,

    /// Canonical singular unit (e.g. "cup", "tablespoon"), if one followed the amount
    pub unit: Option<String>,

    /// Remaining ingredient name; may be empty but never missing
    pub item: String,

    /// Parenthetical and post-comma text, joined with ", "
    pub notes: Option<String>,
}

/// A persisted shopping list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    /// Identifier that stays stable across sessions
    pub id: String,

    /// Ingredient name as it first entered the list
    pub item: String,

    /// Summed amount, if known
    #[serde(default)]
    pub amount: Option<f64>,

    /// Unit as it first entered the list
    #[serde(default)]
    pub unit: Option<String>,

    /// Notes merged from every contribution, without duplicates
    #[serde(default)]
    pub notes: Option<String>,

    /// First contributing recipe
    #[serde(default)]
    pub recipe_id: Option<String>,

    /// Title of the first contributing recipe
    #[serde(default)]
    pub recipe_title: Option<String>,

    /// Every contributing recipe, in arrival order
    #[serde(default)]
    pub recipe_ids: Vec<String>,

    /// Titles matching `recipe_ids` position by position
    #[serde(default)]
    pub recipe_titles: Vec<String>,

    /// Whether the user ticked this entry off
    #[serde(default)]
    pub checked: bool,

    /// When the entry was first created
    pub added_at: DateTime<Utc>,
}

/// A recipe bookmarked for later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    pub saved_at: DateTime<Utc>,
}

/// Fresh recipe data as served by the host site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMetadata {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub excerpt: Option<String>,
}

/// Shopping list entries belonging to one recipe, for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeGroup {
    /// Recipe identifier, or [`OTHER_RECIPE_ID`]
    pub recipe_id: String,
    /// Recipe title, or [`OTHER_RECIPE_TITLE`]
    pub title: String,
    /// Entries in list order
    pub items: Vec<ShoppingListItem>,
}

/// Host sites send post ids as JSON numbers; accept both forms
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("invalid recipe id: {other}"))),
    }
}

/// `false`, `null` and `""` all mean "no value" (a post without a thumbnail)
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) if !s.is_empty() => Ok(Some(s)),
        serde_json::Value::String(_) | serde_json::Value::Null | serde_json::Value::Bool(false) => Ok(None),
        other => Err(de::Error::custom(format!("expected text, got {other}"))),
    }
}

impl ParsedIngredient {
    /// Create an ingredient with no recognized parts: the whole line is the item
    pub fn new(original: &str) -> Self {
        Self {
            original: original.to_string(),
            amount: None,
            unit: None,
            item: original.trim().to_string(),
            notes: None,
        }
    }

    /// Set the amount
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the unit
    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    /// Set the item name
    pub fn with_item(mut self, item: &str) -> Self {
        self.item = item.to_string();
        self
    }

    /// Set the notes
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Check if a numeric amount was recognized
    pub fn has_amount(&self) -> bool {
        self.amount.is_some()
    }

    /// Name to use when this ingredient enters the shopping list
    pub fn list_name(&self) -> &str {
        if self.item.is_empty() {
            self.original.trim()
        } else {
            &self.item
        }
    }
}

impl ShoppingListItem {
    /// Check whether a recipe contributed to this entry
    pub fn has_recipe(&self, recipe_id: &str) -> bool {
        self.recipe_id.as_deref() == Some(recipe_id) || self.recipe_ids.iter().any(|id| id == recipe_id)
    }

    /// Short display text: "{amount} {unit} {item}", skipping missing parts
    pub fn display_text(&self) -> String {
        let parts: Vec<String> = [
            self.amount.map(format_amount),
            self.unit.clone().filter(|u| !u.is_empty()),
            Some(self.item.clone()).filter(|i| !i.is_empty()),
        ]
        .into_iter()
        .flatten()
        .collect();
        parts.join(" ")
    }
}

impl SavedRecipe {
    /// Convert the persisted bookmark into displayable recipe data
    pub fn to_metadata(&self) -> RecipeMetadata {
        RecipeMetadata {
            id: self.id.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            url: Some(format!("/{}/", self.slug)),
            image: self.image.clone(),
            excerpt: None,
        }
    }
}

impl fmt::Display for ParsedIngredient {
    /// Render as "{amount} {unit} {item}, {notes}", omitting missing parts.
    ///
    /// An ingredient without an amount renders as its original text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(amount) = self.amount else {
            return write!(f, "{}", self.original);
        };

        write!(f, "{}", format_amount(amount))?;
        if let Some(unit) = self.unit.as_deref().filter(|u| !u.is_empty()) {
            write!(f, " {}", unit)?;
        }
        if !self.item.is_empty() {
            write!(f, " {}", self.item)?;
        }
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            write!(f, ", {}", notes)?;
        }
        Ok(())
    }
}

impl fmt::Display for ShoppingListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> ShoppingListItem {
        ShoppingListItem {
            id: "item_1".to_string(),
            item: "flour".to_string(),
            amount: Some(1.5),
            unit: Some("cup".to_string()),
            notes: None,
            recipe_id: Some("42".to_string()),
            recipe_title: Some("Bread".to_string()),
            recipe_ids: vec!["42".to_string()],
            recipe_titles: vec!["Bread".to_string()],
            checked: false,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_parsed_ingredient_builder() {
        let ingredient = ParsedIngredient::new("2 tbsp olive oil (extra virgin)")
            .with_amount(2.0)
            .with_unit("tablespoon")
            .with_item("olive oil")
            .with_notes("extra virgin");

        assert!(ingredient.has_amount());
        assert_eq!(ingredient.unit.as_deref(), Some("tablespoon"));
        assert_eq!(ingredient.to_string(), "2 tablespoon olive oil, extra virgin");
    }

    #[test]
    fn test_display_without_amount_is_original() {
        let ingredient = ParsedIngredient::new("salt and pepper").with_item("salt and pepper");
        assert_eq!(ingredient.to_string(), "salt and pepper");
    }

    #[test]
    fn test_display_skips_missing_unit() {
        let ingredient = ParsedIngredient::new("3 eggs").with_amount(3.0).with_item("eggs");
        assert_eq!(ingredient.to_string(), "3 eggs");
    }

    #[test]
    fn test_list_name_falls_back_to_original() {
        let ingredient = ParsedIngredient::new("2 cups").with_amount(2.0).with_unit("cup").with_item("");
        assert_eq!(ingredient.list_name(), "2 cups");
    }

    #[test]
    fn test_shopping_item_display_text() {
        let item = sample_item();
        assert_eq!(item.display_text(), "1 ½ cup flour");

        let bare = ShoppingListItem {
            amount: None,
            unit: None,
            ..sample_item()
        };
        assert_eq!(bare.display_text(), "flour");
    }

    #[test]
    fn test_shopping_item_json_uses_camel_case() {
        let json = serde_json::to_value(sample_item()).unwrap();
        assert_eq!(json["recipeId"], "42");
        assert_eq!(json["recipeTitles"][0], "Bread");
        assert!(json.get("addedAt").is_some());
    }

    #[test]
    fn test_shopping_item_tolerates_missing_optional_fields() {
        let json = serde_json::json!({
            "id": "item_9",
            "item": "milk",
            "addedAt": "2024-05-01T10:00:00Z"
        });
        let item: ShoppingListItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.amount, None);
        assert!(!item.checked);
        assert!(item.recipe_ids.is_empty());
    }

    #[test]
    fn test_metadata_accepts_numeric_id() {
        let meta: RecipeMetadata = serde_json::from_value(serde_json::json!({
            "id": 42,
            "title": "Chili",
            "slug": "chili",
            "url": "https://example.com/chili/"
        }))
        .unwrap();
        assert_eq!(meta.id, "42");
        assert_eq!(meta.image, None);

        let meta: RecipeMetadata = serde_json::from_value(serde_json::json!({
            "id": "7",
            "title": "Toast",
            "slug": "toast",
            "image": false,
            "excerpt": ""
        }))
        .unwrap();
        assert_eq!(meta.image, None);
        assert_eq!(meta.excerpt, None);
    }

    #[test]
    fn test_saved_recipe_to_metadata() {
        let saved = SavedRecipe {
            id: "7".to_string(),
            title: "Pancakes".to_string(),
            slug: "pancakes".to_string(),
            image: None,
            saved_at: Utc::now(),
        };
        let meta = saved.to_metadata();
        assert_eq!(meta.url.as_deref(), Some("/pancakes/"));
        assert_eq!(meta.excerpt, None);
    }
}
