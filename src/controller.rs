//! # Recipe Page Controller
//!
//! Wires the parser, the scaling engine and the two persisted lists together for
//! one recipe page. The controller is built once per page from the page context
//! and the rendered content blocks.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_features::config::{PageContext, RecipeContext};
//! use recipe_features::content_scanner::ContentBlock;
//! use recipe_features::controller::{Notice, RecipePage};
//! use recipe_features::storage::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let context = PageContext::for_recipe(RecipeContext::new("3", "Crepes", "crepes"));
//! let blocks = vec![
//!     ContentBlock::Heading("Ingredients".to_string()),
//!     ContentBlock::List(vec!["1 cup flour".to_string(), "2 eggs".to_string()]),
//! ];
//!
//! let mut page = RecipePage::new(context, &store, &blocks);
//! assert_eq!(page.set_scale(2.0), vec!["2 cup flour", "4 eggs"]);
//! assert_eq!(page.add_to_shopping_list(), Notice::IngredientsAdded(2));
//! ```

use crate::config::PageContext;
use crate::content_scanner::{extract_ingredient_lines, ContentBlock};
use crate::ingredient_model::ParsedIngredient;
use crate::ingredient_parser::parse_ingredient;
use crate::saved_recipes::SavedRecipes;
use crate::scaling::{render_scaled, scale_indicator, scale_ingredient, ScalePreferences, DEFAULT_MULTIPLIER};
use crate::shopping_list::ShoppingList;
use crate::storage::KeyValueStore;
use log::{debug, info, warn};
use std::fmt;

/// Advisory shown to the user after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved,
    Unsaved,
    IngredientsAdded(usize),
    NoIngredients,
    NotARecipe,
    StorageUnavailable,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Saved => write!(f, "Recipe saved!"),
            Notice::Unsaved => write!(f, "Recipe removed from saved"),
            Notice::IngredientsAdded(count) => {
                write!(f, "{} ingredients added to shopping list", count)
            }
            Notice::NoIngredients => write!(f, "No ingredients found"),
            Notice::NotARecipe => write!(f, "This page is not a recipe"),
            Notice::StorageUnavailable => write!(f, "Could not save your changes"),
        }
    }
}

/// Controller for one recipe page
pub struct RecipePage<'a, S: KeyValueStore + ?Sized> {
    context: PageContext,
    store: &'a S,
    ingredients: Vec<ParsedIngredient>,
    multiplier: f64,
}

impl<'a, S: KeyValueStore + ?Sized> RecipePage<'a, S> {
    /// Build the controller from rendered content
    pub fn new(context: PageContext, store: &'a S, blocks: &[ContentBlock]) -> Self {
        let lines = extract_ingredient_lines(blocks);
        Self::from_lines(context, store, &lines)
    }

    /// Build the controller from already extracted ingredient lines
    pub fn from_lines(context: PageContext, store: &'a S, lines: &[String]) -> Self {
        let ingredients: Vec<ParsedIngredient> = lines.iter().map(|line| parse_ingredient(line)).collect();
        let multiplier = match &context.recipe {
            Some(recipe) => ScalePreferences::new(store).load(&recipe.id),
            None => DEFAULT_MULTIPLIER,
        };
        debug!(
            "Recipe page with {} ingredients at scale {}",
            ingredients.len(),
            multiplier
        );

        Self {
            context,
            store,
            ingredients,
            multiplier,
        }
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn ingredients(&self) -> &[ParsedIngredient] {
        &self.ingredients
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Ingredient lines rendered at the current multiplier
    pub fn display_lines(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|ingredient| render_scaled(ingredient, self.multiplier))
            .collect()
    }

    /// Label for the current multiplier, if the recipe is scaled
    pub fn scale_indicator(&self) -> Option<String> {
        scale_indicator(self.multiplier)
    }

    /// Change the multiplier, persist it, and return the re-rendered lines.
    ///
    /// Non-positive or non-finite multipliers are ignored.
    pub fn set_scale(&mut self, multiplier: f64) -> Vec<String> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            warn!("Ignoring invalid scale {}", multiplier);
            return self.display_lines();
        }

        self.multiplier = multiplier;
        if let Some(recipe) = &self.context.recipe {
            ScalePreferences::new(self.store).save(&recipe.id, multiplier);
        }
        self.display_lines()
    }

    /// Back to the original amounts
    pub fn reset_scale(&mut self) -> Vec<String> {
        self.set_scale(DEFAULT_MULTIPLIER)
    }

    pub fn is_saved(&self) -> bool {
        match &self.context.recipe {
            Some(recipe) => SavedRecipes::new(self.store).is_saved(&recipe.id),
            None => false,
        }
    }

    /// Save or unsave this recipe
    pub fn toggle_save(&self) -> Notice {
        let Some(recipe) = &self.context.recipe else {
            return Notice::NotARecipe;
        };

        match SavedRecipes::new(self.store).try_toggle(recipe) {
            Ok(true) => Notice::Saved,
            Ok(false) => Notice::Unsaved,
            Err(e) => {
                warn!("Could not toggle recipe {}: {}", recipe.id, e);
                Notice::StorageUnavailable
            }
        }
    }

    /// Add every ingredient, at the current multiplier, to the shopping list
    pub fn add_to_shopping_list(&self) -> Notice {
        let Some(recipe) = &self.context.recipe else {
            return Notice::NotARecipe;
        };
        if self.ingredients.is_empty() {
            return Notice::NoIngredients;
        }

        let scaled: Vec<ParsedIngredient> = self
            .ingredients
            .iter()
            .map(|ingredient| scale_ingredient(ingredient, self.multiplier))
            .collect();

        match ShoppingList::new(self.store).try_add_items(&scaled, &recipe.id, &recipe.title) {
            Ok(_) => {
                info!(
                    "Added {} ingredients from recipe {} to the shopping list",
                    scaled.len(),
                    recipe.id
                );
                Notice::IngredientsAdded(scaled.len())
            }
            Err(e) => {
                warn!("Could not add recipe {} to the shopping list: {}", recipe.id, e);
                Notice::StorageUnavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecipeContext;
    use crate::errors::StorageError;
    use crate::storage::MemoryStore;
    use serde_json::Value;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Value>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: Value) -> Result<(), StorageError> {
            Err(StorageError::Write("disk full".to_string()))
        }
    }

    fn lines(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    fn soup_page() -> PageContext {
        PageContext::for_recipe(RecipeContext::new("11", "Soup", "soup"))
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(Notice::Saved.to_string(), "Recipe saved!");
        assert_eq!(Notice::Unsaved.to_string(), "Recipe removed from saved");
        assert_eq!(
            Notice::IngredientsAdded(4).to_string(),
            "4 ingredients added to shopping list"
        );
        assert_eq!(Notice::NoIngredients.to_string(), "No ingredients found");
    }

    #[test]
    fn test_scale_is_persisted_per_recipe() {
        let store = MemoryStore::new();
        let ingredient_lines = lines(&["1 cup stock", "salt"]);

        let mut page = RecipePage::from_lines(soup_page(), &store, &ingredient_lines);
        assert_eq!(page.display_lines(), vec!["1 cup stock", "salt"]);
        assert_eq!(page.set_scale(3.0), vec!["3 cup stock", "salt"]);
        assert_eq!(page.scale_indicator().as_deref(), Some("Scaled to 3×"));

        let reopened = RecipePage::from_lines(soup_page(), &store, &ingredient_lines);
        assert_eq!(reopened.multiplier(), 3.0);
    }

    #[test]
    fn test_invalid_scale_is_ignored() {
        let store = MemoryStore::new();
        let mut page = RecipePage::from_lines(soup_page(), &store, &lines(&["2 eggs"]));
        assert_eq!(page.set_scale(0.0), vec!["2 eggs"]);
        assert_eq!(page.multiplier(), 1.0);
    }

    #[test]
    fn test_reset_scale_restores_original_text() {
        let store = MemoryStore::new();
        let mut page = RecipePage::from_lines(soup_page(), &store, &lines(&["1 1/2 cups rice"]));
        page.set_scale(2.0);
        assert_eq!(page.reset_scale(), vec!["1 1/2 cups rice"]);
        assert_eq!(page.scale_indicator(), None);
    }

    #[test]
    fn test_add_uses_current_scale() {
        let store = MemoryStore::new();
        let mut page = RecipePage::from_lines(soup_page(), &store, &lines(&["1 cup stock", "2 carrots"]));
        page.set_scale(0.5);

        assert_eq!(page.add_to_shopping_list(), Notice::IngredientsAdded(2));
        let items = ShoppingList::new(&store).items();
        assert_eq!(items[0].amount, Some(0.5));
        assert_eq!(items[1].amount, Some(1.0));
        assert_eq!(items[0].recipe_title.as_deref(), Some("Soup"));
    }

    #[test]
    fn test_add_without_ingredients() {
        let store = MemoryStore::new();
        let page = RecipePage::from_lines(soup_page(), &store, &[]);
        assert_eq!(page.add_to_shopping_list(), Notice::NoIngredients);
        assert!(ShoppingList::new(&store).is_empty());
    }

    #[test]
    fn test_non_recipe_page() {
        let store = MemoryStore::new();
        let page = RecipePage::from_lines(PageContext::default(), &store, &lines(&["1 egg"]));
        assert_eq!(page.toggle_save(), Notice::NotARecipe);
        assert_eq!(page.add_to_shopping_list(), Notice::NotARecipe);
        assert!(!page.is_saved());
    }

    #[test]
    fn test_failed_write_is_not_reported_as_success() {
        let store = FailingStore;
        let page = RecipePage::from_lines(soup_page(), &store, &lines(&["1 cup stock"]));

        assert_eq!(page.add_to_shopping_list(), Notice::StorageUnavailable);
        assert_eq!(page.toggle_save(), Notice::StorageUnavailable);
        assert_eq!(Notice::StorageUnavailable.to_string(), "Could not save your changes");
    }

    #[test]
    fn test_toggle_save() {
        let store = MemoryStore::new();
        let page = RecipePage::from_lines(soup_page(), &store, &[]);
        assert_eq!(page.toggle_save(), Notice::Saved);
        assert!(page.is_saved());
        assert_eq!(page.toggle_save(), Notice::Unsaved);
        assert!(!page.is_saved());
    }
}
