//! # Shopping List Aggregator
//!
//! Owns the persisted shopping list. Ingredients added from several recipes are
//! merged when they share a normalization key: the lowercased item name with one
//! trailing "s" removed, plus the canonical unit. Merged entries sum their amounts
//! and remember every contributing recipe.
//!
//! Every mutation loads the list, changes it in memory and writes it back in one
//! `set` call. When the list cannot be read, or the stored value is not a list,
//! the mutation is skipped and nothing is written; a failed write leaves the
//! previous list in place. Both are logged and never returned to the caller,
//! except through [`ShoppingList::try_add_items`].
//!
//! ## Usage
//!
//! ```rust
//! use recipe_features::ingredient_parser::parse_ingredient;
//! use recipe_features::shopping_list::ShoppingList;
//! use recipe_features::storage::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let list = ShoppingList::new(&store);
//!
//! list.add_items(&[parse_ingredient("2 cups flour")], "1", "Bread");
//! let items = list.add_items(&[parse_ingredient("1 cup Flour")], "2", "Cake");
//!
//! assert_eq!(items.len(), 1);
//! assert_eq!(items[0].amount, Some(3.0));
//! assert_eq!(items[0].recipe_ids, vec!["1", "2"]);
//! ```

use crate::errors::StorageError;
use crate::ingredient_model::{
    ParsedIngredient, RecipeGroup, ShoppingListItem, OTHER_RECIPE_ID, OTHER_RECIPE_TITLE,
};
use crate::storage::{KeyValueStore, SHOPPING_LIST_KEY};
use chrono::Utc;
use log::{debug, info, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;

pub use crate::unit_patterns::normalize_unit;

/// Normalize an item name for duplicate detection.
///
/// Lowercases, collapses whitespace and strips a single trailing "s". Irregular
/// plurals are not folded ("leaves" becomes "leave", not "leaf").
pub fn normalize_item_key(item: &str) -> String {
    let collapsed = item
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");
    match collapsed.strip_suffix('s') {
        Some(singular) => singular.to_string(),
        None => collapsed,
    }
}

/// Full normalization key: `"{item}|{unit}"`
pub fn merge_key(item: &str, unit: Option<&str>) -> String {
    format!(
        "{}|{}",
        normalize_item_key(item),
        normalize_unit(unit.unwrap_or(""))
    )
}

/// Generate an identifier of the form `item_<unix millis>_<9 random chars>`
pub fn generate_item_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("item_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Merge parsed ingredients from one recipe into `list`.
///
/// Duplicates within `ingredients` are merged with each other as well as with
/// existing entries.
pub fn merge_ingredients(
    list: &mut Vec<ShoppingListItem>,
    ingredients: &[ParsedIngredient],
    recipe_id: &str,
    recipe_title: &str,
) {
    let mut index: HashMap<String, usize> = list
        .iter()
        .enumerate()
        .map(|(i, entry)| (merge_key(&entry.item, entry.unit.as_deref()), i))
        .collect();

    for ingredient in ingredients {
        let name = ingredient.list_name();
        let key = merge_key(name, ingredient.unit.as_deref());

        match index.get(&key) {
            Some(&position) => {
                debug!("Merging '{}' into existing entry '{}'", name, key);
                merge_entry(&mut list[position], ingredient, recipe_id, recipe_title);
            }
            None => {
                debug!("Adding new entry '{}'", key);
                list.push(ShoppingListItem {
                    id: generate_item_id(),
                    item: name.to_string(),
                    amount: ingredient.amount,
                    unit: ingredient.unit.clone(),
                    notes: ingredient.notes.clone().filter(|n| !n.is_empty()),
                    recipe_id: Some(recipe_id.to_string()),
                    recipe_title: Some(recipe_title.to_string()),
                    recipe_ids: vec![recipe_id.to_string()],
                    recipe_titles: vec![recipe_title.to_string()],
                    checked: false,
                    added_at: Utc::now(),
                });
                index.insert(key, list.len() - 1);
            }
        }
    }
}

fn merge_entry(
    entry: &mut ShoppingListItem,
    ingredient: &ParsedIngredient,
    recipe_id: &str,
    recipe_title: &str,
) {
    if let (Some(existing), Some(incoming)) = (entry.amount, ingredient.amount) {
        entry.amount = Some(existing + incoming);
    }

    if let Some(incoming) = ingredient.notes.as_deref() {
        merge_notes(&mut entry.notes, incoming);
    }

    if entry.recipe_ids.is_empty() {
        if let Some(first) = entry.recipe_id.clone() {
            entry.recipe_ids.push(first);
            entry
                .recipe_titles
                .push(entry.recipe_title.clone().unwrap_or_default());
        }
    }
    if !entry.recipe_ids.iter().any(|id| id == recipe_id) {
        entry.recipe_ids.push(recipe_id.to_string());
        entry.recipe_titles.push(recipe_title.to_string());
    }
}

fn merge_notes(existing: &mut Option<String>, incoming: &str) {
    let mut parts: Vec<String> = existing
        .as_deref()
        .map(|notes| notes.split(", ").map(|part| part.trim().to_string()).collect())
        .unwrap_or_default();
    parts.retain(|part| !part.is_empty());

    let before = parts.len();
    for part in incoming.split(", ").map(str::trim) {
        if !part.is_empty() && !parts.iter().any(|p| p == part) {
            parts.push(part.to_string());
        }
    }

    if parts.len() != before {
        *existing = Some(parts.join(", "));
    }
}

/// Group entries by their first contributing recipe, in first-appearance order
pub fn group_items(items: &[ShoppingListItem]) -> Vec<RecipeGroup> {
    let mut groups: Vec<RecipeGroup> = Vec::new();

    for item in items {
        let recipe_id = item
            .recipe_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(OTHER_RECIPE_ID);

        match groups.iter_mut().find(|g| g.recipe_id == recipe_id) {
            Some(group) => group.items.push(item.clone()),
            None => groups.push(RecipeGroup {
                recipe_id: recipe_id.to_string(),
                title: item
                    .recipe_title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| OTHER_RECIPE_TITLE.to_string()),
                items: vec![item.clone()],
            }),
        }
    }

    groups
}

/// The persisted shopping list
pub struct ShoppingList<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> ShoppingList<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Current entries; empty when the store cannot be read
    pub fn items(&self) -> Vec<ShoppingListItem> {
        self.load().unwrap_or_else(|e| {
            warn!("Error reading shopping list: {}", e);
            Vec::new()
        })
    }

    fn load(&self) -> Result<Vec<ShoppingListItem>, StorageError> {
        match self.store.get(SHOPPING_LIST_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Add parsed ingredients from a recipe, merging duplicates
    pub fn add_items(
        &self,
        ingredients: &[ParsedIngredient],
        recipe_id: &str,
        recipe_title: &str,
    ) -> Vec<ShoppingListItem> {
        self.update(|list| merge_ingredients(list, ingredients, recipe_id, recipe_title))
    }

    /// Like [`add_items`](Self::add_items), but reports a list that could not be
    /// read or written instead of returning the unchanged view
    pub fn try_add_items(
        &self,
        ingredients: &[ParsedIngredient],
        recipe_id: &str,
        recipe_title: &str,
    ) -> Result<Vec<ShoppingListItem>, StorageError> {
        self.try_update(|list| merge_ingredients(list, ingredients, recipe_id, recipe_title))
    }

    /// Flip the checked flag of one entry
    pub fn toggle_checked(&self, id: &str) -> Vec<ShoppingListItem> {
        self.update(|list| {
            if let Some(entry) = list.iter_mut().find(|entry| entry.id == id) {
                entry.checked = !entry.checked;
            }
        })
    }

    /// Remove one entry
    pub fn remove(&self, id: &str) -> Vec<ShoppingListItem> {
        self.update(|list| list.retain(|entry| entry.id != id))
    }

    /// Remove every checked entry
    pub fn clear_checked(&self) -> Vec<ShoppingListItem> {
        self.update(|list| list.retain(|entry| !entry.checked))
    }

    /// Remove every entry.
    ///
    /// The stored value is replaced without being read, so this also recovers a
    /// list that no longer deserializes.
    pub fn clear_all(&self) -> Vec<ShoppingListItem> {
        match self.save(&[]) {
            Ok(()) => {
                info!("Shopping list cleared");
                Vec::new()
            }
            Err(e) => {
                warn!("Error clearing shopping list: {}", e);
                self.items()
            }
        }
    }

    /// Remove the entries first added by `recipe_id`
    pub fn clear_by_recipe(&self, recipe_id: &str) -> Vec<ShoppingListItem> {
        self.update(|list| list.retain(|entry| entry.recipe_id.as_deref() != Some(recipe_id)))
    }

    /// Entries grouped by recipe for rendering
    pub fn group_by_recipe(&self) -> Vec<RecipeGroup> {
        group_items(&self.items())
    }

    pub fn item_count(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Check whether any entry came from `recipe_id`
    pub fn has_recipe(&self, recipe_id: &str) -> bool {
        self.items().iter().any(|entry| entry.has_recipe(recipe_id))
    }

    /// Apply `mutate` and persist; on any storage failure nothing is written and
    /// the current view is returned
    fn update<F>(&self, mutate: F) -> Vec<ShoppingListItem>
    where
        F: FnOnce(&mut Vec<ShoppingListItem>),
    {
        self.try_update(mutate).unwrap_or_else(|e| {
            warn!("Shopping list left unchanged: {}", e);
            self.items()
        })
    }

    fn try_update<F>(&self, mutate: F) -> Result<Vec<ShoppingListItem>, StorageError>
    where
        F: FnOnce(&mut Vec<ShoppingListItem>),
    {
        let mut list = self.load()?;
        let before = list.len();
        mutate(&mut list);
        self.save(&list)?;

        info!("Shopping list saved: {} entries (was {})", list.len(), before);
        Ok(list)
    }

    fn save(&self, list: &[ShoppingListItem]) -> Result<(), StorageError> {
        self.store.set(SHOPPING_LIST_KEY, serde_json::to_value(list)?)
    }
}
