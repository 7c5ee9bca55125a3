//! # Saved Recipes
//!
//! The "save for later" list. Bookmarks are persisted with enough data to render
//! them offline; fresh metadata is fetched from the host site when available.

use crate::config::RecipeContext;
use crate::errors::{MetadataFetchError, StorageError};
use crate::ingredient_model::{RecipeMetadata, SavedRecipe};
use crate::recipe_data::RecipeDataClient;
use crate::storage::{KeyValueStore, SAVED_RECIPES_KEY};
use chrono::Utc;
use log::{debug, info, warn};

/// The persisted saved-recipe list
pub struct SavedRecipes<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> SavedRecipes<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Saved recipes in the order they were saved
    pub fn list(&self) -> Vec<SavedRecipe> {
        self.load().unwrap_or_else(|e| {
            warn!("Error reading saved recipes: {}", e);
            Vec::new()
        })
    }

    pub fn is_saved(&self, recipe_id: &str) -> bool {
        self.list().iter().any(|r| r.id == recipe_id)
    }

    pub fn count(&self) -> usize {
        self.list().len()
    }

    /// Save the recipe if it is not saved, otherwise unsave it.
    ///
    /// Returns whether the recipe is saved afterwards. When the store cannot be
    /// read or written, nothing changes and the last known state is returned.
    pub fn toggle(&self, recipe: &RecipeContext) -> bool {
        self.try_toggle(recipe).unwrap_or_else(|e| {
            warn!("Saved recipes left unchanged: {}", e);
            self.is_saved(&recipe.id)
        })
    }

    /// Like [`toggle`](Self::toggle), but reports storage failures
    pub fn try_toggle(&self, recipe: &RecipeContext) -> Result<bool, StorageError> {
        let mut recipes = self.load()?;
        let was_saved = recipes.iter().any(|r| r.id == recipe.id);

        if was_saved {
            recipes.retain(|r| r.id != recipe.id);
        } else {
            recipes.push(SavedRecipe {
                id: recipe.id.clone(),
                title: recipe.title.clone(),
                slug: recipe.slug.clone(),
                image: recipe.image.clone(),
                saved_at: Utc::now(),
            });
        }

        self.save(&recipes)?;
        info!(
            "Recipe {} {}",
            recipe.id,
            if was_saved { "unsaved" } else { "saved" }
        );
        Ok(!was_saved)
    }

    /// Unsave one recipe
    pub fn remove(&self, recipe_id: &str) -> Vec<SavedRecipe> {
        let result = self.load().and_then(|mut recipes| {
            recipes.retain(|r| r.id != recipe_id);
            self.save(&recipes)?;
            Ok(recipes)
        });
        result.unwrap_or_else(|e| {
            warn!("Saved recipes left unchanged: {}", e);
            self.list()
        })
    }

    /// Unsave every recipe; the stored value is replaced without being read
    pub fn clear(&self) -> Vec<SavedRecipe> {
        match self.save(&[]) {
            Ok(()) => Vec::new(),
            Err(e) => {
                warn!("Error clearing saved recipes: {}", e);
                self.list()
            }
        }
    }

    /// Data to render the saved list.
    ///
    /// Makes a single metadata request for every saved id. The fetched data is used
    /// when the request succeeds with at least one recipe; otherwise the persisted
    /// copy is shown.
    pub async fn display_recipes(&self, client: Option<&RecipeDataClient>) -> Vec<RecipeMetadata> {
        let saved = self.list();
        if saved.is_empty() {
            return Vec::new();
        }

        let fallback = || saved.iter().map(SavedRecipe::to_metadata).collect::<Vec<_>>();

        let ids: Vec<String> = saved.iter().map(|r| r.id.clone()).collect();
        let fetched = match client {
            Some(client) => client.fetch(&ids).await,
            None => Err(MetadataFetchError::NotConfigured),
        };

        match fetched {
            Ok(recipes) if !recipes.is_empty() => recipes,
            Ok(_) => {
                debug!("Metadata response was empty, showing saved copy");
                fallback()
            }
            Err(MetadataFetchError::NotConfigured) => fallback(),
            Err(e) => {
                warn!("Error refreshing saved recipes: {}", e);
                fallback()
            }
        }
    }

    fn load(&self) -> Result<Vec<SavedRecipe>, StorageError> {
        match self.store.get(SAVED_RECIPES_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, recipes: &[SavedRecipe]) -> Result<(), StorageError> {
        self.store.set(SAVED_RECIPES_KEY, serde_json::to_value(recipes)?)
    }
}
