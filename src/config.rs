//! # Configuration Module
//!
//! Page-level context handed to the controller, and process configuration read
//! from the environment.

use log::warn;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

// Constants for environment configuration
pub const STORE_PATH_VAR: &str = "RECIPE_STORE_PATH";
pub const RECIPE_DATA_URL_VAR: &str = "RECIPE_DATA_URL";
pub const RECIPE_DATA_TIMEOUT_VAR: &str = "RECIPE_DATA_TIMEOUT_SECS";
pub const DEFAULT_STORE_PATH: &str = "recipe_features.json";
pub const DEFAULT_RECIPE_DATA_TIMEOUT_SECS: u64 = 10;

/// Serving multipliers offered next to a recipe
pub const SERVING_MULTIPLIERS: [f64; 5] = [0.5, 1.0, 2.0, 3.0, 4.0];

/// The recipe shown on the current page
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeContext {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
}

/// Everything the page controller knows about the page it runs on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContext {
    /// Present only on recipe pages
    pub recipe: Option<RecipeContext>,
    /// Endpoint for refreshing saved-recipe metadata
    pub recipe_data_url: Option<String>,
}

impl RecipeContext {
    pub fn new(id: &str, title: &str, slug: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }
}

impl PageContext {
    /// Context of a recipe page
    pub fn for_recipe(recipe: RecipeContext) -> Self {
        Self {
            recipe: Some(recipe),
            recipe_data_url: None,
        }
    }

    pub fn with_recipe_data_url(mut self, url: &str) -> Self {
        self.recipe_data_url = Some(url.to_string());
        self
    }

    pub fn is_recipe(&self) -> bool {
        self.recipe.is_some()
    }
}

/// Process configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// JSON file backing the key-value store
    pub store_path: PathBuf,
    /// Recipe metadata endpoint; metadata refresh is skipped when unset
    pub recipe_data_url: Option<String>,
    /// Timeout for one metadata request
    pub recipe_data_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            recipe_data_url: None,
            recipe_data_timeout: Duration::from_secs(DEFAULT_RECIPE_DATA_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(STORE_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.store_path = PathBuf::from(path.trim());
        }

        config.recipe_data_url = lookup(RECIPE_DATA_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        if let Some(raw) = lookup(RECIPE_DATA_TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.recipe_data_timeout = Duration::from_secs(secs),
                _ => warn!(
                    "Ignoring invalid {}='{}', using {}s",
                    RECIPE_DATA_TIMEOUT_VAR, raw, DEFAULT_RECIPE_DATA_TIMEOUT_SECS
                ),
            }
        }

        config
    }

    /// Page context for a given recipe under this configuration
    pub fn page_context(&self, recipe: Option<RecipeContext>) -> PageContext {
        PageContext {
            recipe,
            recipe_data_url: self.recipe_data_url.clone(),
        }
    }
}
