//! # Storage Module
//!
//! Key-value persistence for the saved-recipe list, the shopping list and the
//! per-recipe scale preference. Values are JSON documents.
//!
//! Repositories receive a store by reference rather than reaching for a global, and
//! swallow its errors: a failed read yields an empty view and a failed write leaves
//! the previous state in place. A file that is not a JSON object is reported as a
//! serialization error and is never overwritten.

use crate::errors::StorageError;
use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key of the saved-recipe list
pub const SAVED_RECIPES_KEY: &str = "saved_recipes";

/// Key of the shopping list
pub const SHOPPING_LIST_KEY: &str = "shopping_list";

/// Prefix of the per-recipe scale preference keys
pub const SCALE_KEY_PREFIX: &str = "recipe_scale_";

/// Storage key holding the scale preference of one recipe
pub fn scale_key(recipe_id: &str) -> String {
    format!("{SCALE_KEY_PREFIX}{recipe_id}")
}

/// A string-keyed store of JSON values
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// In-process store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// Every `set` rewrites the whole file through a temporary sibling and a rename, so
/// a reader never observes a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store at `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Store file {} does not exist yet", self.path.display());
                return Ok(Map::new());
            }
            Err(e) => {
                return Err(StorageError::Read(format!(
                    "Failed to read store file {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let bytes = serde_json::to_vec_pretty(entries).context("Failed to serialize store")?;
        fs::write(&tmp, bytes)
            .with_context(|| format!("Failed to write temporary store file {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace store file {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let entries = self.read_all()?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)?;
        info!("Stored key '{}' in {}", key, self.path.display());
        Ok(())
    }
}
