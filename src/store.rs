//! Persistence layer for the three JSON stores
//!
//! Each store is one pretty-printed JSON document in the data directory,
//! rewritten in full when a run completes. Loading a store whose file does
//! not exist yields the empty default; any other read or parse failure
//! propagates.

use crate::index::CatalogIndex;
use crate::recipe::Recipe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the records store
pub const RECIPES_FILE: &str = "recipes.json";
/// File name of the category index
pub const CATEGORIES_FILE: &str = "categories.json";
/// File name of the ingredient vocabulary
pub const INGREDIENTS_FILE: &str = "ingredients.json";

/// Errors from reading or writing the persisted stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error for {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to (de)serialize {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// On-disk schema of the ingredient vocabulary
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngredientsDocument {
    /// Sorted, deduplicated ingredient names
    ingredients: Vec<String>,
    count: usize,
    last_updated: DateTime<Utc>,
}

/// File-backed store for the records, category, and ingredient documents
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Creates the data directory if it does not exist yet
    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Io {
            path: self.data_dir.display().to_string(),
            source,
        })
    }

    /// Writes all three stores in the fixed order
    /// ingredients -> categories -> records
    pub fn save_all(&self, index: &CatalogIndex) -> Result<(), StoreError> {
        self.save_ingredients(index.vocabulary())?;
        self.save_categories(index.categories())?;
        self.save_recipes(index.recipes())?;
        Ok(())
    }

    /// Writes the records store
    pub fn save_recipes(&self, recipes: &[Recipe]) -> Result<(), StoreError> {
        self.write_json(RECIPES_FILE, &recipes)?;
        tracing::info!("Saved {} recipes to {}", recipes.len(), RECIPES_FILE);
        Ok(())
    }

    /// Writes the category index
    pub fn save_categories(
        &self,
        categories: &BTreeMap<String, Vec<String>>,
    ) -> Result<(), StoreError> {
        self.write_json(CATEGORIES_FILE, categories)?;
        tracing::info!(
            "Saved {} categories to {}",
            categories.len(),
            CATEGORIES_FILE
        );
        Ok(())
    }

    /// Writes the ingredient vocabulary, sorted, with its count and
    /// last-updated timestamp
    pub fn save_ingredients(&self, vocabulary: &BTreeSet<String>) -> Result<(), StoreError> {
        let ingredients: Vec<String> = vocabulary.iter().cloned().collect();
        let document = IngredientsDocument {
            count: ingredients.len(),
            ingredients,
            last_updated: Utc::now(),
        };
        self.write_json(INGREDIENTS_FILE, &document)?;
        tracing::info!(
            "Saved {} unique ingredients to {}",
            document.count,
            INGREDIENTS_FILE
        );
        Ok(())
    }

    /// Loads the records store; a missing file is an empty store
    pub fn load_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        match self.read_json::<Vec<Recipe>>(RECIPES_FILE)? {
            Some(recipes) => Ok(recipes),
            None => {
                tracing::debug!("No existing {} found, starting fresh", RECIPES_FILE);
                Ok(Vec::new())
            }
        }
    }

    /// Loads the category index; a missing file is an empty index
    pub fn load_categories(&self) -> Result<BTreeMap<String, Vec<String>>, StoreError> {
        match self.read_json::<BTreeMap<String, Vec<String>>>(CATEGORIES_FILE)? {
            Some(categories) => Ok(categories),
            None => {
                tracing::debug!("No existing {} found, starting fresh", CATEGORIES_FILE);
                Ok(BTreeMap::new())
            }
        }
    }

    /// Loads the ingredient vocabulary; a missing file is an empty set
    pub fn load_ingredients(&self) -> Result<BTreeSet<String>, StoreError> {
        match self.read_json::<IngredientsDocument>(INGREDIENTS_FILE)? {
            Some(document) => Ok(document.ingredients.into_iter().collect()),
            None => {
                tracing::debug!("No existing {} found, starting fresh", INGREDIENTS_FILE);
                Ok(BTreeSet::new())
            }
        }
    }

    /// Loads all three stores into a catalog index
    pub fn load_all(&self) -> Result<CatalogIndex, StoreError> {
        Ok(CatalogIndex::from_parts(
            self.load_recipes()?,
            self.load_categories()?,
            self.load_ingredients()?,
        ))
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let path = self.data_dir.join(file);
        let data = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(&path, data).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Reads and deserializes a store file; `None` means the file is absent
    fn read_json<T: for<'de> Deserialize<'de>>(
        &self,
        file: &str,
    ) -> Result<Option<T>, StoreError> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            return Ok(None);
        }

        let data = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let value = serde_json::from_str(&data).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(value))
    }
}
