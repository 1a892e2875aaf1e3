//! In-memory catalog indexes
//!
//! The three stores the pipeline maintains, accumulated as the fetch loop
//! progresses and written out once when the run completes. Owned by the
//! coordinator and passed around by reference; nothing here is global.

use crate::recipe::Recipe;
use std::collections::{BTreeMap, BTreeSet};

/// The records collection, category index, and ingredient vocabulary
#[derive(Debug, Default)]
pub struct CatalogIndex {
    /// Every persisted record, in absorption order
    recipes: Vec<Recipe>,

    /// Category name -> ordered set of member slugs. A category is created
    /// lazily on first membership and never deleted within a run.
    categories: BTreeMap<String, Vec<String>>,

    /// Normalized ingredient names across all records
    vocabulary: BTreeSet<String>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an index from previously persisted data
    pub fn from_parts(
        recipes: Vec<Recipe>,
        categories: BTreeMap<String, Vec<String>>,
        vocabulary: BTreeSet<String>,
    ) -> Self {
        Self {
            recipes,
            categories,
            vocabulary,
        }
    }

    /// Absorbs one parsed record and its category memberships
    ///
    /// Never fails: category sets and the vocabulary have set semantics
    /// (re-absorbing the same record is a no-op for both), and the record
    /// itself is appended unconditionally since validity was already gated
    /// by the parser.
    pub fn absorb(&mut self, recipe: Recipe, categories: &[String]) {
        for category in categories {
            let members = self
                .categories
                .entry(category.clone())
                .or_insert_with(|| {
                    tracing::debug!("Created category: {}", category);
                    Vec::new()
                });
            if !members.contains(&recipe.slug) {
                members.push(recipe.slug.clone());
            }
        }

        for name in &recipe.ingredient_names {
            self.vocabulary.insert(name.clone());
        }

        self.recipes.push(recipe);
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn categories(&self) -> &BTreeMap<String, Vec<String>> {
        &self.categories
    }

    pub fn vocabulary(&self) -> &BTreeSet<String> {
        &self.vocabulary
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}
