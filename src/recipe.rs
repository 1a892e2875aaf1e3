//! The normalized recipe record
//!
//! One `Recipe` per successfully parsed detail page. Field names on disk are
//! camelCase to match the JSON documents the serving layer reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// One ingested recipe with its normalized fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Display name, never empty for a persisted record
    pub name: String,

    /// URL-derived identifier; primary key across all three stores
    pub slug: String,

    /// Canonical origin URL
    pub source_url: String,

    /// Primary image URL, when the page carried one
    pub image: Option<String>,

    /// Free-text ingredient lines, amount and name combined
    pub ingredients: Vec<String>,

    /// Normalized ingredient names, one-to-one with `ingredients`
    pub ingredient_names: Vec<String>,

    /// Rating in [0, 5], absent when no pattern matched
    pub rating: Option<f64>,

    /// Preparation time in minutes, absent when no pattern matched
    pub prep_time_minutes: Option<u32>,

    /// When this record was extracted
    pub scraped_at: DateTime<Utc>,
}

impl Recipe {
    /// Whether this record may reach the store
    ///
    /// A record is persisted only with a non-empty name and at least one
    /// ingredient line; anything less is counted as a parse failure.
    pub fn is_persistable(&self) -> bool {
        !self.name.is_empty() && !self.ingredients.is_empty()
    }
}

/// Derives the slug from a detail-page URL
///
/// The slug is the final non-empty path segment, which must sit directly
/// under `detail_prefix` (e.g. "/recept/mojito/" with prefix "/recept/"
/// yields "mojito"). URLs of any other shape yield an empty string.
pub fn slug_from_url(url: &Url, detail_prefix: &str) -> String {
    let path = url.path();
    let trimmed = path.strip_suffix('/').unwrap_or(path);

    match trimmed.rfind(detail_prefix) {
        Some(idx) => {
            let rest = &trimmed[idx + detail_prefix.len()..];
            if !rest.is_empty() && !rest.contains('/') {
                rest.to_string()
            } else {
                String::new()
            }
        }
        None => String::new(),
    }
}
