//! Crawler module - the discovery/fetch/parse pipeline
//!
//! This module contains the moving parts of the ingestion pipeline:
//! - `fetcher`: one rate-limit-friendly HTTP request at a time
//! - `listing`: paginated discovery of detail-page URLs
//! - `detail`: detail page markup -> normalized record
//! - `coordinator`: sequencing, failure counting, persistence

pub mod coordinator;
pub mod detail;
pub mod fetcher;
pub mod listing;

pub use coordinator::{Coordinator, RunStats};
pub use detail::{ParsedRecipe, RecipeParser};
pub use fetcher::{FetchError, Fetcher};
pub use listing::{Discovery, ListingCrawler};
