//! Muddler: a polite recipe catalog scraper
//!
//! This crate implements the ingestion pipeline for a paginated drink recipe
//! catalog: it discovers detail pages by walking the listing index, parses
//! each one into a normalized record, and maintains three mutually-consistent
//! JSON stores (records, category index, ingredient vocabulary).

pub mod config;
pub mod crawler;
pub mod index;
pub mod recipe;
pub mod store;

use thiserror::Error;

/// Main error type for Muddler operations
#[derive(Debug, Error)]
pub enum MuddlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Muddler operations
pub type Result<T> = std::result::Result<T, MuddlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Discovery, Fetcher, RecipeParser, RunStats};
pub use index::CatalogIndex;
pub use recipe::Recipe;
pub use store::JsonStore;
