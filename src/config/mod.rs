//! Configuration module for Muddler
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every field has a default matching the drinkoteket catalog, so a
//! missing config file simply means "scrape the default source".
//!
//! # Example
//!
//! ```no_run
//! use muddler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("muddler.toml")).unwrap();
//! println!("Listing root: {}", config.source.listing_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, OutputConfig, SelectorsConfig, SourceConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_or_default, load_config_with_hash};
