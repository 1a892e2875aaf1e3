use crate::config::types::{Config, FetcherConfig, OutputConfig, SelectorsConfig, SourceConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_selectors_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the source catalog configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http or https, got '{}'",
            base.scheme()
        )));
    }

    if !config.listing_path.starts_with('/') || !config.listing_path.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "listing-path must start and end with '/', got '{}'",
            config.listing_path
        )));
    }

    if !config.detail_path_prefix.starts_with('/') || !config.detail_path_prefix.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "detail-path-prefix must start and end with '/', got '{}'",
            config.detail_path_prefix
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    // No lower bound: tests run against a local mock server with zero delay
    if config.request_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request-delay-ms must be <= 60000, got {}",
            config.request_delay_ms
        )));
    }

    Ok(())
}

/// Validates that the configured CSS selectors actually parse
fn validate_selectors_config(config: &SelectorsConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("ingredients-list", &config.ingredients_list),
        ("primary-image", &config.primary_image),
        ("category-terms", &config.category_terms),
    ] {
        if scraper::Selector::parse(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} is not a valid CSS selector: '{}'",
                name, value
            )));
        }
    }

    if config.lazy_image_attr.is_empty() {
        return Err(ConfigError::Validation(
            "lazy-image-attr cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
