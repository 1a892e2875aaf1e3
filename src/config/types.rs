use serde::Deserialize;

/// Main configuration structure for Muddler
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub fetcher: FetcherConfig,
    pub selectors: SelectorsConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            fetcher: FetcherConfig::default(),
            selectors: SelectorsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// The catalog being scraped: where the listing lives and how its
/// detail-page URLs are shaped
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Site root, e.g. "https://drinkoteket.se"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the paginated listing index
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Path prefix identifying a recipe detail page; the slug is the path
    /// segment that follows it
    #[serde(rename = "detail-path-prefix")]
    pub detail_path_prefix: String,

    /// Site suffix stripped from the <title> fallback when no heading exists
    #[serde(rename = "title-suffix")]
    pub title_suffix: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://drinkoteket.se".to_string(),
            listing_path: "/alla-drinkar/".to_string(),
            detail_path_prefix: "/recept/".to_string(),
            title_suffix: " - Drinkoteket".to_string(),
        }
    }
}

impl SourceConfig {
    /// Absolute URL of the listing root (page 1)
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.listing_path)
    }

    /// Absolute URL of a numbered listing page (cursor > 1)
    pub fn listing_page_url(&self, page: u32) -> String {
        format!("{}page/{}/", self.listing_url(), page)
    }
}

/// HTTP client behavior and politeness settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Client identity string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept header value
    pub accept: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Fixed delay after every request, listing and detail alike (ms)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "sv-SE,sv;q=0.9,en;q=0.8".to_string(),
            timeout_secs: 10,
            request_delay_ms: 500,
        }
    }
}

/// CSS hooks the catalog's markup uses for the pieces we extract
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorsConfig {
    /// List items holding one ingredient line each (amount span + name span)
    #[serde(rename = "ingredients-list")]
    pub ingredients_list: String,

    /// The recipe's primary image element
    #[serde(rename = "primary-image")]
    pub primary_image: String,

    /// Lazy-load attribute consulted when the image has no src
    #[serde(rename = "lazy-image-attr")]
    pub lazy_image_attr: String,

    /// Category anchors inside the recipe's taxonomy container
    #[serde(rename = "category-terms")]
    pub category_terms: String,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            ingredients_list: "ul.ingredients li".to_string(),
            primary_image: "img[itemprop='image']".to_string(),
            lazy_image_attr: "data-rstmb".to_string(),
            category_terms: ".display-recipe-terms a.related-terms".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the three persisted JSON stores
    #[serde(rename = "data-dir")]
    pub data_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}
