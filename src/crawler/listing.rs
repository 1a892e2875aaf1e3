//! Listing crawler - paginated discovery of detail-page URLs
//!
//! Walks the catalog's listing index one page at a time, collecting the
//! detail links each page exposes into a deduplicated, insertion-ordered
//! set. The walk stops when a page yields zero detail links or carries no
//! next-page control.
//!
//! A fetch failure mid-walk is NOT the same thing as reaching the end of
//! the listing, so the result is tagged: `Discovery::Complete` for a clean
//! stop, `Discovery::Partial` when the walk was cut short. The caller picks
//! the policy (accept, retry, alert).

use crate::config::SourceConfig;
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::ConfigError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Outcome of a discovery walk
#[derive(Debug)]
pub enum Discovery {
    /// The listing was walked to its natural end
    Complete(Vec<Url>),

    /// A fetch failed mid-walk; `urls` holds everything gathered from the
    /// pages before `failed_page`
    Partial {
        urls: Vec<Url>,
        failed_page: u32,
        cause: FetchError,
    },
}

impl Discovery {
    /// The discovered URLs, however the walk ended
    pub fn urls(&self) -> &[Url] {
        match self {
            Discovery::Complete(urls) => urls,
            Discovery::Partial { urls, .. } => urls,
        }
    }

    /// Consumes the discovery, keeping only the URLs
    pub fn into_urls(self) -> Vec<Url> {
        match self {
            Discovery::Complete(urls) => urls,
            Discovery::Partial { urls, .. } => urls,
        }
    }

    /// Whether the walk reached the end of the listing
    pub fn is_complete(&self) -> bool {
        matches!(self, Discovery::Complete(_))
    }
}

/// Walks the paginated listing index and collects detail-page URLs
pub struct ListingCrawler {
    source: SourceConfig,
    /// Listing root, page 1 of the walk; base for resolving hrefs
    listing_root: Url,
    /// Anchors that point at detail pages
    detail_link_selector: Selector,
    /// Anchors that point at numbered listing pages
    pagination_selector: Selector,
}

impl ListingCrawler {
    /// Creates a listing crawler for the configured source
    pub fn new(source: &SourceConfig) -> Result<Self, ConfigError> {
        let listing_root = Url::parse(&source.listing_url())
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing URL: {}", e)))?;

        // Detail links appear as h3 > a elements on the listing pages
        let detail_link_selector =
            Selector::parse(&format!("h3 > a[href*='{}']", source.detail_path_prefix)).map_err(
                |e| ConfigError::Validation(format!("Bad detail link selector: {:?}", e)),
            )?;

        let pagination_selector =
            Selector::parse(&format!("a[href*='{}page/']", source.listing_path)).map_err(|e| {
                ConfigError::Validation(format!("Bad pagination selector: {:?}", e))
            })?;

        Ok(Self {
            source: source.clone(),
            listing_root,
            detail_link_selector,
            pagination_selector,
        })
    }

    /// Walks the listing from page 1 until it runs out of pages
    ///
    /// Applies `delay` between page fetches. Duplicate detail URLs across
    /// pages are dropped; the first encounter fixes the position.
    pub async fn discover_all(&self, fetcher: &Fetcher, delay: Duration) -> Discovery {
        let mut seen: HashSet<String> = HashSet::new();
        let mut urls: Vec<Url> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let page_url = match self.page_url(page) {
                Some(u) => u,
                None => return Discovery::Complete(urls),
            };

            tracing::debug!("Fetching listing page {} ({})", page, page_url);

            let html = match fetcher.fetch(&page_url).await {
                Ok(html) => html,
                Err(cause) => {
                    return Discovery::Partial {
                        urls,
                        failed_page: page,
                        cause,
                    };
                }
            };

            let links = self.extract_detail_links(&html);

            // A page with zero detail links is the end of the listing
            if links.is_empty() {
                return Discovery::Complete(urls);
            }

            let found = links.len();
            for link in links {
                if seen.insert(link.as_str().to_string()) {
                    urls.push(link);
                }
            }
            tracing::info!("Found {} recipe links on page {}", found, page);

            if !self.has_next_page(&html, page) {
                return Discovery::Complete(urls);
            }

            page += 1;
            tokio::time::sleep(delay).await;
        }
    }

    /// URL of the given listing page (page 1 is the listing root)
    fn page_url(&self, page: u32) -> Option<Url> {
        if page == 1 {
            Some(self.listing_root.clone())
        } else {
            Url::parse(&self.source.listing_page_url(page)).ok()
        }
    }

    /// Extracts all detail-page links from one listing page, resolved to
    /// absolute URLs
    pub fn extract_detail_links(&self, html: &str) -> Vec<Url> {
        let document = Html::parse_document(html);
        let mut links = Vec::new();

        for element in document.select(&self.detail_link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if !href.contains(&self.source.detail_path_prefix) {
                continue;
            }
            if let Ok(absolute) = self.listing_root.join(href.trim()) {
                if absolute.scheme() == "http" || absolute.scheme() == "https" {
                    links.push(absolute);
                }
            }
        }

        links
    }

    /// Looks for an explicit next-page control on a listing page
    ///
    /// The catalog renders pagination as anchors under the listing path
    /// whose text is either a "»" arrow or the next page number.
    pub fn has_next_page(&self, html: &str, current_page: u32) -> bool {
        let document = Html::parse_document(html);
        let next_number = (current_page + 1).to_string();

        document.select(&self.pagination_selector).any(|element| {
            let text: String = element.text().collect::<String>().trim().to_string();
            text.contains('»') || text == next_number
        })
    }
}
