//! Crawler coordinator - main run orchestration
//!
//! Sequences the pipeline: Init (data dir + empty indexes), Discovering
//! (listing walk), Fetching (ordered per-URL loop with failure isolation),
//! Persisting (full rewrite of the three stores), Done (summary). A run
//! aborts before the fetch loop when discovery yields zero URLs.
//!
//! Everything runs on one task: no concurrent fetches, and a fixed delay
//! after every request keeps the request rate bounded. Per-URL failures
//! (fetch errors, rejected pages) are counted and skipped; only a
//! persistence failure is fatal.

use crate::config::Config;
use crate::crawler::detail::RecipeParser;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::listing::{Discovery, ListingCrawler};
use crate::index::CatalogIndex;
use crate::store::JsonStore;
use crate::MuddlerError;
use std::time::Duration;

/// Run phases, logged as the coordinator moves through them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Discovering,
    Fetching,
    Persisting,
    Done,
    Aborted,
}

/// Totals reported when a run ends
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Unique detail URLs the listing walk produced
    pub urls_discovered: usize,
    /// Whether the listing walk reached its natural end
    pub discovery_complete: bool,
    /// URLs actually attempted (after the optional cap)
    pub processed: usize,
    /// Records absorbed into the indexes
    pub successes: usize,
    /// Fetch errors plus rejected pages
    pub failures: usize,
    /// Unique normalized ingredient names
    pub vocabulary_size: usize,
    /// Categories created
    pub category_count: usize,
    /// True when the run ended in `Aborted` (zero URLs discovered)
    pub aborted: bool,
}

/// Top-level sequencer of discovery, the fetch/parse loop, and persistence
pub struct Coordinator {
    fetcher: Fetcher,
    crawler: ListingCrawler,
    parser: RecipeParser,
    store: JsonStore,
    delay: Duration,
}

impl Coordinator {
    /// Creates a coordinator from the configuration
    pub fn new(config: &Config) -> Result<Self, MuddlerError> {
        let fetcher = Fetcher::new(&config.fetcher)?;
        let crawler = ListingCrawler::new(&config.source)?;
        let parser = RecipeParser::new(&config.source, &config.selectors)?;
        let store = JsonStore::new(&config.output.data_dir);

        Ok(Self {
            fetcher,
            crawler,
            parser,
            store,
            delay: Duration::from_millis(config.fetcher.request_delay_ms),
        })
    }

    /// Runs the full pipeline, optionally capping the number of detail
    /// pages processed
    ///
    /// Returns the run totals. Individual URL failures never fail the run;
    /// a persistence failure does.
    pub async fn run_all(&self, limit: Option<usize>) -> Result<RunStats, MuddlerError> {
        let mut stats = RunStats::default();

        self.enter(Phase::Init);
        self.store.ensure_dir()?;
        let mut index = CatalogIndex::new();

        self.enter(Phase::Discovering);
        let discovery = self.crawler.discover_all(&self.fetcher, self.delay).await;
        match &discovery {
            Discovery::Complete(urls) => {
                stats.discovery_complete = true;
                tracing::info!("Discovered {} unique recipe URLs", urls.len());
            }
            Discovery::Partial {
                urls,
                failed_page,
                cause,
            } => {
                // The walk was cut short, not finished; accept what was
                // gathered and say so
                tracing::warn!(
                    "Listing walk stopped early on page {} ({}); continuing with {} URLs",
                    failed_page,
                    cause,
                    urls.len()
                );
            }
        }
        let mut urls = discovery.into_urls();
        stats.urls_discovered = urls.len();

        if urls.is_empty() {
            self.enter(Phase::Aborted);
            tracing::warn!("No recipe URLs discovered, nothing to do");
            stats.aborted = true;
            return Ok(stats);
        }

        if let Some(cap) = limit {
            urls.truncate(cap);
        }

        self.enter(Phase::Fetching);
        let total = urls.len();
        tracing::info!("Scraping {} recipes...", total);

        for (i, url) in urls.iter().enumerate() {
            match self.fetcher.fetch(url).await {
                Ok(html) => match self.parser.parse(&html, url) {
                    Some(parsed) => {
                        tracing::info!("Scraped: {}", parsed.recipe.name);
                        index.absorb(parsed.recipe, &parsed.categories);
                        stats.successes += 1;
                    }
                    None => {
                        tracing::warn!("Incomplete data for {}", url);
                        stats.failures += 1;
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", url, e);
                    stats.failures += 1;
                }
            }

            stats.processed = i + 1;
            if (i + 1) % 10 == 0 {
                tracing::info!(
                    "Progress: {}/{} ({} successful, {} failed)",
                    i + 1,
                    total,
                    stats.successes,
                    stats.failures
                );
            }

            // Delay after every attempt, success or failure
            tokio::time::sleep(self.delay).await;
        }

        self.enter(Phase::Persisting);
        self.store.save_all(&index)?;

        self.enter(Phase::Done);
        stats.vocabulary_size = index.vocabulary_size();
        stats.category_count = index.category_count();
        tracing::info!(
            "Run complete: {} scraped, {} failed, {} ingredients, {} categories",
            stats.successes,
            stats.failures,
            stats.vocabulary_size,
            stats.category_count
        );

        Ok(stats)
    }

    /// Incremental update mode
    ///
    /// The merge algorithm against previously persisted data is an open
    /// extension point: this loads the existing stores (a missing file is an
    /// empty store), reports what is there, and deliberately changes
    /// nothing on disk.
    pub fn update(&self) -> Result<RunStats, MuddlerError> {
        self.store.ensure_dir()?;
        let existing = self.store.load_all()?;

        tracing::info!(
            "Existing data: {} recipes, {} categories, {} ingredients",
            existing.recipe_count(),
            existing.category_count(),
            existing.vocabulary_size()
        );
        tracing::warn!(
            "Incremental merge is not implemented; existing stores left untouched. \
             Use run-all for a full rebuild."
        );

        Ok(RunStats {
            successes: existing.recipe_count(),
            vocabulary_size: existing.vocabulary_size(),
            category_count: existing.category_count(),
            ..RunStats::default()
        })
    }

    fn enter(&self, phase: Phase) {
        tracing::debug!("Entering phase {:?}", phase);
    }
}
