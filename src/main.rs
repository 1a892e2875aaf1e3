//! Muddler main entry point
//!
//! Command-line interface for the recipe catalog scraper.

use anyhow::Result;
use clap::{Parser, Subcommand};
use muddler::config::{load_config_with_hash, Config};
use muddler::crawler::{Coordinator, RunStats};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Muddler: a polite recipe catalog scraper
///
/// Muddler walks a paginated recipe listing, scrapes each detail page into
/// a normalized record, and maintains three JSON stores: the records, a
/// category index, and the global ingredient vocabulary.
#[derive(Parser, Debug)]
#[command(name = "muddler")]
#[command(version = "1.0.0")]
#[command(about = "A polite recipe catalog scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when absent)
    #[arg(short, long, value_name = "CONFIG", default_value = "muddler.toml")]
    config: PathBuf,

    /// Override the data directory from the config
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape the whole catalog, optionally capping the number of recipes
    RunAll {
        /// Maximum number of detail pages to process
        #[arg(value_name = "LIMIT")]
        limit: Option<usize>,
    },

    /// Load the persisted stores and report them; the incremental merge is
    /// not implemented yet and nothing on disk is changed
    Update,

    /// Short test run, equivalent to `run-all 5`
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_configuration(&cli.config)?;

    if let Some(data_dir) = &cli.data_dir {
        config.output.data_dir = data_dir.display().to_string();
    }

    let coordinator = Coordinator::new(&config)?;

    match cli.command {
        Commands::RunAll { limit } => {
            if let Some(limit) = limit {
                tracing::info!("Scraping at most {} recipes", limit);
            } else {
                tracing::info!("Scraping the full catalog");
            }
            let stats = coordinator.run_all(limit).await?;
            print_summary(&stats);
        }
        Commands::Update => {
            let stats = coordinator.update()?;
            println!(
                "Existing data: {} recipes, {} categories, {} ingredients (left untouched)",
                stats.successes, stats.category_count, stats.vocabulary_size
            );
        }
        Commands::Test => {
            tracing::info!("Test run: scraping 5 recipes");
            let stats = coordinator.run_all(Some(5)).await?;
            print_summary(&stats);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("muddler=info,warn"),
            1 => EnvFilter::new("muddler=debug,info"),
            2 => EnvFilter::new("muddler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file when present, otherwise the built-in defaults
fn load_configuration(path: &PathBuf) -> Result<Config> {
    if path.exists() {
        let (config, hash) = load_config_with_hash(path)?;
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
        Ok(config)
    } else {
        tracing::info!(
            "No config file at {}, using built-in defaults",
            path.display()
        );
        Ok(Config::default())
    }
}

/// Prints the end-of-run totals
fn print_summary(stats: &RunStats) {
    if stats.aborted {
        println!("Run aborted: no recipe URLs discovered");
        return;
    }

    println!("\nScraping completed");
    println!("  Discovered URLs:    {}", stats.urls_discovered);
    if !stats.discovery_complete {
        println!("  (listing walk was cut short by a fetch error)");
    }
    println!("  Processed:          {}", stats.processed);
    println!("  Successful:         {}", stats.successes);
    println!("  Failed:             {}", stats.failures);
    println!("  Unique ingredients: {}", stats.vocabulary_size);
    println!("  Categories:         {}", stats.category_count);
}
