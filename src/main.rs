use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use upcoming_feed::{
    clock::SystemClock,
    config::Config,
    db::open_store,
    input::read_ids,
    models::TrackedIds,
    services::{write_feed, FeedPipeline, TmdbProvider, TracingReporter},
};

/// Upcoming Feed - JSON Feed of movies and shows in production
#[derive(Parser)]
#[command(name = "upcoming-feed")]
#[command(about = "Builds a JSON Feed of titles in production from tracked TMDB people and companies", long_about = None)]
struct Cli {
    /// File of tracked TMDB person IDs, one per line
    #[arg(long)]
    people_file: Option<PathBuf>,

    /// File of tracked TMDB company IDs, one per line
    #[arg(long)]
    companies_file: Option<PathBuf>,

    /// Where to write the feed, `-` for stdout
    #[arg(short, long, default_value = "-")]
    output_file: PathBuf,

    /// TMDB API key, overrides TMDB_API_KEY
    #[arg(long)]
    api_key: Option<String>,

    /// Persistent memo store, overrides CACHE_FILE
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Log skipped credits and titles
    #[arg(short, long)]
    verbose: bool,
}

/// Reads a tracked-ID file; no file means nothing is tracked
fn load_ids(path: Option<&Path>) -> Result<BTreeSet<u64>> {
    let Some(path) = path else {
        return Ok(BTreeSet::new());
    };
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_ids(BufReader::new(file)).with_context(|| format!("Failed to read {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays a clean feed
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?.with_overrides(cli.api_key, cli.cache_file);

    let tracked = TrackedIds {
        people: load_ids(cli.people_file.as_deref())?,
        companies: load_ids(cli.companies_file.as_deref())?,
    };

    let provider = TmdbProvider::from_config(&config)?;
    let store = open_store(config.cache_file.as_deref(), config.cache_max_items)?;
    let clock = SystemClock;
    let reporter = TracingReporter;

    let outcome = FeedPipeline::new(&provider, store.as_ref(), &clock, &reporter, &tracked)
        .with_fetch_concurrency(config.fetch_concurrency)
        .build_feed()
        .await;
    let closed = store.close();
    let feed = outcome?;
    closed.context("Failed to save memo store")?;

    if cli.output_file.as_os_str() == "-" {
        write_feed(&feed, io::stdout().lock())?;
    } else {
        let file = File::create(&cli.output_file)
            .with_context(|| format!("Failed to create {}", cli.output_file.display()))?;
        write_feed(&feed, BufWriter::new(file))?;
    }

    tracing::info!(items = feed.items.len(), "Feed written");
    Ok(())
}
