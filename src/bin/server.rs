//! Dishfinder TCP server
//!
//! Run with: dishfinder-server --data data/restaurants.csv --stop-words data/stop_words.txt

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use dishfinder::index::{load_snapshot, store_snapshot};
use dishfinder::text::Normalizer;
use dishfinder::{Catalog, SearchConfig, SearchEngine};

#[derive(Parser, Debug)]
#[command(name = "dishfinder-server")]
#[command(about = "Typo-tolerant dish search over TCP", version = dishfinder::VERSION)]
struct Args {
    /// Dataset path (CSV: name,description,lat,lon,dish_name,price)
    #[arg(long, env = "DISHFINDER_DATA")]
    data: String,

    /// Stop-word list path, one word per line
    #[arg(long, env = "DISHFINDER_STOP_WORDS")]
    stop_words: String,

    /// Catalog snapshot path; loaded if present, written after a build
    #[arg(long, env = "DISHFINDER_SNAPSHOT")]
    snapshot: Option<String>,

    /// Listen address
    #[arg(long, env = "DISHFINDER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Listen port
    #[arg(long, env = "DISHFINDER_PORT", default_value = "9991")]
    port: u16,

    /// Maximum edit distance for token expansion
    #[arg(long, env = "DISHFINDER_MAX_DISTANCE", default_value = "1")]
    max_distance: u32,

    /// Maximum number of dishes per response
    #[arg(long, env = "DISHFINDER_LIMIT", default_value = "20")]
    limit: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let stop_words = std::fs::read_to_string(&args.stop_words)
        .with_context(|| format!("reading stop words from {}", args.stop_words))?;
    let normalizer = Normalizer::from_word_list(&stop_words);

    // Built exactly once, then shared read-only with every worker. A build
    // failure is fatal: there is no partial catalog state to serve from.
    let catalog = bootstrap_catalog(&args, normalizer).context("building catalog")?;
    tracing::info!(
        dishes = catalog.dish_count(),
        tokens = catalog.vocabulary_size(),
        "catalog ready"
    );

    let config = SearchConfig {
        max_distance: args.max_distance,
        limit: args.limit,
        ..SearchConfig::default()
    };
    let engine = Arc::new(SearchEngine::new(Arc::new(catalog), config));

    let listener = TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("binding {}:{}", args.host, args.port))?;

    dishfinder::server::serve(listener, engine).await?;
    Ok(())
}

fn bootstrap_catalog(args: &Args, normalizer: Normalizer) -> anyhow::Result<Catalog> {
    if let Some(snapshot) = &args.snapshot {
        if let Some(catalog) = load_snapshot(snapshot, normalizer.clone())? {
            return Ok(catalog);
        }
    }

    let catalog = Catalog::from_file(&args.data, normalizer)?;

    if let Some(snapshot) = &args.snapshot {
        // A failed cache write is not fatal, the catalog is already built.
        if let Err(e) = store_snapshot(snapshot, &catalog) {
            tracing::warn!(error = %e, snapshot, "failed to store snapshot");
        } else {
            tracing::info!(snapshot, "snapshot stored");
        }
    }

    Ok(catalog)
}
