//! # Feedroll
//!
//! A content aggregation pipeline that ingests articles and posts from a
//! heterogeneous set of remote sources (syndication feeds, bespoke per-site
//! scrapers, and the Facebook Graph API) and produces a single normalized,
//! time-ordered content snapshot for a static viewer.
//!
//! ## Features
//!
//! - Validates the source registry up front; configuration problems abort
//!   before any network activity
//! - Dispatches each source to its adapter: feed, registered scrape
//!   capability, Graph API, or link-only
//! - Resolves a featured image per article via a fallback waterfall
//! - Normalizes every entry into a canonical item with a stable,
//!   reproducible identity
//! - Isolates per-source failures into warnings; one broken source never
//!   blocks the run
//!
//! ## Usage
//!
//! ```sh
//! feedroll
//! ```
//!
//! ## Architecture
//!
//! The pipeline runs in strict stages:
//! 1. **Registry**: load and validate `sources.json` (the only fatal path)
//! 2. **Fetch**: one source at a time, adapter per source, bounded
//!    per-article image resolution
//! 3. **Aggregate**: merge, filter, and sort all items into one snapshot
//! 4. **Write**: atomically replace `docs/data/content.json`

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod error;
mod feed;
mod graph;
mod images;
mod models;
mod normalize;
mod orchestrator;
mod outputs;
mod registry;
mod scrapers;

use cli::Cli;

/// User-Agent presented to every remote host.
const USER_AGENT: &str = concat!("feedroll/", env!("CARGO_PKG_VERSION"), " (+https://github.com/feedroll/feedroll)");

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("feedroll starting up");

    let args = Cli::parse();

    // Configuration problems are the only fatal path; abort before any fetch.
    let sources = match registry::load_sources(&args.sources) {
        Ok(sources) => sources,
        Err(e) => {
            error!(path = %args.sources.display(), error = %e, "Invalid source configuration");
            return Err(e.into());
        }
    };

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    let results = orchestrator::run(
        &client,
        &sources,
        args.facebook_access_token.as_deref(),
        args.image_workers,
    )
    .await;

    let snapshot = aggregate::build_snapshot(results);
    outputs::json::write_snapshot(&snapshot, &args.output).await?;

    let elapsed = start_time.elapsed();
    info!(
        items = snapshot.items.len(),
        sources = snapshot.sources.len(),
        ?elapsed,
        "Build complete"
    );

    Ok(())
}
