//! # News Sieve
//!
//! Aggregates short news summaries from structurally unrelated HTML pages
//! into one deduplicated JSON feed, without any per-site configuration.
//!
//! ## Features
//!
//! - Heuristic extraction of title, description, image and date from
//!   arbitrary article markup
//! - Exact-duplicate suppression within each source page
//! - Rate-limited, concurrent fetching of all configured sources
//! - Time-bounded reuse of the last feed instead of refetching
//! - Optional LLM paraphrasing of titles and descriptions (`paraphrase` feature)
//!
//! ## Usage
//!
//! ```sh
//! news_sieve -o ./feed
//! ```
//!
//! ## Architecture
//!
//! 1. **Cache check**: reuse `news.json` if it is still fresh
//! 2. **Fetching**: download each source page (rate limited)
//! 3. **Extraction**: locate candidates, extract fields, drop duplicates
//! 4. **Paraphrasing**: optionally rewrite extracted text
//! 5. **Output**: write the JSON feed and an archive copy

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod aggregate;
#[cfg(any(feature = "paraphrase", test))]
mod api;
mod cache;
mod cli;
mod config;
mod extract;
mod fetch;
mod models;
mod outputs;
mod transform;
mod utils;

use cli::Cli;
use fetch::{FetchSettings, Fetcher};
use models::NewsFeed;
use outputs::json;
use utils::{ensure_writable_dir, unix_now};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_sieve starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let feed_config = config::load_config(args.config.as_deref()).await?;
    let source_names = feed_config.source_names();
    let feed_path = json::feed_path(&args.output_dir);

    // ---- Cached feed ----
    if !args.refresh {
        if let Some(feed) = cache::load_fresh_feed(&feed_path, args.cache_ttl_secs, &source_names) {
            info!(items = feed.items.len(), path = %feed_path.display(), "Serving cached feed");
            if args.print {
                println!("{}", json::feed_to_json(&feed)?);
            }
            return Ok(());
        }
    }

    // ---- Fetch and extract ----
    let fetcher = Fetcher::new(FetchSettings {
        min_interval: Duration::from_millis(args.rate_limit_ms),
        timeout: Duration::from_secs(args.timeout_secs),
    })?;
    let mut items = aggregate::aggregate(&fetcher, &feed_config.sources, args.concurrency).await;

    // ---- Paraphrase ----
    if args.paraphrase && !items.is_empty() {
        items = transform::paraphrase_with_llm(
            items,
            &args.paraphrase_template,
            args.llm_config.as_deref(),
        )
        .await?;
    }

    // ---- Output ----
    let feed = NewsFeed {
        generated_at: unix_now(),
        sources: source_names,
        items,
    };
    if let Err(e) = json::write_feed(&feed, &args.output_dir).await {
        error!(error = %e, "Failed to write JSON feed");
        return Err(e);
    }
    if args.print {
        println!("{}", json::feed_to_json(&feed)?);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        items = feed.items.len(),
        "Execution complete"
    );

    Ok(())
}
