//! Multi-source aggregation.
//!
//! Each configured source is fetched and extracted independently; results
//! are concatenated in configured order. Every extraction call owns its own
//! duplicate set, so the same story on two sites yields two items.

use crate::config::SourceConfig;
use crate::extract::parse_news;
use crate::fetch::FetchHtml;
use crate::models::NewsItem;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

/// Fetch and extract every source, at most `concurrency` at a time.
///
/// Never fails: a source that cannot be fetched contributes no items.
#[instrument(level = "info", skip_all, fields(sources = sources.len(), concurrency = concurrency))]
pub async fn aggregate<F>(fetcher: &F, sources: &[SourceConfig], concurrency: usize) -> Vec<NewsItem>
where
    F: FetchHtml,
{
    let per_source: Vec<Vec<NewsItem>> = stream::iter(sources)
        .map(|source| collect_source(fetcher, source))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let items: Vec<NewsItem> = per_source.into_iter().flatten().collect();
    info!(
        total = items.len(),
        with_image = items.iter().filter(|i| i.has_image()).count(),
        "Aggregated news items"
    );
    items
}

/// Fetch one source and extract its items.
///
/// The page is parsed only after the fetch has completed, so the markup tree
/// never lives across an await point.
async fn collect_source<F>(fetcher: &F, source: &SourceConfig) -> Vec<NewsItem>
where
    F: FetchHtml,
{
    let Some(html) = fetcher.fetch(&source.url).await else {
        warn!(source = %source.name, url = %source.url, "Source produced no page");
        return Vec::new();
    };

    let items = parse_news(Some(&html), &source.name);
    if items.is_empty() {
        warn!(source = %source.name, bytes = html.len(), "No qualifying articles found");
    } else {
        info!(source = %source.name, count = items.len(), "Collected source items");
    }
    items
}
