//! Heuristic news extraction for arbitrary HTML pages.
//!
//! No per-site configuration is involved. A page is processed in four steps:
//!
//! 1. **Locate**: every `article`, `div` and `section` is a candidate ([`candidates`])
//! 2. **Extract**: title and description through ordered fallback chains ([`fields`])
//! 3. **Deduplicate**: drop candidates whose title+description was already emitted ([`dedup`])
//! 4. **Assemble**: add image and date, apply the image sentinel, stamp the source label
//!
//! Every irregularity in the markup collapses to "no value" at the smallest
//! scope: an absent field, a skipped candidate, or an empty result.

pub mod candidates;
pub mod dedup;
pub mod fields;

use crate::models::NewsItem;
use crate::utils::truncate_for_log;
use candidates::candidates;
use dedup::{fingerprint, SeenSet};
use fields::{find_date, find_description, find_image, find_title};
use scraper::Html;
use tracing::{debug, info, instrument, warn};

/// Parse `html` and extract its news items. `None` yields no items.
pub fn parse_news(html: Option<&str>, source: &str) -> Vec<NewsItem> {
    let document = html.map(Html::parse_document);
    extract(document.as_ref(), source)
}

/// Extract deduplicated news items from a parsed page.
///
/// Items come back in document order. A candidate is emitted only when both
/// a title and a description are found, and only the first candidate with a
/// given title+description pair is kept.
#[instrument(level = "debug", skip_all, fields(%source))]
pub fn extract(document: Option<&Html>, source: &str) -> Vec<NewsItem> {
    let Some(document) = document else {
        debug!("No document to extract from");
        return Vec::new();
    };
    if source.trim().is_empty() {
        warn!("Refusing to extract items without a source label");
        return Vec::new();
    }

    let mut seen = SeenSet::new();
    let mut items = Vec::new();
    let mut visited = 0usize;

    for candidate in candidates(document) {
        visited += 1;

        let Some(title) = find_title(candidate) else {
            continue;
        };
        let Some(description) = find_description(candidate) else {
            continue;
        };

        let fp = fingerprint(&title, &description);
        if seen.is_duplicate(&fp) {
            debug!(%fp, title = %truncate_for_log(&title, 80), "Skipping duplicate candidate");
            continue;
        }
        seen.record(fp);

        items.push(NewsItem::new(
            title,
            description,
            find_image(candidate),
            find_date(candidate),
            source,
        ));
    }

    info!(candidates = visited, items = items.len(), "Extracted news items");
    items
}
