//! Data models for extracted news items and the published feed.
//!
//! This module defines the records that leave the extraction engine:
//! - [`NewsItem`]: one article summary found in a source page
//! - [`NewsFeed`]: the aggregated, cacheable output of a full run

use serde::{Deserialize, Serialize};

/// Placeholder written to [`NewsItem::image`] when a candidate has no image.
pub const NO_IMAGE: &str = "No Image Found";

/// A single news summary extracted from one source page.
///
/// Items are produced by the extraction orchestrator and never mutated
/// afterwards; text transformations build a new item via
/// [`NewsItem::with_text`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    /// Headline text.
    pub title: String,
    /// Short summary text (always more than three words at extraction time).
    pub description: String,
    /// Image URL as found in the markup, or [`NO_IMAGE`].
    pub image: String,
    /// Machine-readable date attribute, verbatim. `null` when absent.
    pub date: Option<String>,
    /// Label of the source the item came from.
    pub source: String,
}

impl NewsItem {
    /// Assemble an item, applying the image sentinel when no image was found.
    pub fn new(
        title: String,
        description: String,
        image: Option<String>,
        date: Option<String>,
        source: &str,
    ) -> Self {
        Self {
            title,
            description,
            image: image.unwrap_or_else(|| NO_IMAGE.to_string()),
            date,
            source: source.to_string(),
        }
    }

    /// Copy of this item with its title and description replaced.
    pub fn with_text(&self, title: String, description: String) -> Self {
        Self {
            title,
            description,
            ..self.clone()
        }
    }

    pub fn has_image(&self) -> bool {
        self.image != NO_IMAGE
    }
}

/// The aggregated feed for one run.
///
/// This is what gets written to disk, served, and reused from the cache
/// while it is still fresh.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsFeed {
    /// Unix timestamp (seconds) at which the feed was generated.
    pub generated_at: i64,
    /// Source labels in configured order.
    pub sources: Vec<String>,
    /// Items from every source, concatenated in source order.
    pub items: Vec<NewsItem>,
}
