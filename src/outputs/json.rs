//! JSON feed output.
//!
//! The feed file is the read endpoint of the system: clients read
//! `news.json`, and the cache reuses it while it is fresh.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── news.json              # latest feed
//! └── 2025-05-06/
//!     ├── 081500.json        # archived copies, one per run (UTC)
//!     └── 143000.json
//! ```

use crate::models::NewsFeed;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// File name of the latest feed inside the output directory.
pub const FEED_FILE: &str = "news.json";

/// Path of the latest feed for `output_dir`.
pub fn feed_path(output_dir: &str) -> PathBuf {
    Path::new(output_dir).join(FEED_FILE)
}

/// Serialize a feed the way it is published.
pub fn feed_to_json(feed: &NewsFeed) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(feed)
}

/// Write `feed` as the latest feed and as a dated archive copy.
///
/// # Returns
///
/// The path of the latest feed file.
#[instrument(level = "info", skip_all, fields(%output_dir, items = feed.items.len()))]
pub async fn write_feed(feed: &NewsFeed, output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = feed_to_json(feed)?;

    let generated = DateTime::<Utc>::from_timestamp(feed.generated_at, 0).unwrap_or_else(Utc::now);
    let archive_dir = Path::new(output_dir).join(generated.format("%Y-%m-%d").to_string());
    if let Err(e) = fs::create_dir_all(&archive_dir).await {
        error!(path = %archive_dir.display(), error = %e, "Failed to create archive dir");
        return Err(e.into());
    }
    let archive_path = archive_dir.join(format!("{}.json", generated.format("%H%M%S")));
    fs::write(&archive_path, &json).await?;
    info!(path = %archive_path.display(), "Wrote archived feed");

    // Write-then-rename so readers never see a half-written feed.
    let latest = feed_path(output_dir);
    let staging = latest.with_extension("json.tmp");
    fs::write(&staging, &json).await?;
    fs::rename(&staging, &latest).await?;
    info!(path = %latest.display(), "Wrote JSON feed");

    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsItem;

    fn feed() -> NewsFeed {
        NewsFeed {
            // 2024-10-01T08:15:00Z
            generated_at: 1_727_770_500,
            sources: vec!["Healthline".to_string()],
            items: vec![NewsItem::new(
                "Flu Season".to_string(),
                "Cases are rising across the region".to_string(),
                None,
                None,
                "Healthline",
            )],
        }
    }

    #[tokio::test]
    async fn test_write_feed_latest_and_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();

        let latest = write_feed(&feed(), dir).await.unwrap();

        assert_eq!(latest, tmp.path().join("news.json"));
        let stored: NewsFeed =
            serde_json::from_str(&std::fs::read_to_string(&latest).unwrap()).unwrap();
        assert_eq!(stored.items, feed().items);
        assert!(tmp.path().join("2024-10-01/081500.json").is_file());
        assert!(!tmp.path().join("news.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_feed_overwrites_latest() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();

        write_feed(&feed(), dir).await.unwrap();
        let mut second = feed();
        second.generated_at += 60;
        second.items.clear();
        write_feed(&second, dir).await.unwrap();

        let stored: NewsFeed =
            serde_json::from_str(&std::fs::read_to_string(feed_path(dir)).unwrap()).unwrap();
        assert!(stored.items.is_empty());
        assert!(tmp.path().join("2024-10-01/081600.json").is_file());
    }

    #[test]
    fn test_feed_to_json_shape() {
        let json = feed_to_json(&feed()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["items"][0]["image"], "No Image Found");
        assert!(value["items"][0]["date"].is_null());
        assert_eq!(value["sources"][0], "Healthline");
    }
}
