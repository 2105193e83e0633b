//! Time-bounded reuse of the published feed.
//!
//! The latest feed file doubles as the cache. A run first checks whether it
//! is still fresh and, if so, skips fetching entirely. The extraction engine
//! knows nothing about this.

use crate::models::NewsFeed;
use crate::utils::unix_now;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Load the feed at `path` if it is younger than `ttl_secs` and was built
/// from exactly `sources`, in the same order.
///
/// Missing, unreadable, corrupt or stale files are all cache misses.
#[instrument(level = "info", skip(path, sources), fields(path = %path.display()))]
pub fn load_fresh_feed(path: &Path, ttl_secs: u64, sources: &[String]) -> Option<NewsFeed> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!(error = %e, "No cached feed");
            return None;
        }
    };
    let feed: NewsFeed = match serde_json::from_str(&content) {
        Ok(feed) => feed,
        Err(e) => {
            debug!(error = %e, "Cached feed is not valid JSON");
            return None;
        }
    };

    if feed.sources != sources {
        debug!(cached = ?feed.sources, "Cached feed was built from other sources");
        return None;
    }

    let Some(age) = unix_now().checked_sub(feed.generated_at) else {
        debug!(generated_at = feed.generated_at, "Cached feed has an unusable timestamp");
        return None;
    };
    let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
    if (0..ttl).contains(&age) {
        info!(age_secs = age, ttl_secs, items = feed.items.len(), "Loaded feed from cache");
        Some(feed)
    } else {
        debug!(age_secs = age, ttl_secs, "Cached feed expired");
        None
    }
}
