//! HTTP fetching of source pages.
//!
//! The extraction engine only ever sees "a page" or "no page". Everything
//! that can go wrong here (connect errors, timeouts, non-2xx statuses,
//! unreadable bodies) is logged and reported as `None`.

use reqwest::Client;
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Source of raw HTML pages.
pub trait FetchHtml {
    /// Fetch the page at `url`. `None` means there is nothing to extract.
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// Enforces a minimum interval between request starts.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: Mutex::new(None),
        }
    }

    /// Wait until a new request may start, then claim the slot.
    ///
    /// The lock is held while sleeping so concurrent callers queue up
    /// instead of starting together.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }
        let mut last_start = self.last_start.lock().await;
        if let Some(prev) = *last_start {
            let elapsed = prev.elapsed();
            if elapsed < self.interval {
                let wait = self.interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Rate limiting request");
                sleep(wait).await;
            }
        }
        *last_start = Some(Instant::now());
    }
}

/// Settings for [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Minimum delay between two request starts. Zero disables limiting.
    pub min_interval: Duration,
    /// Overall timeout for one request, body included.
    pub timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Rate-limited HTTP page fetcher.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    limiter: RateLimiter,
}

impl Fetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        info!(
            min_interval_ms = settings.min_interval.as_millis() as u64,
            timeout_secs = settings.timeout.as_secs(),
            "HTTP fetcher ready"
        );
        Ok(Self {
            client,
            limiter: RateLimiter::new(settings.min_interval),
        })
    }

    async fn fetch_text(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

impl FetchHtml for Fetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Option<String> {
        self.limiter.acquire().await;
        let t0 = Instant::now();
        match self.fetch_text(url).await {
            Ok(body) => {
                info!(
                    bytes = body.len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Fetched page"
                );
                Some(body)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    status = ?e.status(),
                    timeout = e.is_timeout(),
                    "Page fetch failed"
                );
                None
            }
        }
    }
}
