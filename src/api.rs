//! LLM API interaction with exponential backoff retry logic.
//!
//! Paraphrasing sends each extracted title and description to an
//! OpenAI-compatible LLM. This module holds the request plumbing:
//! - [`AskAsync`]: core trait defining async LLM interaction
//! - [`RetryAsk`]: decorator that adds retry logic to any `AskAsync` implementation
//! - `AskFnWrapper`: wraps the `awful_aj` library's `ask` function
//!   (only with the `paraphrase` feature)
//!
//! # Retry Strategy
//!
//! - Exponential backoff starting at `base_delay`
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{rng, Rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Trait for async LLM interaction.
///
/// This abstraction allows for different LLM backends or decorators (like retry logic).
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send text to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// # Backoff Strategy
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    /// The underlying LLM client to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Create a new retry wrapper around an existing [`AskAsync`] implementation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = AskFnWrapper { config: &config, template: &template };
    /// let retry_client = RetryAsk::new(client, 5, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Delay before retry number `attempt` (1-based), without jitter.
    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.backoff(attempt) + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(feature = "paraphrase")]
pub use llm::AskFnWrapper;

#[cfg(feature = "paraphrase")]
mod llm {
    use super::AskAsync;
    use awful_aj::api::ask;
    use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
    use std::error::Error;
    use std::time::Instant;
    use tracing::{instrument, warn};

    /// Wrapper around `awful_aj::api::ask` that implements [`AskAsync`].
    #[derive(Debug)]
    pub struct AskFnWrapper<'a> {
        /// LLM configuration (API keys, endpoints, model settings).
        pub config: &'a AwfulJadeConfig,
        /// Chat template instructing the model to paraphrase.
        pub template: &'a ChatTemplate,
    }

    impl<'a> AskAsync for AskFnWrapper<'a> {
        type Response = String;

        #[instrument(level = "debug", skip_all)]
        async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
            let t0 = Instant::now();
            let res = ask(self.config, text.to_string(), self.template, None, None).await;
            if let Err(e) = &res {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "API call failed");
            }
            res
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails a fixed number of times, then echoes the input.
    struct Flaky {
        failures_left: AtomicUsize,
        calls: AtomicUsize,
    }

    impl Flaky {
        fn new(failures: usize) -> Self {
            Self {
                failures_left: AtomicUsize::new(failures),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AskAsync for Flaky {
        type Response = String;

        async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err("upstream unavailable".into());
            }
            Ok(text.to_string())
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let api = RetryAsk::new(Flaky::new(2), 3, StdDuration::from_millis(1));
        let resp = api.ask("hello").await.unwrap();
        assert_eq!(resp, "hello");
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let api = RetryAsk::new(Flaky::new(10), 1, StdDuration::from_millis(1));
        let err = api.ask("hello").await.unwrap_err();
        assert_eq!(err.to_string(), "upstream unavailable");
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_retry_on_success() {
        let api = RetryAsk::new(Flaky::new(0), 5, StdDuration::from_millis(1));
        api.ask("hello").await.unwrap();
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let api = RetryAsk::new(Flaky::new(0), 5, StdDuration::from_secs(1));
        assert_eq!(api.backoff(1), StdDuration::from_secs(1));
        assert_eq!(api.backoff(2), StdDuration::from_secs(2));
        assert_eq!(api.backoff(3), StdDuration::from_secs(4));
        assert_eq!(api.backoff(10), StdDuration::from_secs(30));
        assert_eq!(api.backoff(100), StdDuration::from_secs(30));
    }

    #[test]
    fn test_debug_hides_inner() {
        let api = RetryAsk::new(Flaky::new(0), 5, StdDuration::from_secs(1));
        let dbg = format!("{api:?}");
        assert!(dbg.contains("max_retries: 5"));
    }
}
