//! Source configuration.
//!
//! Sources are read from a YAML file:
//!
//! ```yaml
//! sources:
//!   - name: Healthline
//!     url: https://www.healthline.com/health-news
//! ```
//!
//! Without a file the built-in health news sites are used. There is no
//! per-site extraction setting: a source is only a label and a page URL.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::{info, instrument};
use url::Url;

/// One page to fetch and the label its items are published under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Label stamped on every item from this page.
    pub name: String,
    /// Absolute `http`/`https` URL of the page.
    pub url: String,
}

impl SourceConfig {
    fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Top-level contents of the sources file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    pub sources: Vec<SourceConfig>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig::new("Healthline", "https://www.healthline.com/health-news"),
                SourceConfig::new("NBC News", "https://www.nbcnews.com/health"),
                SourceConfig::new("WebMD", "https://www.webmd.com/news/default.htm"),
                SourceConfig::new("Mayo Clinic", "https://www.mayoclinic.org/healthy-lifestyle"),
            ],
        }
    }
}

impl FeedConfig {
    /// Parse and validate a YAML sources document.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let config: FeedConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the source list is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No sources are configured
    /// - A name is blank or used twice
    /// - A URL does not parse or is not `http`/`https`
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.sources.is_empty() {
            return Err("no sources configured".into());
        }
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(format!("source with url {} has a blank name", source.url).into());
            }
            let url = Url::parse(&source.url)
                .map_err(|e| format!("source {:?} has an invalid url {:?}: {e}", source.name, source.url))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!(
                    "source {:?} uses unsupported scheme {:?}",
                    source.name,
                    url.scheme()
                )
                .into());
            }
        }
        if let Some(dup) = self.sources.iter().map(|s| s.name.as_str()).duplicates().next() {
            return Err(format!("source name {dup:?} is used more than once").into());
        }
        Ok(())
    }

    /// Source labels in configured order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name.clone()).collect()
    }
}

/// Load the sources file at `path`, or the built-in list when `path` is `None`.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&str>) -> Result<FeedConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => {
            let yaml = tokio::fs::read_to_string(path).await?;
            FeedConfig::from_yaml(&yaml)?
        }
        None => FeedConfig::default(),
    };
    info!(
        count = config.sources.len(),
        sources = %config.sources.iter().map(|s| s.name.as_str()).join(", "),
        "Loaded source configuration"
    );
    Ok(config)
}
