//! Optional paraphrasing of extracted text.
//!
//! Runs after extraction, so the word-count and duplicate gates always see
//! the text exactly as it appeared on the page. Title and description are
//! rewritten separately; a failed or blank answer keeps the original field.
//!
//! The LLM backend lives behind the `paraphrase` cargo feature. Without it,
//! [`paraphrase_with_llm`] logs a warning and returns the items unchanged, so
//! `main` can call it unconditionally.

use crate::models::NewsItem;
use tracing::warn;
#[cfg(any(feature = "paraphrase", test))]
use {
    crate::api::AskAsync,
    crate::utils::truncate_for_log,
    futures::stream::{self, StreamExt},
    tracing::{info, instrument},
};

/// Items rewritten concurrently.
#[cfg(any(feature = "paraphrase", test))]
const PARALLEL_BATCH_SIZE: usize = 12;

/// Paraphrase every item's title and description, keeping item order.
#[cfg(any(feature = "paraphrase", test))]
#[instrument(level = "info", skip_all, fields(count = items.len()))]
pub async fn paraphrase_items<A>(items: Vec<NewsItem>, asker: &A) -> Vec<NewsItem>
where
    A: AskAsync<Response = String>,
{
    let rewritten: Vec<NewsItem> = stream::iter(items.iter())
        .map(|item| async move {
            let title = rewrite_field(asker, &item.title).await;
            let description = rewrite_field(asker, &item.description).await;
            item.with_text(title, description)
        })
        .buffered(PARALLEL_BATCH_SIZE)
        .collect()
        .await;

    let changed = rewritten
        .iter()
        .zip(&items)
        .filter(|(new, old)| new.title != old.title || new.description != old.description)
        .count();
    info!(total = items.len(), changed, "Paraphrased news items");
    rewritten
}

/// Ask for one rewritten field, falling back to `original`.
#[cfg(any(feature = "paraphrase", test))]
async fn rewrite_field<A>(asker: &A, original: &str) -> String
where
    A: AskAsync<Response = String>,
{
    match asker.ask(original).await {
        Ok(answer) if !answer.trim().is_empty() => answer.trim().to_string(),
        Ok(_) => {
            warn!(text = %truncate_for_log(original, 80), "Blank paraphrase; keeping original");
            original.to_string()
        }
        Err(e) => {
            warn!(error = %e, text = %truncate_for_log(original, 80), "Paraphrase failed; keeping original");
            original.to_string()
        }
    }
}

/// Paraphrase through the `awful_aj` LLM client configured on the command line.
///
/// # Errors
///
/// Returns an error if the chat template or the LLM configuration cannot be
/// loaded. Failures on individual fields are not errors.
#[cfg(feature = "paraphrase")]
pub async fn paraphrase_with_llm(
    items: Vec<NewsItem>,
    template_name: &str,
    llm_config: Option<&str>,
) -> Result<Vec<NewsItem>, Box<dyn std::error::Error>> {
    use crate::api::{AskFnWrapper, RetryAsk};
    use awful_aj::{config, config_dir, template};
    use std::time::Duration;

    let template = template::load_template(template_name).await?;
    info!(template = template_name, "Loaded paraphrase template");

    let config_path = match llm_config {
        Some(path) => std::path::PathBuf::from(path),
        None => config_dir()?.join("config.yaml"),
    };
    let config_path = config_path
        .to_str()
        .ok_or("LLM config path is not valid UTF-8")?
        .to_string();
    let config = config::load_config(&config_path)
        .map_err(|e| format!("failed to load LLM config {config_path}: {e:?}"))?;
    info!(config_path = %config_path, "Loaded LLM configuration");

    let client = AskFnWrapper {
        config: &config,
        template: &template,
    };
    let api = RetryAsk::new(client, 5, Duration::from_secs(1));
    Ok(paraphrase_items(items, &api).await)
}

/// Paraphrasing is unavailable without the `paraphrase` feature.
#[cfg(not(feature = "paraphrase"))]
pub async fn paraphrase_with_llm(
    items: Vec<NewsItem>,
    _template_name: &str,
    _llm_config: Option<&str>,
) -> Result<Vec<NewsItem>, Box<dyn std::error::Error>> {
    warn!("Paraphrasing requested but this build lacks the `paraphrase` feature; publishing original text");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    struct Shout;

    impl AskAsync for Shout {
        type Response = String;

        async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
            Ok(format!("  {}  ", text.to_uppercase()))
        }
    }

    struct Broken;

    impl AskAsync for Broken {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            Err("model offline".into())
        }
    }

    struct Silent;

    impl AskAsync for Silent {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            Ok("   ".to_string())
        }
    }

    fn items() -> Vec<NewsItem> {
        vec![
            NewsItem::new(
                "Flu Season".to_string(),
                "Cases are rising across the region".to_string(),
                Some("flu.jpg".to_string()),
                Some("2024-10-01".to_string()),
                "Healthline",
            ),
            NewsItem::new(
                "Sleep study".to_string(),
                "Deep sleep linked with memory".to_string(),
                None,
                None,
                "WebMD",
            ),
        ]
    }

    #[tokio::test]
    async fn test_paraphrase_rewrites_each_field() {
        let out = paraphrase_items(items(), &Shout).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "FLU SEASON");
        assert_eq!(out[0].description, "CASES ARE RISING ACROSS THE REGION");
        assert_eq!(out[0].image, "flu.jpg");
        assert_eq!(out[0].date.as_deref(), Some("2024-10-01"));
        assert_eq!(out[1].source, "WebMD");
        assert_eq!(out[1].title, "SLEEP STUDY");
    }

    #[tokio::test]
    async fn test_failed_paraphrase_keeps_original() {
        let original = items();
        let out = paraphrase_items(original.clone(), &Broken).await;
        assert_eq!(out, original);
    }

    #[tokio::test]
    async fn test_blank_paraphrase_keeps_original() {
        let original = items();
        let out = paraphrase_items(original.clone(), &Silent).await;
        assert_eq!(out, original);
    }

    #[tokio::test]
    async fn test_paraphrase_empty_list() {
        assert!(paraphrase_items(Vec::new(), &Shout).await.is_empty());
    }

    #[cfg(not(feature = "paraphrase"))]
    #[tokio::test]
    async fn test_without_feature_items_pass_through() {
        let original = items();
        let out = paraphrase_with_llm(original.clone(), "news_paraphraser", None)
            .await
            .unwrap();
        assert_eq!(out, original);
    }
}
