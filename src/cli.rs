//! Command-line interface definitions for News Sieve.
//!
//! All options can be given as flags; most also read an environment variable.

use clap::Parser;

/// Command-line arguments for the News Sieve application.
///
/// # Examples
///
/// ```sh
/// # Built-in sources, feed written to ./feed/news.json
/// news_sieve -o ./feed
///
/// # Custom sources, ignore any cached feed, echo the feed to stdout
/// news_sieve -o ./feed -c sources.yaml --refresh --print
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON feed
    #[arg(short, long, env = "NEWS_SIEVE_OUTPUT_DIR")]
    pub output_dir: String,

    /// Optional path to a YAML file listing the sources
    #[arg(short, long, env = "NEWS_SIEVE_CONFIG")]
    pub config: Option<String>,

    /// Reuse the existing feed if it is younger than this many seconds
    #[arg(long, env = "NEWS_SIEVE_CACHE_TTL_SECS", default_value_t = 600)]
    pub cache_ttl_secs: u64,

    /// Ignore any cached feed and fetch every source again
    #[arg(long)]
    pub refresh: bool,

    /// Minimum delay between two outgoing requests, in milliseconds
    #[arg(long, env = "NEWS_SIEVE_RATE_LIMIT_MS", default_value_t = 1000)]
    pub rate_limit_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Number of sources fetched concurrently
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Paraphrase titles and descriptions through the LLM (requires the `paraphrase` feature)
    #[arg(long)]
    pub paraphrase: bool,

    /// Chat template used for paraphrasing
    #[arg(long, default_value = "news_paraphraser")]
    pub paraphrase_template: String,

    /// Optional path to the LLM config.yaml (defaults to the awful_aj config directory)
    #[arg(long, env = "NEWS_SIEVE_LLM_CONFIG")]
    pub llm_config: Option<String>,

    /// Also write the feed JSON to stdout
    #[arg(long)]
    pub print: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["news_sieve", "--output-dir", "./feed"]);

        assert_eq!(cli.output_dir, "./feed");
        assert_eq!(cli.config, None);
        assert_eq!(cli.cache_ttl_secs, 600);
        assert_eq!(cli.rate_limit_ms, 1000);
        assert_eq!(cli.concurrency, 4);
        assert!(!cli.refresh);
        assert!(!cli.paraphrase);
        assert_eq!(cli.paraphrase_template, "news_paraphraser");
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "news_sieve",
            "-o",
            "/tmp/feed",
            "-c",
            "/tmp/sources.yaml",
        ]);

        assert_eq!(cli.output_dir, "/tmp/feed");
        assert_eq!(cli.config.as_deref(), Some("/tmp/sources.yaml"));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "news_sieve",
            "-o",
            "out",
            "--refresh",
            "--print",
            "--paraphrase",
            "--rate-limit-ms",
            "0",
            "--cache-ttl-secs",
            "60",
        ]);

        assert!(cli.refresh);
        assert!(cli.print);
        assert!(cli.paraphrase);
        assert_eq!(cli.rate_limit_ms, 0);
        assert_eq!(cli.cache_ttl_secs, 60);
    }
}
