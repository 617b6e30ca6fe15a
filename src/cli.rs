//! Command-line interface definitions for the news pipeline.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Secrets come from environment variables; everything else has defaults
//! suitable for the production cron job.

use clap::Parser;

/// Command-line arguments for the AI news pipeline.
///
/// # Examples
///
/// ```sh
/// # Production run: built-in catalog, data/news.json
/// ai_news_wire
///
/// # Custom catalog, smaller output
/// ai_news_wire --feeds feeds.yaml --max-articles 50
///
/// # LLM translation (otherwise the dictionary fallback is used)
/// OPENAI_API_KEY=sk-... ai_news_wire
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for news.json
    #[arg(short, long, default_value = "data")]
    pub output_dir: String,

    /// Optional YAML feed catalog (replaces the built-in ~40 feeds)
    #[arg(short, long)]
    pub feeds: Option<String>,

    /// Maximum articles kept after sorting
    #[arg(long, default_value_t = 200)]
    pub max_articles: usize,

    /// How many feeds to fetch concurrently
    #[arg(long, default_value_t = 8)]
    pub fetch_concurrency: usize,

    /// How many articles to translate concurrently (LLM path only)
    #[arg(long, default_value_t = 12)]
    pub translate_concurrency: usize,

    /// OpenAI-compatible API key; enables LLM translation when set
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model used for translation
    #[arg(long, env = "TRANSLATION_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ai_news_wire"]);
        assert_eq!(cli.output_dir, "data");
        assert_eq!(cli.max_articles, 200);
        assert_eq!(cli.fetch_concurrency, 8);
        assert_eq!(cli.translate_concurrency, 12);
        assert!(cli.feeds.is_none());
        assert_eq!(cli.model, "gpt-4o-mini");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "ai_news_wire",
            "-o",
            "/tmp/out",
            "--feeds",
            "feeds.yaml",
            "--max-articles",
            "50",
        ]);
        assert_eq!(cli.output_dir, "/tmp/out");
        assert_eq!(cli.feeds.as_deref(), Some("feeds.yaml"));
        assert_eq!(cli.max_articles, 50);
    }
}
