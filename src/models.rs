//! Data models for feed sources, raw articles, and the published article shape.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`FeedSource`]: A configured RSS/Atom feed to poll
//! - [`RawArticle`]: An article as parsed from a feed, before processing
//! - [`Article`]: A fully processed article as it appears in `news.json`
//! - [`NewsFile`]: The top-level `news.json` document
//!
//! The published models use camelCase field names to match the JSON contract
//! with the site front-end, hence the `#[allow(non_snake_case)]` attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured news feed to poll.
///
/// Feeds come from the built-in catalog in [`crate::feeds`] or from a YAML
/// file passed on the command line. The `categories` are the publisher's own
/// topic tags for the feed and participate in keyword filtering alongside the
/// article text.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedSource {
    /// Display name of the source (becomes `Article::source`).
    pub name: String,
    /// The RSS or Atom feed URL.
    pub url: String,
    /// Topic tags for the feed as a whole.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl FeedSource {
    pub fn new(name: &str, url: &str, categories: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// An article as parsed out of a feed, before filtering and scoring.
///
/// `summary` has already been stripped of HTML; `pub_date` is `None` when the
/// feed carried no parseable date (the fetcher substitutes fetch time so the
/// final sort stays total).
#[derive(Debug, Clone)]
pub struct RawArticle {
    /// Headline as published by the source.
    pub title: String,
    /// Canonical link to the article.
    pub link: String,
    /// Plain-text summary (HTML stripped).
    pub summary: String,
    /// Name of the feed the article came from.
    pub source: String,
    /// The feed's topic tags, used by the keyword filter.
    pub categories: Vec<String>,
    /// Publication date, when the feed provided one.
    pub pub_date: Option<DateTime<Utc>>,
}

/// A fully processed article as it appears in `news.json`.
///
/// # JSON Schema
///
/// The field names use camelCase to match the schema the front-end scripts
/// read. `importance` is always within `[30, 100]`; `pubDate` is ISO 8601.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Article {
    /// Stable identifier: first 8 bytes of SHA-256 of `link`, hex-encoded.
    pub id: String,
    /// Original headline.
    pub title: String,
    /// Japanese headline (LLM translation or dictionary fallback).
    pub titleJa: String,
    /// Original plain-text summary.
    pub summary: String,
    /// Japanese summary.
    pub summaryJa: String,
    /// Source display name.
    pub source: String,
    /// One of the 25 fixed category labels from [`crate::categorize`].
    pub category: String,
    /// Heuristic importance score in `[30, 100]`, used only for sort order.
    pub importance: u8,
    /// Publication date in ISO 8601 (UTC).
    pub pubDate: DateTime<Utc>,
    /// Canonical link to the article.
    pub link: String,
}

/// The top-level `news.json` document, rewritten wholesale each run.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize, Serialize)]
pub struct NewsFile {
    /// Timestamp of the run that produced this file, ISO 8601 (UTC).
    pub lastUpdated: DateTime<Utc>,
    /// Convenience count, always `articles.len()`.
    pub totalArticles: usize,
    /// Articles, sorted by (importance desc, pubDate desc).
    pub articles: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_article() -> Article {
        Article {
            id: "a1b2c3d4e5f60718".to_string(),
            title: "OpenAI releases new model".to_string(),
            titleJa: "OpenAI、新モデルをリリース".to_string(),
            summary: "A new model was released today.".to_string(),
            summaryJa: "本日、新しいモデルがリリースされました。".to_string(),
            source: "TechCrunch AI".to_string(),
            category: "OpenAI".to_string(),
            importance: 85,
            pubDate: Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap(),
            link: "https://example.com/openai-model".to_string(),
        }
    }

    #[test]
    fn test_article_serializes_camel_case() {
        let json = serde_json::to_string(&sample_article()).unwrap();
        assert!(json.contains("\"titleJa\""));
        assert!(json.contains("\"summaryJa\""));
        assert!(json.contains("\"pubDate\""));
        assert!(json.contains("2025-05-06T14:30:00Z"));
    }

    #[test]
    fn test_news_file_round_trip() {
        let file = NewsFile {
            lastUpdated: Utc.with_ymd_and_hms(2025, 5, 6, 15, 0, 0).unwrap(),
            totalArticles: 1,
            articles: vec![sample_article()],
        };

        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"lastUpdated\""));
        assert!(json.contains("\"totalArticles\":1"));

        let parsed: NewsFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.totalArticles, 1);
        assert_eq!(parsed.articles[0].importance, 85);
    }

    #[test]
    fn test_feed_source_from_yaml() {
        let yaml = r#"
name: ITmedia AI+
url: https://rss.itmedia.co.jp/rss/2.0/aiplus.xml
categories: [ai, japan]
"#;
        let feed: FeedSource = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(feed.name, "ITmedia AI+");
        assert_eq!(feed.categories, vec!["ai", "japan"]);
    }

    #[test]
    fn test_feed_source_categories_default_empty() {
        let yaml = "name: Example\nurl: https://example.com/feed\n";
        let feed: FeedSource = serde_yaml::from_str(yaml).unwrap();
        assert!(feed.categories.is_empty());
    }
}
