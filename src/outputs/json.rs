//! JSON output generation: the `news.json` the front-end reads.
//!
//! The writer owns the final ordering contract: articles sorted by
//! (importance desc, pubDate desc), truncated to the configured cap, wrapped
//! as `{lastUpdated, totalArticles, articles}`, and written via temp file +
//! rename so a crashed run never leaves a half-written file for the site to
//! serve.

use crate::models::{Article, NewsFile};
use chrono::Utc;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Sort by (importance desc, pubDate desc) and truncate to `max_articles`.
///
/// Exposed separately from the file write so the ordering contract is
/// testable without touching the filesystem.
pub fn sort_and_truncate(mut articles: Vec<Article>, max_articles: usize) -> Vec<Article> {
    articles.sort_by(|a, b| {
        b.importance
            .cmp(&a.importance)
            .then_with(|| b.pubDate.cmp(&a.pubDate))
    });
    articles.truncate(max_articles);
    articles
}

/// Write the final `news.json` into `output_dir`.
///
/// # Arguments
///
/// * `articles` - Processed articles, in any order
/// * `output_dir` - Directory for `news.json` (created if missing)
/// * `max_articles` - Cap after sorting (200 in production)
///
/// # Returns
///
/// The number of articles written, or an error if directory creation,
/// serialization, or the write fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir, max_articles))]
pub async fn write_news_file(
    articles: Vec<Article>,
    output_dir: &str,
    max_articles: usize,
) -> Result<usize, Box<dyn Error>> {
    let articles = sort_and_truncate(articles, max_articles);

    let news_file = NewsFile {
        lastUpdated: Utc::now(),
        totalArticles: articles.len(),
        articles,
    };
    let json = serde_json::to_string_pretty(&news_file)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(%output_dir, error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let final_path = format!("{}/news.json", output_dir.trim_end_matches('/'));
    let tmp_path = format!("{final_path}.tmp");

    info!(path = %final_path, "Writing news.json");
    fs::write(&tmp_path, json).await?;
    fs::rename(&tmp_path, &final_path).await?;
    info!(path = %final_path, count = news_file.totalArticles, "Wrote news.json");

    Ok(news_file.totalArticles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(id: &str, importance: u8, day: u32) -> Article {
        Article {
            id: id.to_string(),
            title: format!("story {id}"),
            titleJa: format!("記事 {id}"),
            summary: String::new(),
            summaryJa: String::new(),
            source: "Test".to_string(),
            category: "その他".to_string(),
            importance,
            pubDate: Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0).unwrap(),
            link: format!("https://example.com/{id}"),
        }
    }

    #[test]
    fn test_sorts_by_importance_then_date() {
        let out = sort_and_truncate(
            vec![
                article("old-high", 90, 1),
                article("low", 40, 6),
                article("new-high", 90, 6),
            ],
            200,
        );
        assert_eq!(out[0].id, "new-high");
        assert_eq!(out[1].id, "old-high");
        assert_eq!(out[2].id, "low");
    }

    #[test]
    fn test_truncates_after_sorting() {
        let out = sort_and_truncate(
            vec![article("a", 40, 1), article("b", 95, 1), article("c", 60, 1)],
            2,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "b");
        assert_eq!(out[1].id, "c");
    }

    #[tokio::test]
    async fn test_write_news_file_shape() {
        let dir = std::env::temp_dir().join("ai_news_wire_test_write");
        let dir = dir.to_str().unwrap().to_string();
        let _ = tokio::fs::remove_dir_all(&dir).await;

        let written = write_news_file(vec![article("a", 80, 5)], &dir, 200)
            .await
            .unwrap();
        assert_eq!(written, 1);

        let raw = tokio::fs::read_to_string(format!("{dir}/news.json"))
            .await
            .unwrap();
        let parsed: NewsFile = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.totalArticles, 1);
        assert_eq!(parsed.articles[0].id, "a");
        assert!(raw.contains("\"lastUpdated\""));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
