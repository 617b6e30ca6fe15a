//! Near-duplicate removal over article titles.
//!
//! The same story arrives from multiple feeds with minor headline edits, so
//! exact matching is not enough. Titles are compared pairwise with normalized
//! Levenshtein similarity; above [`SIMILARITY_THRESHOLD`] the pair counts as
//! one story and the higher-importance article survives. Input is expected to
//! be sorted by importance descending, which makes "keep the first seen"
//! equivalent to "keep the most important".
//!
//! Comparison uses the original (untranslated) titles, case-folded, so the
//! translation stage cannot affect duplicate detection.

use crate::models::Article;
use strsim::normalized_levenshtein;
use tracing::{debug, info, instrument};

/// Similarity above this is treated as the same story.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Are two titles near-duplicates?
pub fn is_duplicate(a: &str, b: &str) -> bool {
    normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) > SIMILARITY_THRESHOLD
}

/// Remove near-duplicate articles, keeping the first occurrence.
///
/// Pairwise comparison against the kept list; O(n²) but n is at most a few
/// hundred after filtering.
#[instrument(level = "info", skip_all, fields(input = articles.len()))]
pub fn dedupe(articles: Vec<Article>) -> Vec<Article> {
    let before = articles.len();
    let mut kept: Vec<Article> = Vec::with_capacity(articles.len());

    for article in articles {
        match kept.iter().find(|k| is_duplicate(&k.title, &article.title)) {
            Some(existing) => {
                debug!(
                    dropped = %article.title,
                    kept = %existing.title,
                    "Near-duplicate removed"
                );
            }
            None => kept.push(article),
        }
    }

    info!(kept = kept.len(), removed = before - kept.len(), "Deduplication complete");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(title: &str, importance: u8) -> Article {
        Article {
            id: crate::utils::article_id(title),
            title: title.to_string(),
            titleJa: String::new(),
            summary: String::new(),
            summaryJa: String::new(),
            source: "Test".to_string(),
            category: "その他".to_string(),
            importance,
            pubDate: Utc::now(),
            link: format!("https://example.com/{}", importance),
        }
    }

    #[test]
    fn test_identical_titles_are_duplicates() {
        assert!(is_duplicate("OpenAI releases GPT-5", "OpenAI releases GPT-5"));
    }

    #[test]
    fn test_minor_edit_is_duplicate() {
        assert!(is_duplicate(
            "OpenAI releases GPT-5 model today",
            "OpenAI releases GPT-5 model"
        ));
    }

    #[test]
    fn test_case_difference_is_duplicate() {
        assert!(is_duplicate("OpenAI Releases GPT-5", "openai releases gpt-5"));
    }

    #[test]
    fn test_different_stories_are_not_duplicates() {
        assert!(!is_duplicate(
            "OpenAI releases GPT-5",
            "Anthropic publishes interpretability research"
        ));
    }

    #[test]
    fn test_dedupe_keeps_higher_importance() {
        // sorted by importance desc, as the pipeline guarantees
        let input = vec![
            article("OpenAI releases GPT-5 model", 90),
            article("Meta open-sources new Llama weights", 75),
            article("OpenAI releases GPT-5 model today", 70),
        ];
        let out = dedupe(input);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].importance, 90);
        assert!(out.iter().all(|a| a.importance != 70));
    }

    #[test]
    fn test_dedupe_empty_input() {
        assert!(dedupe(vec![]).is_empty());
    }

    #[test]
    fn test_japanese_titles() {
        assert!(is_duplicate("OpenAIが新モデルを発表", "OpenAIが新モデルを発表した"));
        assert!(!is_duplicate("OpenAIが新モデルを発表", "国会でAI規制法案を審議"));
    }
}
