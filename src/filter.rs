//! Keyword filtering: keep only AI-related articles.
//!
//! An article survives the filter when its title, summary, or feed categories
//! contain any term from a static AI vocabulary (English and Japanese).
//! Matching is case-insensitive substring matching, except for short
//! ambiguous tokens ("AI", "ML", "LLM") which match on word boundaries so
//! "maintain" or "html" never sneak through.

use crate::models::RawArticle;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

/// Longer vocabulary terms, matched as case-insensitive substrings.
const KEYWORDS: &[&str] = &[
    // English
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "neural network",
    "large language model",
    "foundation model",
    "generative",
    "chatgpt",
    "gpt-4",
    "gpt-5",
    "openai",
    "anthropic",
    "claude",
    "gemini",
    "deepmind",
    "copilot",
    "hugging face",
    "stable diffusion",
    "midjourney",
    "transformer",
    "diffusion model",
    "reinforcement learning",
    "computer vision",
    "speech recognition",
    "text-to-image",
    "text-to-video",
    "autonomous driving",
    "self-driving",
    // Japanese
    "人工知能",
    "生成AI",
    "生成系AI",
    "機械学習",
    "深層学習",
    "ディープラーニング",
    "ニューラルネットワーク",
    "大規模言語モデル",
    "チャットボット",
    "画像生成",
    "動画生成",
    "音声認識",
    "音声合成",
    "自動運転",
    "基盤モデル",
    "対話型AI",
];

/// Short tokens that need boundaries to avoid false positives. A plain `\b`
/// would fail against Japanese text ("がAIを" has no word boundary around
/// "AI" since kana and kanji are word characters), so the boundary is
/// "not an ASCII letter or digit" instead.
static SHORT_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])(ai|ml|llm|agi|rag)(?:[^a-z0-9]|$)").unwrap()
});

/// Does this text mention AI at all?
fn matches_vocabulary(text: &str) -> bool {
    let lower = text.to_lowercase();
    if KEYWORDS.iter().any(|k| lower.contains(&k.to_lowercase())) {
        return true;
    }
    SHORT_TOKENS.is_match(text)
}

/// Check a single article against the vocabulary.
pub fn is_ai_related(article: &RawArticle) -> bool {
    matches_vocabulary(&article.title)
        || matches_vocabulary(&article.summary)
        || article.categories.iter().any(|c| matches_vocabulary(c))
}

/// Filter a batch, logging how many were dropped.
#[instrument(level = "info", skip_all, fields(input = articles.len()))]
pub fn filter_ai_articles(articles: Vec<RawArticle>) -> Vec<RawArticle> {
    let before = articles.len();
    let kept: Vec<RawArticle> = articles
        .into_iter()
        .filter(|a| {
            let keep = is_ai_related(a);
            if !keep {
                debug!(title = %a.title, "Filtered out non-AI article");
            }
            keep
        })
        .collect();
    info!(kept = kept.len(), dropped = before - kept.len(), "Keyword filter applied");
    kept
}
