//! Heuristic importance scoring.
//!
//! The score is an additive heuristic used only for sort order on the site:
//! a base score, a recency bonus, keyword bonuses, and penalties, clamped to
//! `[30, 100]`. `now` is passed in rather than read from the clock so the
//! function stays deterministic for tests.

use crate::models::RawArticle;
use chrono::{DateTime, Utc};

/// Score floor and ceiling; the front-end renders the number directly.
pub const MIN_SCORE: i32 = 30;
pub const MAX_SCORE: i32 = 100;

const BASE_SCORE: i32 = 50;

/// Major vendors whose announcements reliably draw readers.
const MAJOR_VENDORS: &[&str] = &[
    "openai", "google", "deepmind", "anthropic", "meta", "microsoft", "nvidia", "apple", "amazon",
];

/// Release/announcement language.
const ANNOUNCEMENT_TERMS: &[&str] = &[
    "release", "releases", "launch", "launches", "announce", "announces", "unveil", "unveils",
    "発表", "リリース", "公開", "提供開始",
];

/// Breaking-news language.
const BREAKING_TERMS: &[&str] = &["breaking", "速報", "緊急"];

/// Research signals.
const RESEARCH_TERMS: &[&str] = &["research", "paper", "arxiv", "benchmark", "研究", "論文"];

/// Money signals.
const FUNDING_TERMS: &[&str] = &[
    "funding", "raises", "billion", "acquisition", "ipo", "資金調達", "買収", "上場",
];

/// Weak-signal language that drags a story down.
const RUMOR_TERMS: &[&str] = &["rumor", "rumour", "reportedly", "噂", "うわさ", "とみられる"];
const OPINION_TERMS: &[&str] = &["opinion", "op-ed", "column", "コラム", "オピニオン", "私見"];

/// Compute the importance score for an article.
///
/// # Score Composition
///
/// - Base: 50
/// - Recency: +20 within 24h, +10 within 48h, +5 within 72h, -10 past 7 days
///   (undated articles get no recency adjustment)
/// - Breaking-news terms: +15
/// - Announcement terms: +10
/// - Major vendor named: +8
/// - Research terms: +5
/// - Funding terms: +5
/// - Rumor terms: -10; opinion terms: -5
///
/// The sum is clamped to `[30, 100]`.
pub fn importance(article: &RawArticle, now: DateTime<Utc>) -> u8 {
    let mut score = BASE_SCORE;
    score += recency_bonus(article.pub_date, now);

    let haystack = format!("{} {}", article.title, article.summary).to_lowercase();
    let contains_any = |terms: &[&str]| terms.iter().any(|t| haystack.contains(t));

    if contains_any(BREAKING_TERMS) {
        score += 15;
    }
    if contains_any(ANNOUNCEMENT_TERMS) {
        score += 10;
    }
    if contains_any(MAJOR_VENDORS) {
        score += 8;
    }
    if contains_any(RESEARCH_TERMS) {
        score += 5;
    }
    if contains_any(FUNDING_TERMS) {
        score += 5;
    }
    if contains_any(RUMOR_TERMS) {
        score -= 10;
    }
    if contains_any(OPINION_TERMS) {
        score -= 5;
    }

    score.clamp(MIN_SCORE, MAX_SCORE) as u8
}

fn recency_bonus(pub_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i32 {
    let Some(date) = pub_date else { return 0 };
    let hours = (now - date).num_hours();
    if hours <= 24 {
        20
    } else if hours <= 48 {
        10
    } else if hours <= 72 {
        5
    } else if hours > 24 * 7 {
        -10
    } else {
        0
    }
}
