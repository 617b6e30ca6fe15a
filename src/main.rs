//! # AI News Wire
//!
//! The batch pipeline behind a Japanese-language AI news site. Each run polls
//! ~40 RSS/Atom feeds, keeps the AI-related articles, categorizes and scores
//! them, translates titles and summaries to Japanese (LLM when a key is
//! configured, dictionary substitution otherwise), removes near-duplicate
//! stories, and writes the top 200 to `data/news.json`.
//!
//! ## Usage
//!
//! ```sh
//! ai_news_wire -o data
//! ```
//!
//! ## Architecture
//!
//! A linear batch pipeline, stage by stage:
//! 1. **Fetch**: all feeds concurrently (8 at a time), 3 attempts each with
//!    backoff; a failed feed is skipped, never fatal
//! 2. **Filter**: static AI vocabulary, English + Japanese
//! 3. **Categorize + Score**: ordered rules, additive heuristic in [30, 100]
//! 4. **Translate**: parallel (12 at a time) on the LLM path
//! 5. **Dedupe**: normalized Levenshtein over titles, >0.8 is a duplicate
//! 6. **Write**: sort by (importance desc, date desc), truncate, news.json

use chrono::Utc;
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod categorize;
mod cli;
mod dedupe;
mod feeds;
mod fetch;
mod filter;
mod models;
mod outputs;
mod score;
mod translate;
mod utils;

use cli::Cli;
use models::Article;
use translate::Translator;
use utils::{article_id, ensure_writable_dir};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news pipeline starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.feeds, args.max_articles, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable before spending minutes fetching
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Fetch ----
    let feed_list = feeds::load_feeds(args.feeds.as_deref()).await?;
    let client = fetch::FeedClient::new()?;
    let raw_articles = client.fetch_all(&feed_list, args.fetch_concurrency).await;
    info!(count = raw_articles.len(), feeds = feed_list.len(), "Fetch stage complete");

    // ---- Filter ----
    let ai_articles = filter::filter_ai_articles(raw_articles);

    // ---- Categorize + score ----
    let now = Utc::now();
    let scored: Vec<(models::RawArticle, String, u8)> = ai_articles
        .into_iter()
        .map(|raw| {
            let category = categorize::categorize(&raw);
            let importance = score::importance(&raw, now);
            (raw, category, importance)
        })
        .collect();
    info!(count = scored.len(), "Categorize/score stage complete");

    // ---- Translate (parallel on the LLM path) ----
    let translator = Arc::new(Translator::new(args.openai_api_key.clone(), &args.model)?);
    let translate_width = if translator.has_llm() {
        args.translate_concurrency.max(1)
    } else {
        // dictionary path is pure CPU; no point fanning out
        1
    };
    info!(llm = translator.has_llm(), width = translate_width, "Starting translation stage");

    let articles: Vec<Article> = stream::iter(scored)
        .map(|(raw, category, importance)| {
            let translator = Arc::clone(&translator);
            async move {
                let translation = translator.translate(&raw.title, &raw.summary).await;
                Article {
                    id: article_id(&raw.link),
                    title: raw.title,
                    titleJa: translation.title_ja,
                    summary: raw.summary,
                    summaryJa: translation.summary_ja,
                    source: raw.source,
                    category,
                    importance,
                    pubDate: raw.pub_date.unwrap_or(now),
                    link: raw.link,
                }
            }
        })
        .buffer_unordered(translate_width)
        .collect()
        .await;
    info!(count = articles.len(), "Translation stage complete");

    // ---- Dedupe ----
    // Order by importance first so dedupe keeps the better-scored duplicate
    let articles = outputs::json::sort_and_truncate(articles, usize::MAX);
    let articles = dedupe::dedupe(articles);

    // ---- Write ----
    let written = outputs::json::write_news_file(articles, &args.output_dir, args.max_articles).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = written,
        "Execution complete"
    );

    Ok(())
}
