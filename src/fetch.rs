//! Feed fetching with timeout, retry, and per-feed failure isolation.
//!
//! Each configured feed is fetched over HTTP with a per-request timeout and
//! up to 3 attempts with exponential backoff and jitter. A feed that still
//! fails after retries is logged and skipped; one dead publisher never fails
//! the run. Feeds are fetched concurrently in a fixed-size batch.
//!
//! # Retry Strategy
//!
//! - Maximum 3 attempts per feed
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 10 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd
//!
//! Both RSS 2.0 and Atom parse; publication dates are tried as RFC 2822,
//! then RFC 3339, then a bare `YYYY-MM-DD HH:MM:SS`. Items older than
//! [`MAX_AGE_DAYS`] are dropped at ingestion.

use crate::models::{FeedSource, RawArticle};
use crate::utils::strip_html;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use rand::{rng, Rng};
use reqwest::Client;
use std::error::Error;
use std::time::Duration as StdDuration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Items older than this many days are dropped at ingestion.
pub const MAX_AGE_DAYS: i64 = 7;

/// Per-request timeout for feed fetches.
const FETCH_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Maximum fetch attempts per feed.
const MAX_ATTEMPTS: usize = 3;

/// Initial backoff delay; doubles per attempt, capped at [`MAX_BACKOFF`].
const BASE_BACKOFF: StdDuration = StdDuration::from_secs(1);
const MAX_BACKOFF: StdDuration = StdDuration::from_secs(10);

/// HTTP client for feed fetching.
///
/// Wraps a shared [`reqwest::Client`] configured with the fetch timeout and a
/// browser-ish User-Agent (several Japanese publishers reject the default).
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Build a feed client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("ai_news_wire/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch every feed concurrently, `concurrency` at a time.
    ///
    /// Failed feeds are logged and contribute zero articles. The result is
    /// the flattened list of raw articles across all feeds.
    #[instrument(level = "info", skip_all, fields(feeds = feeds.len(), concurrency))]
    pub async fn fetch_all(&self, feeds: &[FeedSource], concurrency: usize) -> Vec<RawArticle> {
        let results: Vec<Vec<RawArticle>> = stream::iter(feeds.iter())
            .map(|feed| {
                let client = self.clone();
                async move {
                    match client.fetch_feed_with_retry(feed).await {
                        Ok(articles) => {
                            info!(feed = %feed.name, count = articles.len(), "Fetched feed");
                            articles
                        }
                        Err(e) => {
                            warn!(feed = %feed.name, url = %feed.url, error = %e, "Feed failed after retries; skipping");
                            Vec::new()
                        }
                    }
                }
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let articles: Vec<RawArticle> = results.into_iter().flatten().collect();
        info!(count = articles.len(), "Fetched all feeds");
        articles
    }

    /// Fetch a single feed with exponential backoff.
    #[instrument(level = "debug", skip_all, fields(feed = %feed.name))]
    async fn fetch_feed_with_retry(&self, feed: &FeedSource) -> Result<Vec<RawArticle>, Box<dyn Error>> {
        let mut attempt = 0usize;
        loop {
            match self.fetch_feed_once(feed).await {
                Ok(articles) => return Ok(articles),
                Err(e) => {
                    attempt += 1;
                    if attempt >= MAX_ATTEMPTS {
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = BASE_BACKOFF.saturating_mul(1 << (attempt - 1));
                    if delay > MAX_BACKOFF {
                        delay = MAX_BACKOFF;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        feed = %feed.name,
                        attempt,
                        max = MAX_ATTEMPTS,
                        ?delay,
                        error = %e,
                        "Feed fetch failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    /// One fetch attempt: HTTP GET, then RSS/Atom parse.
    async fn fetch_feed_once(&self, feed: &FeedSource) -> Result<Vec<RawArticle>, Box<dyn Error>> {
        let response = self.client.get(&feed.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {} from {}", status, feed.url).into());
        }
        let bytes = response.bytes().await?;
        parse_feed(&bytes, feed, Utc::now())
    }
}

/// Parse feed bytes as RSS 2.0, falling back to Atom.
///
/// `now` is the ingestion timestamp used for the age cutoff; passing it in
/// keeps the function deterministic for tests.
pub fn parse_feed(
    bytes: &[u8],
    feed: &FeedSource,
    now: DateTime<Utc>,
) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    if let Ok(channel) = rss::Channel::read_from(bytes) {
        debug!(feed = %feed.name, items = channel.items().len(), "Parsed RSS channel");
        return Ok(rss_items(&channel, feed, now));
    }

    if let Ok(atom) = atom_syndication::Feed::read_from(bytes) {
        debug!(feed = %feed.name, entries = atom.entries().len(), "Parsed Atom feed");
        return Ok(atom_entries(&atom, feed, now));
    }

    Err(format!("not a parseable RSS or Atom document: {}", feed.url).into())
}

fn rss_items(channel: &rss::Channel, feed: &FeedSource, now: DateTime<Utc>) -> Vec<RawArticle> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.trim().to_string();
            let link = item.link()?.trim().to_string();
            if title.is_empty() || link.is_empty() {
                return None;
            }

            let pub_date = item.pub_date().and_then(parse_date);
            if too_old(pub_date, now) {
                return None;
            }

            let mut categories: Vec<String> = feed.categories.clone();
            categories.extend(item.categories().iter().map(|c| c.name().to_string()));

            Some(RawArticle {
                title,
                link,
                summary: strip_html(item.description().unwrap_or_default()),
                source: feed.name.clone(),
                categories,
                pub_date,
            })
        })
        .collect()
}

fn atom_entries(
    atom: &atom_syndication::Feed,
    feed: &FeedSource,
    now: DateTime<Utc>,
) -> Vec<RawArticle> {
    atom.entries()
        .iter()
        .filter_map(|entry| {
            let title = entry.title().trim().to_string();
            let link = entry.links().first()?.href().trim().to_string();
            if title.is_empty() || link.is_empty() {
                return None;
            }

            let pub_date = entry
                .published()
                .or_else(|| Some(entry.updated()))
                .map(|d| d.with_timezone(&Utc));
            if too_old(pub_date, now) {
                return None;
            }

            let mut categories: Vec<String> = feed.categories.clone();
            categories.extend(entry.categories().iter().map(|c| c.term().to_string()));

            let summary_html = entry
                .summary()
                .map(|s| s.as_str().to_string())
                .or_else(|| entry.content().and_then(|c| c.value()).map(|v| v.to_string()))
                .unwrap_or_default();

            Some(RawArticle {
                title,
                link,
                summary: strip_html(&summary_html),
                source: feed.name.clone(),
                categories,
                pub_date,
            })
        })
        .collect()
}

/// Parse an RSS date string, trying RFC 2822, RFC 3339, then a bare
/// `YYYY-MM-DD HH:MM:SS`.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        })
}

fn too_old(pub_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match pub_date {
        Some(d) => (now - d).num_days() > MAX_AGE_DAYS,
        // undated items are kept; the writer substitutes fetch time
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_feed() -> FeedSource {
        FeedSource::new("Test Feed", "https://example.com/rss", &["ai"])
    }

    fn rss_fixture(pub_date: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com</link>
    <description>fixture</description>
    <item>
      <title>OpenAI ships a new model</title>
      <link>https://example.com/a</link>
      <description>&lt;p&gt;Big &lt;b&gt;news&lt;/b&gt; today.&lt;/p&gt;</description>
      <pubDate>{pub_date}</pubDate>
      <category>machine-learning</category>
    </item>
  </channel>
</rss>"#
        )
    }

    #[test]
    fn test_parse_rss_item() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap();
        let xml = rss_fixture("Tue, 06 May 2025 09:00:00 GMT");
        let articles = parse_feed(xml.as_bytes(), &test_feed(), now).unwrap();

        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.title, "OpenAI ships a new model");
        assert_eq!(a.link, "https://example.com/a");
        assert_eq!(a.summary, "Big news today.");
        assert_eq!(a.source, "Test Feed");
        assert!(a.categories.contains(&"ai".to_string()));
        assert!(a.categories.contains(&"machine-learning".to_string()));
        assert_eq!(
            a.pub_date,
            Some(Utc.with_ymd_and_hms(2025, 5, 6, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_rss_drops_stale_items() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap();
        let xml = rss_fixture("Tue, 01 Apr 2025 09:00:00 GMT");
        let articles = parse_feed(xml.as_bytes(), &test_feed(), now).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_parse_atom_entry() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap();
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Fixture</title>
  <id>urn:uuid:fixture</id>
  <updated>2025-05-06T10:00:00Z</updated>
  <entry>
    <title>生成AIの新発表</title>
    <id>urn:uuid:entry-1</id>
    <link href="https://example.jp/b"/>
    <updated>2025-05-06T10:00:00Z</updated>
    <summary>国内ベンダーが発表した。</summary>
    <category term="生成AI"/>
  </entry>
</feed>"#;
        let articles = parse_feed(xml.as_bytes(), &test_feed(), now).unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "生成AIの新発表");
        assert_eq!(articles[0].link, "https://example.jp/b");
        assert!(articles[0].categories.contains(&"生成AI".to_string()));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let now = Utc::now();
        assert!(parse_feed(b"this is not xml", &test_feed(), now).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("Tue, 06 May 2025 09:00:00 GMT").is_some());
        assert!(parse_date("2025-05-06T09:00:00+09:00").is_some());
        assert!(parse_date("2025-05-06 09:00:00").is_some());
        assert!(parse_date("sometime last week").is_none());
    }

    #[test]
    fn test_undated_items_are_kept() {
        let now = Utc::now();
        assert!(!too_old(None, now));
    }
}
