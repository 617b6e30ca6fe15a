//! The feed catalog: which RSS/Atom sources the pipeline polls.
//!
//! The built-in catalog covers AI vendor blogs, English tech press, Japanese
//! tech press, and a set of Google News search feeds for topics no single
//! publisher covers well. A YAML file passed via `--feeds` replaces the
//! catalog wholesale, so a deployment can trim or extend sources without a
//! rebuild.

use crate::models::FeedSource;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Build a Google News search feed URL for a query.
///
/// Results are restricted to Japanese-locale Google News so the queries
/// surface coverage from Japanese outlets as well.
fn google_news_feed(query: &str) -> String {
    format!(
        "https://news.google.com/rss/search?q={}&hl=ja&gl=JP&ceid=JP:ja",
        urlencoding::encode(query)
    )
}

/// The built-in feed catalog (~40 sources).
pub fn default_feeds() -> Vec<FeedSource> {
    let mut feeds = vec![
        // AI vendor blogs
        FeedSource::new("OpenAI Blog", "https://openai.com/blog/rss.xml", &["ai", "vendor"]),
        FeedSource::new("Google AI Blog", "https://blog.google/technology/ai/rss/", &["ai", "vendor"]),
        FeedSource::new("DeepMind Blog", "https://deepmind.google/blog/rss.xml", &["ai", "research"]),
        FeedSource::new("Anthropic News", "https://www.anthropic.com/news/rss.xml", &["ai", "vendor"]),
        FeedSource::new("Microsoft AI Blog", "https://blogs.microsoft.com/ai/feed/", &["ai", "vendor"]),
        FeedSource::new("Meta AI Blog", "https://ai.meta.com/blog/rss/", &["ai", "vendor"]),
        FeedSource::new("NVIDIA Blog", "https://blogs.nvidia.com/feed/", &["ai", "hardware"]),
        FeedSource::new("Hugging Face Blog", "https://huggingface.co/blog/feed.xml", &["ai", "open-source"]),
        FeedSource::new("Stability AI News", "https://stability.ai/news?format=rss", &["ai", "image"]),
        // English tech press
        FeedSource::new("TechCrunch AI", "https://techcrunch.com/category/artificial-intelligence/feed/", &["ai", "business"]),
        FeedSource::new("VentureBeat AI", "https://venturebeat.com/category/ai/feed/", &["ai", "business"]),
        FeedSource::new("The Verge AI", "https://www.theverge.com/rss/ai-artificial-intelligence/index.xml", &["ai", "tech"]),
        FeedSource::new("Ars Technica", "https://feeds.arstechnica.com/arstechnica/technology-lab", &["tech"]),
        FeedSource::new("Wired AI", "https://www.wired.com/feed/tag/ai/latest/rss", &["ai", "tech"]),
        FeedSource::new("MIT Technology Review", "https://www.technologyreview.com/feed/", &["ai", "research"]),
        FeedSource::new("The Register AI", "https://www.theregister.com/software/ai_ml/headlines.atom", &["ai", "tech"]),
        FeedSource::new("ZDNet AI", "https://www.zdnet.com/topic/artificial-intelligence/rss.xml", &["ai", "tech"]),
        FeedSource::new("AI News", "https://www.artificialintelligence-news.com/feed/", &["ai"]),
        FeedSource::new("MarkTechPost", "https://www.marktechpost.com/feed/", &["ai", "research"]),
        FeedSource::new("Machine Learning Mastery", "https://machinelearningmastery.com/feed/", &["ai", "education"]),
        // Research
        FeedSource::new("arXiv cs.AI", "https://rss.arxiv.org/rss/cs.AI", &["ai", "research"]),
        FeedSource::new("arXiv cs.CL", "https://rss.arxiv.org/rss/cs.CL", &["ai", "research"]),
        FeedSource::new("arXiv cs.LG", "https://rss.arxiv.org/rss/cs.LG", &["ai", "research"]),
        FeedSource::new("BAIR Blog", "https://bair.berkeley.edu/blog/feed.xml", &["ai", "research"]),
        // Japanese tech press
        FeedSource::new("ITmedia AI+", "https://rss.itmedia.co.jp/rss/2.0/aiplus.xml", &["ai", "japan"]),
        FeedSource::new("ITmedia NEWS", "https://rss.itmedia.co.jp/rss/2.0/news_bursts.xml", &["tech", "japan"]),
        FeedSource::new("ASCII.jp", "https://ascii.jp/rss.xml", &["tech", "japan"]),
        FeedSource::new("CNET Japan", "https://feeds.japan.cnet.com/rss/cnet/all.rdf", &["tech", "japan"]),
        FeedSource::new("ZDNet Japan", "https://feeds.japan.zdnet.com/rss/zdnet/all.rdf", &["tech", "japan"]),
        FeedSource::new("GIGAZINE", "https://gigazine.net/news/rss_2.0/", &["tech", "japan"]),
        FeedSource::new("Publickey", "https://www.publickey1.jp/atom.xml", &["tech", "japan"]),
        FeedSource::new("Ledge.ai", "https://ledge.ai/feed/", &["ai", "japan"]),
        FeedSource::new("AINOW", "https://ainow.ai/feed/", &["ai", "japan"]),
        FeedSource::new("AI-SCHOLAR", "https://ai-scholar.tech/feed", &["ai", "japan", "research"]),
        FeedSource::new("Impress Watch", "https://www.watch.impress.co.jp/data/rss/1.0/ipw/feed.rdf", &["tech", "japan"]),
    ];

    // Google News queries for stories the publisher feeds miss
    for (name, query) in [
        ("Google News: 生成AI", "生成AI"),
        ("Google News: 人工知能", "人工知能"),
        ("Google News: ChatGPT", "ChatGPT"),
        ("Google News: 大規模言語モデル", "大規模言語モデル LLM"),
        ("Google News: AI規制", "AI 規制 政策"),
        ("Google News: AIスタートアップ", "AI スタートアップ 資金調達"),
    ] {
        feeds.push(FeedSource::new(name, &google_news_feed(query), &["ai", "google-news"]));
    }

    feeds
}

/// YAML feed catalog file shape: a top-level `feeds:` list.
#[derive(Debug, serde::Deserialize)]
struct FeedCatalog {
    feeds: Vec<FeedSource>,
}

/// Load the feed catalog, preferring a YAML file when one was given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML. An
/// empty `feeds:` list is also an error: a run with zero feeds is always a
/// misconfiguration.
#[instrument(level = "info", skip_all, fields(path = ?path))]
pub async fn load_feeds(path: Option<&str>) -> Result<Vec<FeedSource>, Box<dyn Error>> {
    match path {
        None => {
            let feeds = default_feeds();
            info!(count = feeds.len(), "Using built-in feed catalog");
            Ok(feeds)
        }
        Some(p) => {
            let raw = fs::read_to_string(p).await?;
            let catalog: FeedCatalog = serde_yaml::from_str(&raw)?;
            if catalog.feeds.is_empty() {
                return Err("feed catalog file contains no feeds".into());
            }
            info!(count = catalog.feeds.len(), path = p, "Loaded feed catalog from file");
            Ok(catalog.feeds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_size() {
        let feeds = default_feeds();
        assert!(feeds.len() >= 40, "expected ~40 feeds, got {}", feeds.len());
    }

    #[test]
    fn test_default_catalog_urls_parse() {
        for feed in default_feeds() {
            assert!(
                url::Url::parse(&feed.url).is_ok(),
                "bad feed url for {}: {}",
                feed.name,
                feed.url
            );
        }
    }

    #[test]
    fn test_google_news_feed_encodes_query() {
        let url = google_news_feed("生成AI");
        assert!(url.starts_with("https://news.google.com/rss/search?q="));
        assert!(!url.contains("生成AI"), "query must be percent-encoded");
        assert!(url.ends_with("&hl=ja&gl=JP&ceid=JP:ja"));
    }

    #[test]
    fn test_catalog_from_yaml() {
        let yaml = r#"
feeds:
  - name: Example
    url: https://example.com/feed.xml
    categories: [ai]
  - name: Other
    url: https://other.example.com/rss
"#;
        let catalog: FeedCatalog = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(catalog.feeds.len(), 2);
        assert_eq!(catalog.feeds[0].name, "Example");
        assert!(catalog.feeds[1].categories.is_empty());
    }
}
