//! Utility functions for text cleanup, logging, identifiers, and file system checks.
//!
//! This module provides helper functions used throughout the pipeline:
//! - HTML stripping for feed summaries
//! - String truncation for logging
//! - JSON error detection for handling LLM response truncation
//! - Stable article identifiers
//! - File system validation for the output directory

use scraper::Html;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Strip HTML tags and entities from a feed summary.
///
/// RSS descriptions routinely carry markup (`<p>`, `<img>`, tracking pixels).
/// The fragment is parsed and only text nodes are kept, with whitespace
/// collapsed.
///
/// # Arguments
///
/// * `html` - The raw description HTML from the feed
///
/// # Returns
///
/// Plain text with single spaces between words.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte count
/// indicator appended. Truncation backs up to a character boundary so
/// multi-byte Japanese text never splits mid-character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while cut > 0 && !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// When the LLM response is cut off (e.g., due to token limits), the
/// resulting JSON fails to parse with an EOF error. This helps the
/// translation stage decide whether a single re-ask is worthwhile.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Derive a stable article identifier from its link.
///
/// First 8 bytes of SHA-256 over the link, hex-encoded. Stable across runs so
/// the front-end can keep favorites pointing at the same story.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(article_id("https://example.com/a").len(), 16);
/// ```
pub fn article_id(link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

/// Check whether text already contains Japanese script.
///
/// Used by the translation stage to pass Japanese-source articles through
/// untouched. Hiragana, katakana, and CJK unified ideographs all count.
pub fn contains_japanese(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{309f}'   // hiragana
            | '\u{30a0}'..='\u{30ff}' // katakana
            | '\u{4e00}'..='\u{9fff}' // CJK unified ideographs
        )
    })
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
