//! The translation stage: Japanese titles and summaries for every article.
//!
//! Two backends, tried in order:
//!
//! 1. **LLM** — when an API key is configured, the title and summary are sent
//!    to a chat-completions endpoint in one prompt that asks for a strict
//!    JSON reply. A truncated reply (EOF while parsing) is re-asked once.
//! 2. **Dictionary** — the regex substitution table in [`dictionary`], used
//!    when no key is configured or the API path fails.
//!
//! Text that is already Japanese passes through untouched, field by field.
//! The stage never drops an article: the dictionary path always produces
//! something.

pub mod api;
pub mod dictionary;

use crate::utils::{contains_japanese, looks_truncated, truncate_for_log};
use api::{chat_with_backoff, OpenAiClient};
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// A translated (title, summary) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub title_ja: String,
    pub summary_ja: String,
}

/// The JSON shape the LLM is asked to return.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
struct LlmTranslation {
    titleJa: String,
    summaryJa: String,
}

/// Translator with optional LLM backend.
pub struct Translator {
    llm: Option<OpenAiClient>,
}

impl Translator {
    /// Build a translator. With `api_key == None` every call takes the
    /// dictionary path.
    pub fn new(api_key: Option<String>, model: &str) -> Result<Self, Box<dyn Error>> {
        let llm = match api_key {
            Some(key) if !key.is_empty() => {
                info!(model, "LLM translation enabled");
                Some(OpenAiClient::new(key, model.to_string())?)
            }
            _ => {
                info!("No API key configured; using dictionary translation");
                None
            }
        };
        Ok(Self { llm })
    }

    /// Whether the LLM backend is configured.
    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Translate a title/summary pair. Never fails.
    #[instrument(level = "debug", skip_all, fields(title = %truncate_for_log(title, 60)))]
    pub async fn translate(&self, title: &str, summary: &str) -> Translation {
        // Japanese-source articles need no work at all
        if contains_japanese(title) && (summary.is_empty() || contains_japanese(summary)) {
            debug!("Already Japanese; passing through");
            return Translation {
                title_ja: title.to_string(),
                summary_ja: summary.to_string(),
            };
        }

        if let Some(client) = &self.llm {
            match llm_translate(client, title, summary).await {
                Ok(t) => return t,
                Err(e) => {
                    warn!(error = %e, "LLM translation failed; falling back to dictionary");
                }
            }
        }

        dictionary_translate(title, summary)
    }
}

/// Dictionary path, per field: already-Japanese fields pass through.
fn dictionary_translate(title: &str, summary: &str) -> Translation {
    let title_ja = if contains_japanese(title) {
        title.to_string()
    } else {
        dictionary::translate(title)
    };
    let summary_ja = if summary.is_empty() || contains_japanese(summary) {
        summary.to_string()
    } else {
        dictionary::translate(summary)
    };
    Translation { title_ja, summary_ja }
}

/// One LLM round trip, with a single re-ask when the reply looks truncated.
async fn llm_translate(
    client: &OpenAiClient,
    title: &str,
    summary: &str,
) -> Result<Translation, Box<dyn Error>> {
    let prompt = build_prompt(title, summary);
    let response = chat_with_backoff(client, &prompt).await?;

    let mut parsed = parse_llm_response(&response);

    // If the parse failed due to EOF (truncation), re-ask ONCE
    if let Err(ref e) = parsed {
        if looks_truncated(e) {
            warn!(error = %e, "EOF while parsing LLM reply; re-asking once");
            let second = chat_with_backoff(client, &prompt).await?;
            parsed = parse_llm_response(&second);
        }
    }

    match parsed {
        Ok(t) => Ok(Translation {
            title_ja: t.titleJa,
            summary_ja: t.summaryJa,
        }),
        Err(e) => {
            warn!(
                error = %e,
                response_preview = %truncate_for_log(&response, 300),
                "Model returned non-conforming JSON"
            );
            Err(Box::new(e))
        }
    }
}

fn build_prompt(title: &str, summary: &str) -> String {
    format!(
        "Translate this news headline and summary into natural Japanese. \
         Keep product and company names as-is. Reply with ONLY a JSON object \
         of the form {{\"titleJa\": \"...\", \"summaryJa\": \"...\"}} and \
         nothing else.\n\nTitle: {title}\nSummary: {summary}"
    )
}

/// Parse the model reply, tolerating Markdown code fences around the JSON.
fn parse_llm_response(response: &str) -> Result<LlmTranslation, serde_json::Error> {
    let trimmed = response.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);
    serde_json::from_str::<LlmTranslation>(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_japanese_article_passes_through() {
        let t = Translator::new(None, "gpt-4o-mini").unwrap();
        let out = t.translate("生成AIが普及", "国内での利用が進む。").await;
        assert_eq!(out.title_ja, "生成AIが普及");
        assert_eq!(out.summary_ja, "国内での利用が進む。");
    }

    #[tokio::test]
    async fn test_english_article_gets_dictionary_translation() {
        let t = Translator::new(None, "gpt-4o-mini").unwrap();
        let out = t
            .translate("OpenAI announces new model", "The company released an update.")
            .await;
        assert!(out.title_ja.contains("発表"));
        assert!(out.summary_ja.contains("アップデート"));
    }

    #[tokio::test]
    async fn test_mixed_fields_translate_independently() {
        // Japanese title, English summary: only the summary goes through the table
        let out = dictionary_translate("生成AIの新展開", "A new model was released.");
        assert_eq!(out.title_ja, "生成AIの新展開");
        assert!(out.summary_ja.contains("モデル"));
    }

    #[tokio::test]
    async fn test_empty_summary_survives() {
        let t = Translator::new(None, "gpt-4o-mini").unwrap();
        let out = t.translate("OpenAI ships something", "").await;
        assert!(!out.title_ja.is_empty());
        assert_eq!(out.summary_ja, "");
    }

    #[test]
    fn test_no_key_disables_llm() {
        assert!(!Translator::new(None, "m").unwrap().has_llm());
        assert!(!Translator::new(Some(String::new()), "m").unwrap().has_llm());
        assert!(Translator::new(Some("sk-test".to_string()), "m").unwrap().has_llm());
    }

    #[test]
    fn test_parse_llm_response_plain_json() {
        let out = parse_llm_response(r#"{"titleJa": "見出し", "summaryJa": "要約"}"#).unwrap();
        assert_eq!(out.titleJa, "見出し");
        assert_eq!(out.summaryJa, "要約");
    }

    #[test]
    fn test_parse_llm_response_fenced_json() {
        let fenced = "```json\n{\"titleJa\": \"見出し\", \"summaryJa\": \"要約\"}\n```";
        let out = parse_llm_response(fenced).unwrap();
        assert_eq!(out.titleJa, "見出し");
    }

    #[test]
    fn test_parse_llm_response_truncated_is_eof() {
        let err = parse_llm_response(r#"{"titleJa": "見出し"#).unwrap_err();
        assert!(looks_truncated(&err));
    }

    #[test]
    fn test_prompt_contains_both_fields() {
        let p = build_prompt("Title here", "Summary here");
        assert!(p.contains("Title here"));
        assert!(p.contains("Summary here"));
        assert!(p.contains("titleJa"));
    }
}
