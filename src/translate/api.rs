//! OpenAI-compatible chat API client with exponential backoff retry logic.
//!
//! The translation stage talks to a chat-completions endpoint. The module
//! keeps the retry concern separate from the transport via a trait-based
//! design:
//! - [`ChatAsync`]: core trait for one prompt/response exchange
//! - [`OpenAiClient`]: reqwest-backed chat-completions implementation
//! - [`RetryChat`]: decorator adding retry logic to any [`ChatAsync`]
//!
//! # Retry Strategy
//!
//! - Maximum 5 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{rng, Rng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Trait for one async chat exchange: prompt in, assistant text out.
pub trait ChatAsync {
    async fn chat(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

/// Chat-completions request/response wire shapes.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// reqwest-backed client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client for the given key and model.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: String, model: String) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl ChatAsync for OpenAiClient {
    #[instrument(level = "info", skip_all)]
    async fn chat(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.2,
        };

        let t0 = Instant::now();
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                elapsed_ms = t0.elapsed().as_millis() as u128,
                %status,
                body = %crate::utils::truncate_for_log(&body, 200),
                "Chat API returned an error status"
            );
            return Err(format!("chat API returned {status}").into());
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or("chat API response contained no choices")?;
        Ok(content)
    }
}

/// Decorator that adds exponential backoff retry logic to any [`ChatAsync`].
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryChat<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryChat<T>
where
    T: ChatAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryChat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryChat")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> ChatAsync for RetryChat<T>
where
    T: ChatAsync,
{
    #[instrument(level = "info", skip_all)]
    async fn chat(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.chat(prompt).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u128,
                            error = %e,
                            "chat() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "chat() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Send a prompt with exponential backoff retry logic.
///
/// The primary entry point for the translation stage: up to 5 retries,
/// 1s/2s/4s/8s/16s backoff capped at 30s, with jitter.
#[instrument(level = "info", skip_all)]
pub async fn chat_with_backoff(client: &OpenAiClient, prompt: &str) -> Result<String, Box<dyn Error>> {
    let t0 = Instant::now();
    let api = RetryChat::new(client.clone(), 5, StdDuration::from_secs(1));
    let res = api.chat(prompt).await;
    let dt = t0.elapsed();

    match &res {
        Ok(_) => info!(elapsed_ms_total = dt.as_millis() as u128, "chat_with_backoff succeeded"),
        Err(e) => {
            error!(elapsed_ms_total = dt.as_millis() as u128, error = %e, "chat_with_backoff failed")
        }
    }
    res
}
