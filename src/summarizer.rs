//! Optional summarizer service client.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. The service is
//! opaque text-in/text-out; when no `[summarizer]` table is configured the
//! call path is disabled entirely.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::SummarizerConfig;
use crate::{AppError, Result};

const SUMMARY_PROMPT: &str = "Summarize the following support thread in a few \
sentences, focusing on the request, the resolution, and any follow-ups:";

/// Summarization seam consumed by the side-effect coordinator.
#[async_trait]
pub trait Summarize: Send + Sync {
    /// Produce a short summary of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Summarizer`] if the service call fails.
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Production summarizer over an OpenAI-compatible HTTP API.
pub struct SummarizerClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl SummarizerClient {
    /// Build a client from validated configuration.
    #[must_use]
    pub fn new(config: &SummarizerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl Summarize for SummarizerClient {
    async fn summarize(&self, text: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": format!("{SUMMARY_PROMPT}\n\n{text}"),
            }],
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| AppError::Summarizer(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Summarizer(format!("service returned {status}")));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| AppError::Summarizer(format!("invalid response: {err}")))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
