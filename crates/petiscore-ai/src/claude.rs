//! Claude-backed petition scorer.
//!
//! One Messages API call per petition: the fixed rubric prompt with the
//! document text truncated to [`PROMPT_TEXT_BUDGET`] chars. The model is
//! instructed to answer with bare JSON but routinely wraps it in a fenced
//! code block, which is stripped before parsing.

use std::time::Duration;

use async_trait::async_trait;
use petiscore_core::Evaluation;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prompt::render_prompt;
use crate::scorer::{ScoreError, Scorer};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Max petition chars embedded in the prompt; longer texts are cut on a
/// char boundary.
pub const PROMPT_TEXT_BUDGET: usize = 15_000;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.3;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Scorer backed by the Anthropic Messages API.
pub struct ClaudeScorer {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ClaudeScorer {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    async fn request_evaluation(&self, text: &str) -> Result<Evaluation, ScoreError> {
        let prompt = render_prompt(truncate_chars(text, PROMPT_TEXT_BUDGET));

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ScoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response: MessagesResponse = resp.json().await?;
        let reply = response
            .content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default();
        if reply.trim().is_empty() {
            return Err(ScoreError::EmptyResponse);
        }

        debug!(model = %self.model, reply_len = reply.len(), "model reply received");
        parse_evaluation(reply)
    }
}

#[async_trait]
impl Scorer for ClaudeScorer {
    fn method(&self) -> &'static str {
        "claude"
    }

    fn pause(&self) -> Duration {
        Duration::from_secs(2)
    }

    async fn evaluate(&self, text: &str) -> Result<Evaluation, ScoreError> {
        self.request_evaluation(text).await
    }
}

/// Parse the model's reply into a typed [`Evaluation`].
///
/// A missing field or wrong type is a malformed response for this record
/// only; the caller logs it and moves on.
pub(crate) fn parse_evaluation(reply: &str) -> Result<Evaluation, ScoreError> {
    let json = strip_code_fence(reply);
    serde_json::from_str(json).map_err(|e| ScoreError::MalformedResponse {
        reason: e.to_string(),
    })
}

/// Strip an optional ``` fence (with or without a `json` tag) around the
/// reply body.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start();
    match rest.find("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}

/// Cut `text` to at most `budget` chars, on a char boundary.
fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
