use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skald_deck::SlideRecord;
use tracing::debug;

use crate::capability::{SlideCapability, SlideRequest};
use crate::error::CapabilityError;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
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

// ── Adapter ──────────────────────────────────────────────────────────

/// Generation capability backed by the Anthropic Messages API.
#[derive(Debug)]
pub struct ClaudeCapability {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ClaudeCapability {
    /// Build from the environment. Fails with `Unavailable` when the
    /// credential is missing — callers check this before the pipeline
    /// starts and route to the fallback renderer.
    pub fn from_env(model: Option<&str>) -> Result<Self, CapabilityError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            CapabilityError::Unavailable(format!("{API_KEY_ENV} is not set"))
        })?;
        Ok(ClaudeCapability {
            client: reqwest::Client::new(),
            api_key,
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }
}

#[async_trait]
impl SlideCapability for ClaudeCapability {
    async fn generate(&self, request: &SlideRequest) -> Result<SlideRecord, CapabilityError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        debug!(model = %self.model, "sending generation request");
        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CapabilityError::Call(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Call(format!(
                "API returned {status}: {body}"
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::Call(format!("unreadable response: {e}")))?;
        let text = parsed
            .content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or("");

        parse_slide_response(text)
    }
}

/// Coerce the capability's text output into a `SlideRecord`. The response
/// must contain exactly one JSON object; anything else is a schema error
/// for the orchestrator's retry logic — no partial recovery here.
pub fn parse_slide_response(text: &str) -> Result<SlideRecord, CapabilityError> {
    let stripped = strip_code_fences(text);
    let start = stripped
        .find('{')
        .ok_or_else(|| CapabilityError::Schema("no JSON object in response".into()))?;
    let end = stripped
        .rfind('}')
        .ok_or_else(|| CapabilityError::Schema("unterminated JSON object".into()))?;
    if end < start {
        return Err(CapabilityError::Schema("unterminated JSON object".into()));
    }
    serde_json::from_str(&stripped[start..=end])
        .map_err(|e| CapabilityError::Schema(e.to_string()))
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") and the closing fence
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
