//! Completion client. The single point of entry for text-completion calls.
//!
//! Talks to an OpenAI-compatible API with the user's own key (the key is never
//! stored server-side). One request per call: no retry, no streaming. Failures
//! surface as `LlmError` with the HTTP status and response body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 300;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Falha OpenAI: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("completion returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Key check outcome
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of checking an API key, collapsed to what the key banner shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCheck {
    /// No key was entered; nothing was sent.
    Missing,
    /// The models endpoint answered 2xx.
    Valid,
    /// The models endpoint answered anything else.
    Invalid,
    /// The request never got an answer.
    Error,
}

impl KeyCheck {
    pub fn message(&self) -> &'static str {
        match self {
            KeyCheck::Missing => "Por favor, insira a API Key.",
            KeyCheck::Valid => "API Key válida!",
            KeyCheck::Invalid => "API Key inválida.",
            KeyCheck::Error => "Erro ao validar a API Key.",
        }
    }

    /// Whether AI features should be enabled with this key.
    pub fn is_active(&self) -> bool {
        matches!(self, KeyCheck::Valid)
    }
}

/// Seam between the HTTP handlers and the completion provider.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn check_key(&self, api_key: &str) -> KeyCheck;

    async fn improve_summary(&self, api_key: &str, summary: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, trimmed. `None` when absent or blank.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    /// `GET /models` with the key: 2xx is valid, any other status invalid, and
    /// a transport failure is an error.
    async fn check_key(&self, api_key: &str) -> KeyCheck {
        if api_key.trim().is_empty() {
            return KeyCheck::Missing;
        }

        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(api_key.trim())
            .send()
            .await;

        match response {
            Ok(r) if r.status().is_success() => KeyCheck::Valid,
            Ok(r) => {
                debug!("API key rejected with status {}", r.status());
                KeyCheck::Invalid
            }
            Err(e) => {
                warn!("API key check failed: {e}");
                KeyCheck::Error
            }
        }
    }

    async fn improve_summary(&self, api_key: &str, summary: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::IMPROVE_SUMMARY_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: summary,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(api_key.trim())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Completion API returned {status}: {body}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let text = parsed.text().ok_or(LlmError::EmptyContent)?;

        debug!(
            "Summary improved: {} → {} chars",
            summary.chars().count(),
            text.chars().count()
        );

        Ok(text.to_string())
    }
}
