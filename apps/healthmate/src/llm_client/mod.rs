//! Gemini client: the only code that talks to the hosted model.
//!
//! Each call is a single round trip seeded with the nurse persona. Nothing is
//! retried, streamed or replayed from history.
//!
//! Model: gemini-1.5-pro (hardcoded, not configurable)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use prompts::{HEALTH_PERSONA, PERSONA_ACKNOWLEDGMENT};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// The model used for every chat call.
pub const MODEL: &str = "gemini-1.5-pro";
const TEMPERATURE: f32 = 0.7;
const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("No Gemini API key configured")]
    MissingCredential,

    #[error("Credential rejected (status {status}): {message}")]
    InvalidCredential { status: u16, message: String },

    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("Assistant error: {0}")]
    Assistant(String),
}

impl ChatError {
    /// Text shown to the user in the chat error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::MissingCredential => {
                "Please set your Gemini API key before starting a chat."
            }
            ChatError::InvalidCredential { .. } => {
                "Invalid API key. Please check your Gemini API key and try again."
            }
            ChatError::Connectivity(_) => {
                "Unable to connect to Gemini. Please check your internet connection and try again."
            }
            ChatError::Assistant(_) => {
                "An error occurred while chatting with the AI nurse. Please try again later."
            }
        }
    }
}

/// Anything that can answer a single health chat message.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, api_key: &str, message: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, MODEL)
    }

    async fn send(&self, api_key: &str, message: &str) -> Result<String, ChatError> {
        let request_body = GenerateContentRequest {
            contents: vec![
                Content {
                    role: "user",
                    parts: vec![Part {
                        text: HEALTH_PERSONA,
                    }],
                },
                Content {
                    role: "model",
                    parts: vec![Part {
                        text: PERSONA_ACKNOWLEDGMENT,
                    }],
                },
                Content {
                    role: "user",
                    parts: vec![Part { text: message }],
                },
            ],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(classify_status(status, message));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Assistant(format!("Malformed response: {e}")))?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed
            .text()
            .ok_or_else(|| ChatError::Assistant("Response contained no text".to_string()))
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn chat(&self, api_key: &str, message: &str) -> Result<String, ChatError> {
        if api_key.trim().is_empty() {
            return Err(ChatError::MissingCredential);
        }
        let result = self.send(api_key, message).await;
        if let Err(e) = &result {
            warn!("Error chatting with Gemini: {e}");
        }
        result
    }
}

/// Maps a non-success HTTP response onto the chat error taxonomy.
fn classify_status(status: StatusCode, message: String) -> ChatError {
    let mentions_key = message.to_ascii_lowercase().contains("api key");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatError::InvalidCredential {
            status: status.as_u16(),
            message,
        },
        StatusCode::BAD_REQUEST if mentions_key => ChatError::InvalidCredential {
            status: status.as_u16(),
            message,
        },
        StatusCode::NOT_FOUND => ChatError::Connectivity(format!("Endpoint not found: {message}")),
        _ => ChatError::Assistant(format!("status {}: {message}", status.as_u16())),
    }
}

// The URL is stripped so request details never reach logs.
fn classify_transport(e: reqwest::Error) -> ChatError {
    let e = e.without_url();
    if e.is_connect() {
        ChatError::Connectivity(e.to_string())
    } else {
        ChatError::Assistant(e.to_string())
    }
}
