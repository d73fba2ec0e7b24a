//! OpenAI Responses API client
//!
//! Both pipeline steps go through the [`ResponsesApi`] trait so the pipeline
//! can run against a scripted fake in tests. [`OpenAIClient`] is the real
//! implementation: one POST to `{base_url}/responses` per call, no retries.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{coerce, Source};

const USER_AGENT: &str = concat!("unhyped-api/", env!("CARGO_PKG_VERSION"));

/// Upstream client errors
#[derive(Debug, Error)]
pub enum OpenAIError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One piece of user content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    InputText { text: String },
    InputImage { image_url: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::InputText { text: text.into() }
    }

    /// Inline image as a `data:` URL
    pub fn image(mime_type: &str, base64: &str) -> Self {
        ContentPart::InputImage {
            image_url: format!("data:{};base64,{}", mime_type, base64),
        }
    }
}

/// Message content: plain text or a list of parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl InputMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }
}

/// Tool made available to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    WebSearch,
}

/// Request body for `POST /responses`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
}

impl ResponseRequest {
    /// All user text of the request, joined by newlines
    pub fn user_text(&self) -> String {
        self.input
            .iter()
            .filter(|m| m.role == Role::User)
            .flat_map(|m| match &m.content {
                MessageContent::Text(t) => vec![t.as_str()],
                MessageContent::Parts(parts) => parts
                    .iter()
                    .filter_map(|p| match p {
                        ContentPart::InputText { text } => Some(text.as_str()),
                        ContentPart::InputImage { .. } => None,
                    })
                    .collect(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What the pipeline needs from a model response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    /// Concatenated output text (empty when the model produced none)
    pub output_text: String,
    /// Web-search citations surfaced outside the model's text
    pub web_sources: Vec<Source>,
}

impl ModelResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            output_text: text.into(),
            web_sources: Vec::new(),
        }
    }

    /// Read output text and web-search sources from a raw response body
    ///
    /// Text: top-level `output_text` when non-empty, else every `output_text`
    /// content part of the `output` items, concatenated. Sources: entries of
    /// `web_search_call` items' `action.sources` that carry a URL.
    pub fn from_raw(raw: &Value) -> Self {
        let output = match raw.get("output") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        };

        let output_text = match raw.get("output_text") {
            Some(Value::String(text)) if !text.is_empty() => text.clone(),
            _ => output
                .iter()
                .filter(|item| item.get("type").and_then(Value::as_str) == Some("message"))
                .filter_map(|item| item.get("content").and_then(Value::as_array))
                .flatten()
                .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<String>(),
        };

        let web_sources = output
            .iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("web_search_call"))
            .filter_map(|item| {
                coerce::field(coerce::field(Some(item), "action"), "sources")
                    .and_then(Value::as_array)
            })
            .flatten()
            .filter_map(Source::from_value)
            .collect();

        Self {
            output_text,
            web_sources,
        }
    }
}

/// Model API seam used by the pipeline
#[async_trait]
pub trait ResponsesApi: Send + Sync {
    async fn create_response(&self, request: &ResponseRequest) -> Result<ModelResponse, OpenAIError>;
}

/// HTTP client for the OpenAI Responses API
pub struct OpenAIClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, OpenAIError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAIError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl ResponsesApi for OpenAIClient {
    async fn create_response(&self, request: &ResponseRequest) -> Result<ModelResponse, OpenAIError> {
        tracing::debug!(
            model = %request.model,
            max_output_tokens = request.max_output_tokens,
            tools = request.tools.len(),
            "Calling Responses API"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| OpenAIError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(OpenAIError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OpenAIError::ApiError(status.as_u16(), error_text));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| OpenAIError::ParseError(e.to_string()))?;

        let parsed = ModelResponse::from_raw(&raw);
        tracing::debug!(
            model = %request.model,
            text_len = parsed.output_text.len(),
            web_sources = parsed.web_sources.len(),
            "Responses API call succeeded"
        );

        Ok(parsed)
    }
}
