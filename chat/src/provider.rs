//! Generative providers.

use async_stream::try_stream;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::conversation::{ConversationTurn, Role};
use crate::error::GenerationError;

/// A lazy, finite sequence of text fragments in arrival order.
pub type TokenStream = BoxStream<'static, Result<String, GenerationError>>;

/// Trait for streaming generative-text providers.
///
/// `stream_chat` may fail before the first fragment (the returned
/// `Result`) or mid-stream (an `Err` item in the stream). Dropping the
/// stream cancels the underlying request.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Send a chat request and stream the model's answer.
    async fn stream_chat(
        &self,
        system_instruction: &str,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<TokenStream, GenerationError>;
}

/// Gemini generative provider, speaking the SSE streaming endpoint.
pub struct GeminiChatProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model identifier.
    model: String,
}

impl GeminiChatProvider {
    /// Create a new provider, reading the API key from `GEMINI_API_KEY`.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client: reqwest::Client::new(),
            model: "gemini-2.5-flash".to_string(),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request_body(
        system_instruction: &str,
        history: &[ConversationTurn],
        message: &str,
    ) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> = history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": turn.content }],
                })
            })
            .collect();
        contents.push(serde_json::json!({
            "role": "user",
            "parts": [{ "text": message }],
        }));

        serde_json::json!({
            "system_instruction": { "parts": [{ "text": system_instruction }] },
            "contents": contents,
        })
    }
}

impl Default for GeminiChatProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeProvider for GeminiChatProvider {
    async fn stream_chat(
        &self,
        system_instruction: &str,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<TokenStream, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(GenerationError::NotConfigured)?;

        debug!("Streaming chat with model: {}", self.model);

        let body = Self::request_body(system_instruction, history, message);

        let response = self
            .client
            .post(format!(
                "{}/models/{}:streamGenerateContent?alt=sse",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let stream = try_stream! {
            let mut events = response.bytes_stream().eventsource();
            while let Some(event) = events.next().await {
                let event =
                    event.map_err(|err| GenerationError::Stream(err.to_string()))?;
                if event.data.trim().is_empty() {
                    continue;
                }

                let chunk: GeminiStreamChunk = serde_json::from_str(&event.data)?;
                if let Some(text) = chunk.text() {
                    if !text.is_empty() {
                        yield text;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// One SSE chunk of a Gemini streaming response.
#[derive(Debug, Deserialize)]
struct GeminiStreamChunk {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

impl GeminiStreamChunk {
    /// Concatenated text of the first candidate's parts, if any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}
