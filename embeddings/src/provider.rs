//! Embedding providers.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{EmbeddingError, Result};
use crate::Embedding;

/// Trait for embedding providers.
///
/// Implementations convert text into a fixed-length vector. The provider
/// holds no per-request state; it is constructed once and injected into
/// whichever component needs it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for the given text.
    ///
    /// Input is never truncated; callers must stay under
    /// [`crate::MAX_INPUT_CHARS`].
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Dimensionality of the vectors this provider produces.
    fn dimension(&self) -> usize;
}

/// Gemini embedding provider.
pub struct GeminiEmbeddingProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model identifier.
    model: String,

    /// Output dimensionality.
    dimension: usize,
}

impl GeminiEmbeddingProvider {
    /// Create a new provider, reading the API key from `GEMINI_API_KEY`.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client: reqwest::Client::new(),
            model: "gemini-embedding-001".to_string(),
            dimension: crate::DEFAULT_DIMENSION,
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

    /// Set the model and its output dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }
}

impl Default for GeminiEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let api_key = self.api_key.as_ref().ok_or(EmbeddingError::NotConfigured)?;

        debug!("Generating embedding with model: {}", self.model);

        let body = serde_json::json!({
            "model": format!("models/{}", self.model),
            "content": { "parts": [{ "text": text }] },
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:embedContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let result: GeminiEmbedResponse = response.json().await?;
        let embedding = result.embedding.values;

        if embedding.is_empty() {
            return Err(EmbeddingError::InvalidResponse(
                "no embedding values in response".to_string(),
            ));
        }

        info!("Generated embedding with {} dimensions", embedding.len());

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
struct GeminiEmbedResponse {
    embedding: GeminiEmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct GeminiEmbeddingValues {
    values: Vec<f32>,
}
