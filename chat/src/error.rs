//! Error types for chat orchestration.

use thiserror::Error;

use advisor_retrieval::RetrievalError;

/// Result type alias for chat operations.
pub type Result<T, E = ChatError> = std::result::Result<T, E>;

/// Errors that can occur in the generative provider.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Provider not configured (missing API key). Not retryable.
    #[error("generative provider not configured")]
    NotConfigured,

    /// API request rejected before any fragment was produced.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed payload in the stream.
    #[error("stream payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// The stream broke mid-flight.
    #[error("stream error: {0}")]
    Stream(String),
}

/// Errors that can occur while orchestrating a chat request.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The caller supplied no message. No external call was made.
    #[error("invalid request: message must not be empty")]
    InvalidRequest,

    /// Both retrieval tiers failed.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// The generative provider failed before streaming started.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    /// The generation stream broke mid-flight; the stream ends with
    /// this terminal error instead of a completion marker.
    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),
}
