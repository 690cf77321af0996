//! # Embeddings
//!
//! Text-to-vector embedding generation for catalog items and search
//! queries, plus the similarity math used by vector-capable stores.
//!
//! The [`EmbeddingProvider`] trait is the boundary contract the rest of
//! the advisor depends on; [`GeminiEmbeddingProvider`] is the concrete
//! HTTP implementation. Every vector produced for a deployment has the
//! same dimensionality, so stored embeddings are always comparable.

pub mod error;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, GeminiEmbeddingProvider};
pub use similarity::{cosine_similarity, find_top_k, unit_similarity, SimilarityHit};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings produced by the default model.
pub const DEFAULT_DIMENSION: usize = 3072; // gemini-embedding-001

/// Maximum input length accepted by the embedding API, in characters.
///
/// The provider never truncates input; callers are responsible for
/// staying under this limit.
pub const MAX_INPUT_CHARS: usize = 8192;
