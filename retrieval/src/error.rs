//! Error types for indexing and retrieval.

use thiserror::Error;

use advisor_catalog::CatalogError;
use advisor_embeddings::EmbeddingError;

/// Result type alias for retrieval operations.
pub type Result<T, E = RetrievalError> = std::result::Result<T, E>;

/// Errors from the retrieval read path.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Embedding the query failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The catalog store failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Both the semantic tier and the filter fallback failed.
    #[error("retrieval failed: semantic tier: {semantic}; fallback tier: {fallback}")]
    RetrievalFailed { semantic: String, fallback: String },
}

/// Errors from the indexing write path.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The item to index does not exist.
    #[error("item not found: {id}")]
    ItemNotFound { id: String },

    /// The item is inactive and not an indexing candidate.
    #[error("item is inactive: {id}")]
    ItemInactive { id: String },

    /// Embedding generation failed for the item.
    #[error("embedding failed for {id}: {source}")]
    EmbeddingFailed {
        id: String,
        #[source]
        source: EmbeddingError,
    },

    /// The catalog store failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
