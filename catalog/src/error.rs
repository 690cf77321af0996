//! Error types for catalog store operations.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur at the catalog store boundary.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The requested item does not exist. Distinct from transport errors.
    #[error("item not found: {id}")]
    NotFound { id: String },

    /// Transport or authorization failure talking to the store.
    #[error("catalog store error: {0}")]
    Store(String),
}
