//! # Retrieval
//!
//! The write and read paths between the catalog and the embedding
//! provider.
//!
//! [`VectorIndexer`] keeps every active catalog item embedded exactly
//! once: it snapshots the active set, embeds only items missing a
//! vector, and isolates per-item failures so one bad item never aborts
//! a run. [`HybridRetriever`] ranks candidates by vector similarity,
//! narrows them with deterministic attribute filters, and composes a
//! keyword fallback tier so a transient embedding outage never makes
//! retrieval return nothing when simple matches exist.

pub mod config;
pub mod error;
pub mod indexer;
pub mod retriever;

pub use config::SearchOptions;
pub use error::{IndexError, Result, RetrievalError};
pub use indexer::{IndexReport, VectorIndexer};
pub use retriever::{HybridRetriever, RetrievalOutcome, SearchCandidate};
