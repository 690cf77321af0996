//! Hybrid retrieval over the catalog.

use std::sync::Arc;

use tracing::{debug, warn};

use advisor_catalog::{CatalogItem, CatalogStore, SearchFilters};
use advisor_embeddings::EmbeddingProvider;

use crate::config::SearchOptions;
use crate::error::{Result, RetrievalError};

/// A catalog item paired with its similarity score in [0, 1].
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    /// The matched item.
    pub item: CatalogItem,

    /// Similarity to the query (1 = identical).
    pub similarity: f32,
}

/// Tagged result of the composed retrieval path.
///
/// Both variants render identically downstream; the tag records which
/// tier produced the result so tests and telemetry can tell them apart.
#[derive(Debug, Clone)]
pub enum RetrievalOutcome {
    /// Similarity-ranked candidates from the semantic tier.
    Ranked(Vec<SearchCandidate>),

    /// Unranked items from the filter fallback, in store order.
    Unranked(Vec<CatalogItem>),
}

impl RetrievalOutcome {
    /// The retrieved items, in result order, regardless of tier.
    pub fn items(&self) -> Vec<&CatalogItem> {
        match self {
            Self::Ranked(candidates) => candidates.iter().map(|c| &c.item).collect(),
            Self::Unranked(items) => items.iter().collect(),
        }
    }

    /// Whether no item was retrieved.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Ranked(candidates) => candidates.is_empty(),
            Self::Unranked(items) => items.is_empty(),
        }
    }
}

/// Ranks candidates by vector similarity and narrows them with
/// deterministic attribute filters.
pub struct HybridRetriever {
    store: Arc<dyn CatalogStore>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl HybridRetriever {
    /// Create a retriever over the given store and provider.
    pub fn new(store: Arc<dyn CatalogStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, provider }
    }

    /// Embed the query and return the nearest catalog items.
    pub async fn semantic_search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchCandidate>> {
        let embedding = self.provider.embed(query).await?;

        let matches = self
            .store
            .vector_search(&embedding, options.threshold, options.limit)
            .await?;

        debug!(
            "Semantic search for {query:?} returned {} candidates",
            matches.len()
        );

        Ok(matches
            .into_iter()
            .map(|(item, similarity)| SearchCandidate { item, similarity })
            .collect())
    }

    /// Semantic search over the subset of items matching every present
    /// filter field. Filters narrow, never widen: the result is always a
    /// subset of the unfiltered search.
    pub async fn hybrid_search(
        &self,
        query: &str,
        filters: &SearchFilters,
        options: &SearchOptions,
    ) -> Result<Vec<SearchCandidate>> {
        let candidates = self.semantic_search(query, options).await?;

        if filters.is_empty() {
            return Ok(candidates);
        }

        Ok(candidates
            .into_iter()
            .filter(|candidate| filters.matches(&candidate.item))
            .collect())
    }

    /// Deterministic filter-only search; never touches the embedding
    /// provider.
    pub async fn filter_search(
        &self,
        filters: &SearchFilters,
        free_text: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CatalogItem>> {
        Ok(self.store.filter_search(filters, free_text, limit).await?)
    }

    /// The composed two-tier retrieval used by the chat path.
    ///
    /// Tries the semantic tier first; on any failure or an empty result
    /// falls back to a keyword search over the raw query, capped at the
    /// same limit. Quality degrades before availability does: only both
    /// tiers failing is an error.
    pub async fn retrieve(&self, query: &str, options: &SearchOptions) -> Result<RetrievalOutcome> {
        let semantic_failure = match self.semantic_search(query, options).await {
            Ok(candidates) if !candidates.is_empty() => {
                return Ok(RetrievalOutcome::Ranked(candidates));
            }
            Ok(_) => {
                debug!("Semantic search returned nothing, trying filter fallback");
                None
            }
            Err(err) => {
                warn!("Semantic search failed, falling back to filter search: {err}");
                Some(err)
            }
        };

        match self
            .filter_search(&SearchFilters::default(), Some(query), options.limit)
            .await
        {
            Ok(items) => Ok(RetrievalOutcome::Unranked(items)),
            Err(fallback_err) => Err(RetrievalError::RetrievalFailed {
                semantic: semantic_failure
                    .map_or_else(|| "empty result".to_string(), |err| err.to_string()),
                fallback: fallback_err.to_string(),
            }),
        }
    }
}
