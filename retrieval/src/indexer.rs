//! Embedding generation pipeline for catalog items.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use advisor_catalog::{build_item_text, CatalogError, CatalogItem, CatalogStore};
use advisor_embeddings::EmbeddingProvider;

use crate::error::IndexError;

/// Outcome of a batch indexing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Items newly indexed in this run.
    pub indexed: usize,

    /// Items that already had a vector and were not touched.
    pub skipped: usize,

    /// Per-item failures, as `"<item-name>: <message>"`.
    pub errors: Vec<String>,
}

/// Generates and persists embeddings for catalog items.
///
/// Batch runs are intentionally serial with a pacing delay between
/// provider calls, bounding load on the embedding provider and avoiding
/// bursty rate-limit errors.
pub struct VectorIndexer {
    store: Arc<dyn CatalogStore>,
    provider: Arc<dyn EmbeddingProvider>,
    pacing: Duration,
}

impl VectorIndexer {
    /// Default delay between successive embedding calls in a batch run.
    pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

    /// Create an indexer over the given store and provider.
    pub fn new(store: Arc<dyn CatalogStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            provider,
            pacing: Self::DEFAULT_PACING,
        }
    }

    /// Override the inter-call pacing delay.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Index a single item, overwriting any prior vector.
    ///
    /// Inactive items are never indexing candidates and are rejected
    /// before any provider call. Exactly one write reaches the store
    /// per successful call.
    pub async fn index_one(&self, id: &str) -> Result<(), IndexError> {
        let item = self.store.get_item(id).await.map_err(|err| match err {
            CatalogError::NotFound { id } => IndexError::ItemNotFound { id },
            other => IndexError::Catalog(other),
        })?;
        if !item.active {
            return Err(IndexError::ItemInactive { id: item.id });
        }

        let vector = self.embed_item(&item).await?;
        self.store.write_embedding(&item.id, &vector).await?;

        info!("Indexed item {} ({})", item.name, item.id);
        Ok(())
    }

    /// Index every active item that is missing an embedding.
    ///
    /// The active set is snapshotted once at the start of the run; items
    /// becoming active afterward belong to the next run. Per-item
    /// failures are recorded and the run continues — only a total
    /// inability to read the catalog returns `Err`.
    pub async fn index_all_missing(&self) -> Result<IndexReport, IndexError> {
        let active = self.store.list_active_items().await?;

        let (missing, present): (Vec<_>, Vec<_>) = active
            .into_iter()
            .partition(|item| item.embedding.is_none());

        info!(
            "{} active items: {} already indexed, {} need indexing",
            missing.len() + present.len(),
            present.len(),
            missing.len()
        );

        let mut report = IndexReport {
            skipped: present.len(),
            ..Default::default()
        };

        for (position, item) in missing.iter().enumerate() {
            // Pace between successive provider calls, never before the
            // first one.
            if position > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            match self.index_item(item).await {
                Ok(()) => {
                    report.indexed += 1;
                    debug!(
                        "Indexed {}/{}: {}",
                        report.indexed,
                        missing.len(),
                        item.name
                    );
                }
                Err(err) => {
                    warn!("Failed to index {}: {err}", item.name);
                    report.errors.push(format!("{}: {err}", item.name));
                }
            }
        }

        info!(
            "Indexing complete: {}/{} succeeded",
            report.indexed,
            missing.len()
        );
        Ok(report)
    }

    async fn index_item(&self, item: &CatalogItem) -> Result<(), IndexError> {
        let vector = self.embed_item(item).await?;
        self.store.write_embedding(&item.id, &vector).await?;
        Ok(())
    }

    async fn embed_item(&self, item: &CatalogItem) -> Result<Vec<f32>, IndexError> {
        let text = build_item_text(item);
        self.provider
            .embed(&text)
            .await
            .map_err(|source| IndexError::EmbeddingFailed {
                id: item.id.clone(),
                source,
            })
    }
}
