//! In-memory catalog store.
//!
//! The bundled [`CatalogStore`] implementation: items live in insertion
//! order (the store-native order) behind an async lock, and similarity
//! search is a linear cosine scan. Used by tests and demos; production
//! deployments supply their own store behind the same trait.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use advisor_embeddings::{find_top_k, Embedding};

use crate::error::{CatalogError, Result};
use crate::filters::SearchFilters;
use crate::item::CatalogItem;
use crate::store::CatalogStore;

/// An in-memory catalog, ordered by insertion.
#[derive(Default)]
pub struct MemoryCatalog {
    items: RwLock<Vec<CatalogItem>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with `items`, preserving their order.
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Insert or replace an item, keyed by id.
    pub async fn upsert(&self, item: CatalogItem) {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
    }

    /// Number of items, active or not.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the catalog holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn get_item(&self, id: &str) -> Result<CatalogItem> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    async fn list_active_items(&self) -> Result<Vec<CatalogItem>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|item| item.active)
            .cloned()
            .collect())
    }

    async fn write_embedding(&self, id: &str, vector: &[f32]) -> Result<()> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;

        item.embedding = Some(vector.to_vec());
        debug!("Stored embedding for item {id}");
        Ok(())
    }

    async fn vector_search(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<(CatalogItem, f32)>> {
        let items = self.items.read().await;

        // Only active, embedded items participate in similarity ranking.
        let candidates: Vec<&CatalogItem> = items
            .iter()
            .filter(|item| item.active && item.embedding.is_some())
            .collect();
        let embeddings: Vec<Embedding> = candidates
            .iter()
            .filter_map(|item| item.embedding.clone())
            .collect();

        let hits = find_top_k(query, &embeddings, limit, threshold)
            .map_err(|err| CatalogError::Store(err.to_string()))?;

        Ok(hits
            .into_iter()
            .map(|hit| (candidates[hit.index].clone(), hit.score))
            .collect())
    }

    async fn filter_search(
        &self,
        filters: &SearchFilters,
        free_text: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CatalogItem>> {
        let needle = free_text.map(str::to_lowercase);

        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|item| item.active && filters.matches(item))
            .filter(|item| match &needle {
                Some(needle) => text_matches(item, needle),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Case-insensitive substring match on name, description, or SKU.
fn text_matches(item: &CatalogItem, needle: &str) -> bool {
    if item.name.to_lowercase().contains(needle) {
        return true;
    }
    if let Some(description) = &item.description {
        if description.to_lowercase().contains(needle) {
            return true;
        }
    }
    if let Some(sku) = &item.sku {
        if sku.to_lowercase().contains(needle) {
            return true;
        }
    }
    false
}
