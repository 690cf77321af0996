//! The catalog store boundary.

use async_trait::async_trait;

use crate::error::Result;
use crate::filters::SearchFilters;
use crate::item::CatalogItem;

/// Boundary contract for the catalog's persistent store.
///
/// Implementations own persistence and write atomicity per item; the
/// core accesses them through these idempotent, side-effect-scoped calls
/// (read-only for search, single-item overwrite for indexing). Every
/// call may fail with a transport error distinct from "not found".
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch one item by id. [`crate::CatalogError::NotFound`] when the
    /// id does not exist.
    async fn get_item(&self, id: &str) -> Result<CatalogItem>;

    /// All active items, in the store's native order.
    async fn list_active_items(&self) -> Result<Vec<CatalogItem>>;

    /// Overwrite the item's embedding vector atomically.
    async fn write_embedding(&self, id: &str, vector: &[f32]) -> Result<()>;

    /// The `limit` nearest active items whose similarity to
    /// `query` is at least `threshold`. Similarity is normalized to
    /// [0, 1] at this boundary; results are ordered by descending
    /// similarity, ties in native order.
    async fn vector_search(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<(CatalogItem, f32)>>;

    /// Active items matching every present filter field and, when
    /// `free_text` is given, a case-insensitive substring of name,
    /// description, or SKU. Native order, unranked.
    async fn filter_search(
        &self,
        filters: &SearchFilters,
        free_text: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CatalogItem>>;
}
