//! # Catalog
//!
//! The product catalog data model and its store boundary.
//!
//! This crate defines [`CatalogItem`] and its open attribute map, the
//! deterministic text rendering used as embedding input, the sparse
//! [`SearchFilters`] set, and the [`CatalogStore`] trait every catalog
//! collaborator implements. [`MemoryCatalog`] is the bundled in-memory
//! implementation used by tests and demos.

pub mod error;
pub mod filters;
pub mod item;
pub mod memory;
pub mod store;
pub mod text;

pub use error::{CatalogError, Result};
pub use filters::SearchFilters;
pub use item::{AttributeValue, CatalogItem};
pub use memory::MemoryCatalog;
pub use store::CatalogStore;
pub use text::build_item_text;
