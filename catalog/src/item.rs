//! Catalog item model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use advisor_embeddings::Embedding;

/// A value in a catalog item's open attribute map.
///
/// Attribute keys and value shapes are category-defined; the core only
/// needs to render and compare them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean flag (e.g. `antistatic`).
    Bool(bool),

    /// Numeric value (e.g. `weight_grams`).
    Number(f64),

    /// Free-form text (e.g. `protection_class`).
    Text(String),

    /// List of strings (e.g. `industries`).
    List(Vec<String>),
}

impl AttributeValue {
    /// Text value, if this is a [`AttributeValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Boolean value, if this is a [`AttributeValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// A product in the safety-equipment catalog.
///
/// Items are created and updated by the catalog collaborator; the core
/// only ever mutates `embedding` (through the indexer) and never deletes.
/// An item with `active == false` is invisible to indexing and retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique identifier.
    pub id: String,

    /// Stock-keeping unit, the human-facing identifier.
    pub sku: Option<String>,

    /// Display name.
    pub name: String,

    /// Brand, if known.
    pub brand: Option<String>,

    /// Category identifier, if assigned.
    pub category: Option<String>,

    /// Free-text description.
    pub description: Option<String>,

    /// Open attribute map. `BTreeMap` keeps iteration order stable so
    /// identical data always renders identical embedding text.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,

    /// Embedding vector; fully present or absent, never partial.
    #[serde(default)]
    pub embedding: Option<Embedding>,

    /// Whether the item participates in indexing and retrieval.
    pub active: bool,
}

impl CatalogItem {
    /// Create a minimal active item.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sku: None,
            name: name.into(),
            brand: None,
            category: None,
            description: None,
            attributes: BTreeMap::new(),
            embedding: None,
            active: true,
        }
    }

    /// Set the SKU.
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Set the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Set the embedding.
    pub fn with_embedding(mut self, embedding: Embedding) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Mark the item inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attribute_value_deserializes_untagged() {
        let value: AttributeValue = serde_json::from_str("true").unwrap();
        assert_eq!(value, AttributeValue::Bool(true));

        let value: AttributeValue = serde_json::from_str("200").unwrap();
        assert_eq!(value, AttributeValue::Number(200.0));

        let value: AttributeValue = serde_json::from_str("\"S3\"").unwrap();
        assert_eq!(value, AttributeValue::Text("S3".to_string()));

        let value: AttributeValue = serde_json::from_str("[\"construction\"]").unwrap();
        assert_eq!(
            value,
            AttributeValue::List(vec!["construction".to_string()])
        );
    }

    #[test]
    fn builder_produces_active_item() {
        let item = CatalogItem::new("p1", "Guard Pro")
            .with_brand("Acme")
            .with_attribute("antistatic", AttributeValue::Bool(true));

        assert!(item.active);
        assert!(item.embedding.is_none());
        assert_eq!(item.attributes.len(), 1);
    }
}
