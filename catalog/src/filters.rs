//! Deterministic attribute filters for catalog search.

use serde::{Deserialize, Serialize};

use crate::item::CatalogItem;

/// Sparse equality constraints over catalog attributes.
///
/// An absent field means "unconstrained", never "match empty". Filters
/// only ever narrow a candidate set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Exact brand match.
    pub brand: Option<String>,

    /// Exact category match.
    pub category: Option<String>,

    /// Protection class attribute (e.g. "S3").
    pub protection_class: Option<String>,

    /// Toe cap material attribute.
    pub toe_cap_material: Option<String>,

    /// Electrical hazard protection flag.
    pub electrical_hazard: Option<bool>,

    /// Antistatic flag.
    pub antistatic: Option<bool>,

    /// Metal-free construction flag.
    pub non_metallic: Option<bool>,
}

impl SearchFilters {
    /// Whether no field is constrained.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether `item` satisfies every present field.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        if let Some(brand) = &self.brand {
            if item.brand.as_deref() != Some(brand.as_str()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if item.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(class) = &self.protection_class {
            if !attr_text_eq(item, "protection_class", class) {
                return false;
            }
        }
        if let Some(material) = &self.toe_cap_material {
            if !attr_text_eq(item, "toe_cap_material", material) {
                return false;
            }
        }
        if let Some(flag) = self.electrical_hazard {
            if !attr_bool_eq(item, "electrical_hazard", flag) {
                return false;
            }
        }
        if let Some(flag) = self.antistatic {
            if !attr_bool_eq(item, "antistatic", flag) {
                return false;
            }
        }
        if let Some(flag) = self.non_metallic {
            if !attr_bool_eq(item, "non_metallic", flag) {
                return false;
            }
        }
        true
    }
}

fn attr_text_eq(item: &CatalogItem, key: &str, expected: &str) -> bool {
    item.attributes
        .get(key)
        .and_then(|v| v.as_text())
        .is_some_and(|text| text == expected)
}

fn attr_bool_eq(item: &CatalogItem, key: &str, expected: bool) -> bool {
    item.attributes
        .get(key)
        .and_then(|v| v.as_bool())
        .is_some_and(|flag| flag == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::AttributeValue;

    fn boot() -> CatalogItem {
        CatalogItem::new("p1", "Guard Pro S3")
            .with_brand("Acme")
            .with_attribute("protection_class", AttributeValue::Text("S3".to_string()))
            .with_attribute("antistatic", AttributeValue::Bool(true))
    }

    #[test]
    fn empty_filters_match_everything() {
        let filters = SearchFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&boot()));
    }

    #[test]
    fn present_fields_all_must_match() {
        let filters = SearchFilters {
            brand: Some("Acme".to_string()),
            protection_class: Some("S3".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&boot()));

        let filters = SearchFilters {
            brand: Some("Acme".to_string()),
            protection_class: Some("S1P".to_string()),
            ..Default::default()
        };
        assert!(!filters.matches(&boot()));
    }

    #[test]
    fn missing_attribute_never_matches_a_constraint() {
        let filters = SearchFilters {
            electrical_hazard: Some(true),
            ..Default::default()
        };
        assert!(!filters.matches(&boot()));
    }

    #[test]
    fn boolean_constraint_compares_value_not_presence() {
        let filters = SearchFilters {
            antistatic: Some(false),
            ..Default::default()
        };
        assert!(!filters.matches(&boot()));
    }
}
