//! Deterministic text rendering of catalog items.
//!
//! The embedding input for an item is produced here. Rendering is a pure
//! function of the item's data: identical catalog data always yields a
//! byte-identical text block, which is what makes the indexing pipeline
//! idempotent at the text level.

use crate::item::{AttributeValue, CatalogItem};

/// Human-readable labels for known attribute keys, in render order.
///
/// Unknown keys render after these, under their raw key, in the item's
/// stable map order.
pub const ATTRIBUTE_LABELS: &[(&str, &str)] = &[
    ("protection_class", "Protection class"),
    ("toe_cap_material", "Toe cap material"),
    ("slip_resistance", "Slip resistance"),
    ("upper_material", "Upper material"),
    ("outsole_material", "Outsole material"),
    ("anti_perforation", "Perforation resistance"),
    ("antistatic", "Antistatic"),
    ("electrical_hazard", "Electrical hazard (EH) protection"),
    ("water_resistant", "Water resistance"),
    ("closure_system", "Closure system"),
    ("standard", "Standard"),
    ("impact_protection_joules", "Impact protection (J)"),
    ("shoe_type", "Shoe type"),
    ("weight_grams", "Weight (g)"),
    ("cold_insulation", "Cold insulation"),
    ("heat_insulation", "Heat insulation"),
    ("heat_resistant_outsole", "Heat resistant outsole"),
    ("vegan_friendly", "Vegan friendly"),
    ("non_metallic", "Metal free"),
    ("eh_voltage", "EH voltage"),
];

/// Label for a known attribute key, or the raw key itself.
pub fn label_for(key: &str) -> &str {
    ATTRIBUTE_LABELS
        .iter()
        .find(|(known, _)| *known == key)
        .map_or(key, |(_, label)| label)
}

/// Render an attribute value: booleans as yes/no, lists joined by a
/// fixed separator, integral numbers without a decimal point.
pub fn render_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Bool(flag) => {
            if *flag {
                "yes".to_string()
            } else {
                "no".to_string()
            }
        }
        AttributeValue::Number(n) => {
            if n.fract() == 0.0 && n.is_finite() {
                format!("{n:.0}")
            } else {
                n.to_string()
            }
        }
        AttributeValue::Text(text) => text.clone(),
        AttributeValue::List(items) => items.join(", "),
    }
}

/// Build the embedding text for a catalog item.
///
/// Fixed order: brand (if present), name, description (if present), then
/// every present attribute — known keys first in [`ATTRIBUTE_LABELS`]
/// order, remaining keys in the map's lexicographic order.
pub fn build_item_text(item: &CatalogItem) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(brand) = &item.brand {
        parts.push(format!("Brand: {brand}"));
    }
    parts.push(format!("Product: {}", item.name));

    if let Some(description) = &item.description {
        parts.push(description.clone());
    }

    for (key, label) in ATTRIBUTE_LABELS {
        if let Some(value) = item.attributes.get(*key) {
            parts.push(format!("{label}: {}", render_value(value)));
        }
    }

    for (key, value) in &item.attributes {
        if ATTRIBUTE_LABELS.iter().any(|(known, _)| known == key) {
            continue;
        }
        parts.push(format!("{key}: {}", render_value(value)));
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn boot() -> CatalogItem {
        CatalogItem::new("p1", "Guard Pro S3")
            .with_brand("Acme")
            .with_description("Composite toe work boot.")
            .with_attribute("antistatic", AttributeValue::Bool(true))
            .with_attribute("weight_grams", AttributeValue::Number(540.0))
            .with_attribute(
                "protection_class",
                AttributeValue::Text("S3".to_string()),
            )
            .with_attribute(
                "industries",
                AttributeValue::List(vec![
                    "construction".to_string(),
                    "logistics".to_string(),
                ]),
            )
    }

    #[test]
    fn renders_fixed_order_with_labels() {
        let text = build_item_text(&boot());
        assert_eq!(
            text,
            "Brand: Acme\n\
             Product: Guard Pro S3\n\
             Composite toe work boot.\n\
             Protection class: S3\n\
             Antistatic: yes\n\
             Weight (g): 540\n\
             industries: construction, logistics"
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let item = boot();
        let first = build_item_text(&item);
        let second = build_item_text(&item);
        assert_eq!(first, second);

        // A structurally equal item built in a different call order
        // renders identically.
        let reordered = CatalogItem::new("p1", "Guard Pro S3")
            .with_attribute(
                "industries",
                AttributeValue::List(vec![
                    "construction".to_string(),
                    "logistics".to_string(),
                ]),
            )
            .with_attribute(
                "protection_class",
                AttributeValue::Text("S3".to_string()),
            )
            .with_attribute("weight_grams", AttributeValue::Number(540.0))
            .with_attribute("antistatic", AttributeValue::Bool(true))
            .with_brand("Acme")
            .with_description("Composite toe work boot.");
        assert_eq!(first, build_item_text(&reordered));
    }

    #[test]
    fn absent_fields_are_skipped_entirely() {
        let item = CatalogItem::new("p2", "Plain Glove");
        assert_eq!(build_item_text(&item), "Product: Plain Glove");
    }

    #[test]
    fn integral_numbers_render_without_decimal_point() {
        assert_eq!(render_value(&AttributeValue::Number(540.0)), "540");
        assert_eq!(render_value(&AttributeValue::Number(0.5)), "0.5");
        // Integral values beyond i64 range keep their exact magnitude.
        assert_eq!(
            render_value(&AttributeValue::Number(1e19)),
            "10000000000000000000"
        );
    }

    #[test]
    fn booleans_render_yes_no() {
        assert_eq!(render_value(&AttributeValue::Bool(true)), "yes");
        assert_eq!(render_value(&AttributeValue::Bool(false)), "no");
    }

    #[test]
    fn unknown_keys_use_raw_key() {
        assert_eq!(label_for("protection_class"), "Protection class");
        assert_eq!(label_for("mystery_field"), "mystery_field");
    }
}
