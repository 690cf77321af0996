//! Grounding context composition.
//!
//! Retrieved candidates are rendered deterministically into the block
//! the generative model is constrained to answer from. The rendering
//! reuses the catalog's attribute labels, abbreviated to the fields
//! that matter when recommending.

use advisor_catalog::text::{label_for, render_value};
use advisor_catalog::{AttributeValue, CatalogItem};

/// Fixed system instruction for the generative model.
pub const SYSTEM_PROMPT: &str = "\
You are an AI product assistant specialized in personal protective \
equipment (PPE).

Your job:
1. Understand the user's needs (industry, working conditions, hazards)
2. Recommend the most suitable products from the supplied catalog entries
3. Back every recommendation with concrete technical attributes
4. Answer in the user's language

Rules:
- Recommend only products from the supplied catalog entries
- Always cite technical attributes (protection class, standard, material)
- When comparing products, state advantages and disadvantages explicitly
- If no supplied product fits, say so honestly instead of inventing one
- Explain safety standards (EN ISO 20345, ASTM F2413, ...) when relevant
- Be short, precise, and professional";

/// Attribute keys included in the abbreviated per-product rendering.
const KEY_ATTRIBUTES: &[&str] = &[
    "protection_class",
    "toe_cap_material",
    "standard",
    "closure_system",
    "outsole_material",
    "weight_grams",
    "shoe_type",
    "electrical_hazard",
    "antistatic",
    "water_resistant",
    "anti_perforation",
    "cold_insulation",
    "heat_insulation",
];

/// Maximum description length in the grounding block, in characters.
const DESCRIPTION_CAP: usize = 200;

/// Render retrieved items into the grounding block.
///
/// An empty candidate list renders as an explicit statement so the
/// model reports it honestly instead of fabricating products.
pub fn format_grounding(items: &[&CatalogItem]) -> String {
    if items.is_empty() {
        return "No matching products were found.".to_string();
    }

    items
        .iter()
        .enumerate()
        .map(|(position, item)| format_item(position + 1, item))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_item(number: usize, item: &CatalogItem) -> String {
    let mut lines: Vec<String> = Vec::new();

    let title = match &item.brand {
        Some(brand) => format!("{brand} {}", item.name),
        None => item.name.clone(),
    };
    match &item.sku {
        Some(sku) => lines.push(format!("{number}. **{title}** (SKU: {sku})")),
        None => lines.push(format!("{number}. **{title}**")),
    }

    if let Some(description) = &item.description {
        lines.push(format!("   Description: {}", truncate(description)));
    }

    for key in KEY_ATTRIBUTES {
        if let Some(value) = item.attributes.get(*key) {
            lines.push(format!("   {}: {}", label_for(key), render_value(value)));
        }
    }

    if let Some(AttributeValue::List(industries)) = item.attributes.get("industries") {
        lines.push(format!("   Industries: {}", industries.join(", ")));
    }

    lines.join("\n")
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_CAP {
        text.to_string()
    } else {
        let cut: String = text.chars().take(DESCRIPTION_CAP).collect();
        format!("{cut}...")
    }
}

/// Compose the augmented user message sent to the generative model.
pub fn compose_user_message(grounding: &str, message: &str) -> String {
    format!(
        "## Matched products (from the catalog)\n\
         {grounding}\n\n\
         ## User question\n\
         {message}\n\n\
         Answer the user's question using the product information above. \
         Recommend only products from the catalog."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_candidates_render_honest_statement() {
        assert_eq!(format_grounding(&[]), "No matching products were found.");
    }

    #[test]
    fn items_render_numbered_with_key_attributes() {
        let item = CatalogItem::new("p1", "Guard Pro S3")
            .with_brand("Acme")
            .with_sku("GP-S3")
            .with_attribute("protection_class", AttributeValue::Text("S3".to_string()))
            .with_attribute("antistatic", AttributeValue::Bool(true))
            .with_attribute(
                "industries",
                AttributeValue::List(vec!["construction".to_string()]),
            );

        let block = format_grounding(&[&item]);
        let expected = [
            "1. **Acme Guard Pro S3** (SKU: GP-S3)",
            "   Protection class: S3",
            "   Antistatic: yes",
            "   Industries: construction",
        ]
        .join("\n");
        assert_eq!(block, expected);
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let long = "x".repeat(300);
        let item = CatalogItem::new("p1", "Boot").with_description(long);

        let block = format_grounding(&[&item]);
        assert!(block.contains(&format!("Description: {}...", "x".repeat(200))));
    }

    #[test]
    fn composed_message_embeds_grounding_and_question() {
        let composed = compose_user_message("GROUNDING", "what boot for winter?");
        assert!(composed.contains("GROUNDING"));
        assert!(composed.contains("what boot for winter?"));
        assert!(composed.starts_with("## Matched products"));
    }
}
