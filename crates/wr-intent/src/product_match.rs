//! Deterministic product-family matcher (§4.5 step 4).
//!
//! Runs before the LLM extraction step: if the query names a known
//! power-source family together with an equipment-type token, we can
//! synthesize a high-confidence intent without a model call at all.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::MentionedProduct;

static PRODUCT_FAMILIES: &[&str] =
    &["aristo 500 ix", "aristo 500", "warrior 400i", "warrior 400", "renegade 300", "renegade es 300i"];

static EQUIPMENT_TYPES: &[&str] = &["wire feeder", "cooler", "torch", "regulator"];

static FAMILY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = PRODUCT_FAMILIES
        .iter()
        .map(|family| regex::escape(family).replace(r"\ ", r"\s*"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)({alternation})")).expect("generated regex is valid")
});

/// The result of the deterministic matcher: a named product plus the
/// `application`/confidence pair the caller should synthesize the rest
/// of the intent from.
pub struct ProductMatch {
    pub product: MentionedProduct,
    pub application: &'static str,
    pub confidence: f32,
}

/// Looks for a known product family and, optionally, an equipment-type
/// token in the same query (§4.5 step 4).
pub fn match_product(query: &str) -> Option<ProductMatch> {
    let lower = query.to_lowercase();
    let family = FAMILY_PATTERN.find(&lower)?.as_str().trim().to_string();

    let equipment_type =
        EQUIPMENT_TYPES.iter().find(|equipment| lower.contains(**equipment)).map(|e| e.to_string());

    let (application, confidence) = if equipment_type.is_some() {
        ("compatibility", 0.9)
    } else {
        ("product_inquiry", 0.7)
    };

    Some(ProductMatch {
        product: MentionedProduct { family, equipment_type },
        application,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_and_equipment_type_yields_compatibility() {
        let matched = match_product("is a wire feeder compatible with the Warrior 400i?").unwrap();
        assert_eq!(matched.application, "compatibility");
        assert_eq!(matched.confidence, 0.9);
        assert_eq!(matched.product.equipment_type.as_deref(), Some("wire feeder"));
    }

    #[test]
    fn product_alone_yields_product_inquiry() {
        let matched = match_product("tell me about the Renegade 300").unwrap();
        assert_eq!(matched.application, "product_inquiry");
        assert_eq!(matched.confidence, 0.7);
        assert!(matched.product.equipment_type.is_none());
    }

    #[test]
    fn no_known_family_returns_none() {
        assert!(match_product("I need a welder for steel").is_none());
    }
}
