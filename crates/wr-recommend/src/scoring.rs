//! Package scoring (§4.6.5): the weighted sum, the intent-match bonus,
//! and the expertise-mode adjustment.

use once_cell::sync::Lazy;
use wr_intent::ExpertiseMode;

use crate::business::{fits_preferred_pricing_tier, preferred_manufacturer_boost, price_consistency};
use crate::types::{RecommendConfig, TrinityPackage};

const TRINITY_COMPLIANCE_WEIGHT: f64 = 0.4;
const COMPATIBILITY_WEIGHT: f64 = 0.3;
const POPULARITY_WEIGHT: f64 = 0.2;
const PRICE_CONSISTENCY_WEIGHT: f64 = 0.1;
const INTENT_MATCH_BONUS_CAP: f64 = 0.15;
const BUSINESS_ADJUSTMENT_CAP: f64 = 0.1;
const SALES_FREQUENCY_NORMALIZATION_CAP: u64 = 200;

/// Product-name keyword table and per-keyword bonus weight for the
/// intent-match bonus (§4.6.5), grounded in the original's
/// `product_keywords` table.
static PRODUCT_KEYWORDS: Lazy<Vec<(&'static str, f64)>> = Lazy::new(|| {
    vec![
        ("aristo 500ix", 0.45),
        ("aristo 500", 0.40),
        ("warrior 500", 0.40),
        ("renegade es", 0.40),
        ("renegade", 0.35),
        ("warrior", 0.35),
        ("aristo", 0.35),
        ("robustfeed", 0.25),
        ("cool2", 0.25),
        ("cooling unit", 0.15),
        ("wire feeder", 0.15),
        ("power source", 0.05),
    ]
});

/// Computes the full per-package score (§4.6.5), already clamped to
/// `[0,1]` after the expertise multiplier.
pub fn score_package(
    package: &TrinityPackage,
    original_query: &str,
    mode: ExpertiseMode,
    organization_fits_tier: Option<bool>,
    config: &RecommendConfig,
) -> f64 {
    let mut score = package.compliance_score * TRINITY_COMPLIANCE_WEIGHT;

    let component_scores: Vec<f64> = [&package.power_source, &package.feeder, &package.cooler]
        .into_iter()
        .flatten()
        .map(|c| c.compatibility_score)
        .collect();
    if !component_scores.is_empty() {
        let mean = component_scores.iter().sum::<f64>() / component_scores.len() as f64;
        score += mean * COMPATIBILITY_WEIGHT;
    }

    let sales_frequency = package.total_sales_frequency().min(SALES_FREQUENCY_NORMALIZATION_CAP) as f64;
    score += (sales_frequency / SALES_FREQUENCY_NORMALIZATION_CAP as f64) * POPULARITY_WEIGHT;

    score += price_consistency(package) * PRICE_CONSISTENCY_WEIGHT;

    score += intent_match_bonus(package, original_query);

    let mut business_adjustment = preferred_manufacturer_boost(package);
    if let Some(fits) = organization_fits_tier {
        business_adjustment += if fits { 0.05 } else { -0.05 };
    }
    score += business_adjustment.clamp(-BUSINESS_ADJUSTMENT_CAP, BUSINESS_ADJUSTMENT_CAP);

    if mode == ExpertiseMode::Expert {
        score = (score * config.expert_score_multiplier).min(1.0);
    }

    score.clamp(0.0, 1.0)
}

/// `+weight` for each trinity member whose name and the original query
/// both contain the same product-name keyword — at most one hit per
/// component, sum capped at `0.15` (§4.6.5).
pub fn intent_match_bonus(package: &TrinityPackage, original_query: &str) -> f64 {
    let lower_query = original_query.to_lowercase();
    if lower_query.is_empty() {
        return 0.0;
    }

    let mut bonus = 0.0;
    for component in [&package.power_source, &package.feeder, &package.cooler].into_iter().flatten() {
        let lower_name = component.product.name.to_lowercase();
        for (keyword, weight) in PRODUCT_KEYWORDS.iter() {
            if lower_query.contains(keyword) && lower_name.contains(keyword) {
                bonus += weight;
                break;
            }
        }
    }

    bonus.min(INTENT_MATCH_BONUS_CAP)
}

/// Convenience wrapper combining `fits_preferred_pricing_tier` with
/// `score_package` for callers that already have a `UserContext`.
pub fn score_package_with_context(
    package: &TrinityPackage,
    original_query: &str,
    mode: ExpertiseMode,
    context: &wr_intent::UserContext,
    config: &RecommendConfig,
) -> f64 {
    let fits = Some(fits_preferred_pricing_tier(package, context));
    score_package(package, original_query, mode, fits, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PackageComponent;
    use wr_core::{Category, Product};

    fn component(name: &str, price: f64, sales_frequency: u32) -> PackageComponent {
        let mut product = Product::placeholder(Category::PowerSource, name);
        product.price = Some(price);
        product.sales_frequency = sales_frequency;
        PackageComponent { product, compatibility_score: 0.9 }
    }

    fn sample_package() -> TrinityPackage {
        TrinityPackage {
            power_source: Some(component("Aristo 500ix", 4000.0, 50)),
            feeder: Some(component("RobustFeed U82", 800.0, 30)),
            cooler: Some(component("Cool2 2000w", 600.0, 20)),
            accessories: vec![],
            consumables: vec![],
            package_score: 0.0,
            trinity_compliance: true,
            compliance_score: 1.0,
            total_price: 5400.0,
            algorithm_source: "test".into(),
            search_metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn intent_match_bonus_hits_on_shared_keyword() {
        let package = sample_package();
        let bonus = intent_match_bonus(&package, "I need an Aristo 500ix for my shop");
        assert!(bonus > 0.0);
        assert!(bonus <= INTENT_MATCH_BONUS_CAP);
    }

    #[test]
    fn no_query_overlap_yields_zero_bonus() {
        let package = sample_package();
        assert_eq!(intent_match_bonus(&package, "need a welder for steel"), 0.0);
    }

    #[test]
    fn full_score_is_clamped_to_unit_interval() {
        let package = sample_package();
        let score = score_package(&package, "Aristo 500ix package", ExpertiseMode::Expert, Some(true), &RecommendConfig::default());
        assert!((0.0..=1.0).contains(&score));
    }
}
