//! Trinity assembly from gathered candidates (§4.6.4): the standard
//! cross-product former and the expert-mode co-occurrence former.

use std::collections::HashSet;

use wr_graph::{co_ordered_with_trinity, golden_package_gins, most_compatible_by_sales, GraphClient};
use wr_intent::{ProcessedIntent, UserContext};

use crate::business::fits_preferred_pricing_tier;
use crate::error::RecommendResult;
use crate::scoring::score_package;
use crate::types::{Candidates, PackageComponent, RecommendConfig, TrinityPackage};

const TOP_POWER_SOURCES: usize = 3;
const TOP_SECONDARY: usize = 2;
const MAX_STANDARD_PACKAGES: usize = 12;
const KEPT_PACKAGES: usize = 10;
const EXPERT_ACCESSORY_LIMIT: usize = 10;

/// Cross-product of the top PowerSources/Feeders/Coolers, each combination
/// scored and business-adjusted, sorted best-first (§4.6.4 step 1-2).
pub fn form_standard_packages(
    candidates: &Candidates,
    intent: &ProcessedIntent,
    context: &UserContext,
    config: &RecommendConfig,
) -> Vec<TrinityPackage> {
    let power_sources = candidates.power_sources.iter().take(TOP_POWER_SOURCES);
    let mut packages = Vec::with_capacity(MAX_STANDARD_PACKAGES);

    for power_source in power_sources {
        for feeder in candidates.feeders.iter().take(TOP_SECONDARY) {
            for cooler in candidates.coolers.iter().take(TOP_SECONDARY) {
                if packages.len() >= MAX_STANDARD_PACKAGES {
                    break;
                }
                packages.push(assemble(power_source.clone(), feeder.clone(), cooler.clone()));
            }
        }
    }

    score_and_sort(&mut packages, intent, context, config);
    packages.truncate(KEPT_PACKAGES);
    packages
}

fn assemble(power_source: PackageComponent, feeder: PackageComponent, cooler: PackageComponent) -> TrinityPackage {
    let total_price = [&power_source, &feeder, &cooler].iter().filter_map(|c| c.product.price).sum();
    let mut package = TrinityPackage {
        power_source: Some(power_source),
        feeder: Some(feeder),
        cooler: Some(cooler),
        accessories: Vec::new(),
        consumables: Vec::new(),
        package_score: 0.0,
        trinity_compliance: true,
        compliance_score: 1.0,
        total_price,
        algorithm_source: "standard_cross_product".to_string(),
        search_metadata: serde_json::json!({}),
    };
    package.compliance_score = compliance_score(&package);
    package
}

fn compliance_score(package: &TrinityPackage) -> f64 {
    let present = [&package.power_source, &package.feeder, &package.cooler]
        .iter()
        .filter(|c| c.is_some())
        .count();
    present as f64 / 3.0
}

fn score_and_sort(packages: &mut [TrinityPackage], intent: &ProcessedIntent, context: &UserContext, config: &RecommendConfig) {
    let mode = intent.mode.unwrap_or_default();
    for package in packages.iter_mut() {
        let fits_tier = Some(fits_preferred_pricing_tier(package, context));
        package.package_score = score_package(package, &intent.translated_query, mode, fits_tier, config);
    }
    packages.sort_by(|a, b| {
        b.package_score
            .partial_cmp(&a.package_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.total_sales_frequency().cmp(&a.total_sales_frequency()))
            .then_with(|| a.total_price.partial_cmp(&b.total_price).unwrap_or(std::cmp::Ordering::Equal))
    });
}

/// Expert/hybrid package formation (§4.6.4 step 3): seed from the top
/// PowerSource's most sales-frequent compatible Feeder and Cooler, pull in
/// frequently co-ordered accessories, and fill out to
/// `config.golden_package_target_categories` distinct categories from a
/// GoldenPackage when the co-occurrence data alone falls short.
pub async fn form_expert_package(
    graph: &GraphClient,
    candidates: &Candidates,
    intent: &ProcessedIntent,
    context: &UserContext,
    config: &RecommendConfig,
) -> RecommendResult<Option<TrinityPackage>> {
    let Some(power_source) = candidates.power_sources.first() else {
        return Ok(None);
    };

    let feeder = most_compatible_by_sales(graph, &power_source.product.gin, wr_core::Category::Feeder).await?;
    let cooler = most_compatible_by_sales(graph, &power_source.product.gin, wr_core::Category::Cooler).await?;

    let (Some(feeder), Some(cooler)) = (feeder, cooler) else {
        return Ok(None);
    };

    let trinity_gins = vec![power_source.product.gin.clone(), feeder.gin.clone(), cooler.gin.clone()];
    let co_ordered = co_ordered_with_trinity(graph, &trinity_gins, EXPERT_ACCESSORY_LIMIT).await?;

    let mut seen_categories: HashSet<&'static str> = HashSet::new();
    seen_categories.insert(power_source.product.category.as_str());
    seen_categories.insert(feeder.category.as_str());
    seen_categories.insert(cooler.category.as_str());

    let mut accessories = Vec::new();
    for candidate in co_ordered {
        let category = candidate.product.category.as_str();
        if seen_categories.insert(category) {
            accessories.push(PackageComponent { product: candidate.product, compatibility_score: candidate.score.min(1.0) });
        }
    }

    if seen_categories.len() < config.golden_package_target_categories {
        let golden_gins = golden_package_gins(graph, &power_source.product.gin).await?;
        for gin in golden_gins {
            if accessories.len() + 3 >= config.golden_package_target_categories {
                break;
            }
            if trinity_gins.contains(&gin) || accessories.iter().any(|a: &PackageComponent| a.product.gin == gin) {
                continue;
            }
            if let Some(product) = wr_graph::fetch_product_by_gin(graph, &gin).await? {
                if seen_categories.insert(product.category.as_str()) {
                    accessories.push(PackageComponent { product, compatibility_score: 0.6 });
                }
            }
        }
    }

    let total_price = [power_source.product.price, feeder.price, cooler.price]
        .into_iter()
        .flatten()
        .sum::<f64>()
        + accessories.iter().filter_map(|a| a.product.price).sum::<f64>();

    let mut package = TrinityPackage {
        power_source: Some(power_source.clone()),
        feeder: Some(PackageComponent { product: feeder, compatibility_score: 0.9 }),
        cooler: Some(PackageComponent { product: cooler, compatibility_score: 0.9 }),
        accessories,
        consumables: Vec::new(),
        package_score: 0.0,
        trinity_compliance: true,
        compliance_score: 1.0,
        total_price,
        algorithm_source: "expert_co_occurrence".to_string(),
        search_metadata: serde_json::json!({ "categories_covered": seen_categories.len() }),
    };

    let mode = intent.mode.unwrap_or_default();
    let fits_tier = Some(fits_preferred_pricing_tier(&package, context));
    package.package_score = score_package(&package, &intent.translated_query, mode, fits_tier, config);

    Ok(Some(package))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wr_core::{Category, Product};

    fn component(category: Category, name: &str, price: f64) -> PackageComponent {
        let mut product = Product::placeholder(category, name);
        product.price = Some(price);
        PackageComponent { product, compatibility_score: 0.8 }
    }

    #[test]
    fn cross_product_stays_within_cap_and_sorts_best_first() {
        let candidates = Candidates {
            power_sources: vec![
                component(Category::PowerSource, "PS1", 4000.0),
                component(Category::PowerSource, "PS2", 3500.0),
                component(Category::PowerSource, "PS3", 3000.0),
            ],
            feeders: vec![component(Category::Feeder, "F1", 800.0), component(Category::Feeder, "F2", 750.0)],
            coolers: vec![component(Category::Cooler, "C1", 600.0), component(Category::Cooler, "C2", 550.0)],
        };
        let intent = ProcessedIntent::default();
        let context = UserContext::default();

        let packages = form_standard_packages(&candidates, &intent, &context, &RecommendConfig::default());
        assert!(packages.len() <= KEPT_PACKAGES);
        assert!(!packages.is_empty());
        for window in packages.windows(2) {
            assert!(window[0].package_score >= window[1].package_score);
        }
    }
}
