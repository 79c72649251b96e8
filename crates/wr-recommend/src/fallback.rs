//! Last-resort fallback (§4.6.6 step 4): when candidate gathering and
//! standard/expert package formation all come up empty, fall back to one
//! package built purely from sales-frequency leaders.

use wr_graph::{category_by_sales, GraphClient};
use wr_intent::ProcessedIntent;

use crate::error::RecommendResult;
use crate::scoring::score_package;
use crate::types::{PackageComponent, RecommendConfig, TrinityPackage};

const SALES_FREQUENCY_FALLBACK_LIMIT: usize = 1;

/// Builds a single package from the top sales-frequency product in each
/// Trinity category, with no graph traversal or semantic search involved.
pub async fn sales_frequency_fallback_package(
    graph: &GraphClient,
    intent: &ProcessedIntent,
    config: &RecommendConfig,
) -> RecommendResult<Option<TrinityPackage>> {
    let power_source = category_by_sales(graph, wr_core::Category::PowerSource, SALES_FREQUENCY_FALLBACK_LIMIT)
        .await?
        .into_iter()
        .next();
    let feeder = category_by_sales(graph, wr_core::Category::Feeder, SALES_FREQUENCY_FALLBACK_LIMIT)
        .await?
        .into_iter()
        .next();
    let cooler = category_by_sales(graph, wr_core::Category::Cooler, SALES_FREQUENCY_FALLBACK_LIMIT)
        .await?
        .into_iter()
        .next();

    let (Some(power_source), Some(feeder), Some(cooler)) = (power_source, feeder, cooler) else {
        return Ok(None);
    };

    let total_price = [&power_source, &feeder, &cooler].iter().filter_map(|p| p.product.price).sum();
    let present_count = 3;

    let mut package = TrinityPackage {
        power_source: Some(PackageComponent { product: power_source.product, compatibility_score: 0.5 }),
        feeder: Some(PackageComponent { product: feeder.product, compatibility_score: 0.5 }),
        cooler: Some(PackageComponent { product: cooler.product, compatibility_score: 0.5 }),
        accessories: Vec::new(),
        consumables: Vec::new(),
        package_score: 0.0,
        trinity_compliance: true,
        compliance_score: present_count as f64 / 3.0,
        total_price,
        algorithm_source: "sales_frequency_fallback".to_string(),
        search_metadata: serde_json::json!({ "fallback": true }),
    };

    let mode = intent.mode.unwrap_or_default();
    package.package_score = score_package(&package, &intent.translated_query, mode, None, config);

    Ok(Some(package))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_constant_is_single_leader_per_category() {
        assert_eq!(SALES_FREQUENCY_FALLBACK_LIMIT, 1);
    }
}
