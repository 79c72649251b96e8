//! Trinity-first semantic path (§4.6.2): when the query itself is asking
//! for a complete package rather than a single part, skip per-category
//! candidate gathering and seed directly from known Trinity co-purchases.

use wr_core::Product;
use wr_embedding::EmbeddingClient;
use wr_graph::{trinities_by_power_source_name, trinity_accessories, trinity_members, GraphClient};

use crate::error::RecommendResult;
use crate::types::{PackageComponent, TrinityPackage};

const TRINITY_SEMANTIC_LIMIT: usize = 5;
const TRINITY_ACCESSORY_LIMIT: usize = 5;

/// Keywords that signal the caller wants a complete, pre-bundled setup
/// rather than a single component (§4.6.2 step 1).
const TRINITY_KEYWORDS: &[&str] = &["package", "kit", "setup", "complete", "system", "trinity", "combination"];

pub fn query_wants_trinity(query: &str) -> bool {
    let lower = query.to_lowercase();
    TRINITY_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Runs the Trinity-first path: embeds the query, finds the best-matching
/// Trinities by PowerSource similarity, and materializes each into a full
/// package with co-occurrence accessories. Falls through to a PowerSource
/// name search when the semantic pass returns nothing.
pub async fn search_trinity_packages(
    graph: &GraphClient,
    embedding: &EmbeddingClient,
    vocabulary: &wr_core::DomainVocabulary,
    query: &str,
    mentioned_family: Option<&str>,
) -> RecommendResult<Vec<TrinityPackage>> {
    let query_embedding = embedding.embed_query(query, vocabulary).await?;
    let scored = wr_graph::search_trinities_by_embedding(graph, &query_embedding, TRINITY_SEMANTIC_LIMIT).await?;

    let trinities = if !scored.is_empty() {
        scored.into_iter().map(|s| (s.trinity, s.score)).collect::<Vec<_>>()
    } else if let Some(family) = mentioned_family {
        trinities_by_power_source_name(graph, family, TRINITY_SEMANTIC_LIMIT)
            .await?
            .into_iter()
            .map(|t| (t, 0.5))
            .collect()
    } else {
        Vec::new()
    };

    let mut packages = Vec::with_capacity(trinities.len());
    for (trinity, score) in trinities {
        let Some(members) = trinity_members(graph, &trinity).await? else {
            continue;
        };
        let accessories = trinity_accessories(graph, &trinity, TRINITY_ACCESSORY_LIMIT).await?;

        packages.push(build_package(members, accessories, score));
    }

    Ok(packages)
}

fn build_package(
    members: wr_graph::TrinityMembers,
    accessories: Vec<wr_graph::ScoredProduct>,
    trinity_score: f64,
) -> TrinityPackage {
    let total_price = [&members.power_source, &members.feeder, &members.cooler]
        .iter()
        .filter_map(|p: &&Product| p.price)
        .sum::<f64>()
        + accessories.iter().filter_map(|a| a.product.price).sum::<f64>();

    TrinityPackage {
        power_source: Some(PackageComponent { product: members.power_source, compatibility_score: trinity_score }),
        feeder: Some(PackageComponent { product: members.feeder, compatibility_score: trinity_score }),
        cooler: Some(PackageComponent { product: members.cooler, compatibility_score: trinity_score }),
        accessories: accessories
            .into_iter()
            .map(|a| PackageComponent { product: a.product, compatibility_score: a.score.min(1.0) })
            .collect(),
        consumables: Vec::new(),
        package_score: 0.0,
        trinity_compliance: true,
        compliance_score: 1.0,
        total_price,
        algorithm_source: "trinity_semantic_search".to_string(),
        search_metadata: serde_json::json!({ "trinity_similarity": trinity_score }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trinity_keyword_triggers_trinity_path() {
        assert!(query_wants_trinity("I need a complete welding package for my shop"));
        assert!(query_wants_trinity("looking for a full MIG kit"));
    }

    #[test]
    fn plain_query_does_not_trigger_trinity_path() {
        assert!(!query_wants_trinity("need a wire feeder for aluminum"));
    }
}
