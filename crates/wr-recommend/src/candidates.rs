//! Candidate gathering (§4.6.3): PowerSources, Feeders, and Coolers
//! pulled from the graph store and scored against the intent before
//! Trinity assembly.

use std::collections::HashMap;

use wr_core::{Category, Product};
use wr_embedding::EmbeddingClient;
use wr_graph::{
    category_by_sales, compatible_in_category, determines_in_category, hybrid_search, pagerank_popular,
    GraphClient, ScoredProduct,
};
use wr_intent::ProcessedIntent;

use crate::error::RecommendResult;
use crate::types::{Candidates, PackageComponent, SearchStrategy};

const MAX_HOPS_GRAPH_FOCUSED: u32 = 2;
const MAX_HOPS_HYBRID: u32 = 1;
const PER_CATEGORY_LIMIT: usize = 10;
const POWER_SOURCE_SEED_LIMIT: usize = 5;
const TOP_POWER_SOURCES_FOR_TRAVERSAL: usize = 2;

pub async fn gather_candidates(
    graph: &GraphClient,
    embedding: &EmbeddingClient,
    vocabulary: &wr_core::DomainVocabulary,
    intent: &ProcessedIntent,
    strategy: SearchStrategy,
) -> RecommendResult<Candidates> {
    let power_sources = gather_power_sources(graph, embedding, vocabulary, intent).await?;

    let max_hops = match strategy {
        SearchStrategy::GraphFocused => MAX_HOPS_GRAPH_FOCUSED,
        _ => MAX_HOPS_HYBRID,
    };

    let seed_gins: Vec<&str> = power_sources.iter().take(TOP_POWER_SOURCES_FOR_TRAVERSAL).map(|c| c.product.gin.as_str()).collect();

    let mut feeders = gather_compatible_category(graph, &seed_gins, Category::Feeder, max_hops).await?;
    let mut coolers = gather_compatible_category(graph, &seed_gins, Category::Cooler, max_hops).await?;

    if matches!(strategy, SearchStrategy::GraphFocused) {
        top_up_with_pagerank(graph, &seed_gins, &mut feeders, Category::Feeder).await?;
        top_up_with_pagerank(graph, &seed_gins, &mut coolers, Category::Cooler).await?;
    }

    if feeders.is_empty() {
        feeders = category_by_sales(graph, Category::Feeder, PER_CATEGORY_LIMIT).await?;
    }
    if coolers.is_empty() {
        coolers = category_by_sales(graph, Category::Cooler, PER_CATEGORY_LIMIT).await?;
    }

    Ok(Candidates {
        power_sources: score_and_rank(power_sources, intent),
        feeders: score_and_rank(feeders, intent),
        coolers: score_and_rank(coolers, intent),
    })
}

async fn gather_power_sources(
    graph: &GraphClient,
    embedding: &EmbeddingClient,
    vocabulary: &wr_core::DomainVocabulary,
    intent: &ProcessedIntent,
) -> RecommendResult<Vec<ScoredProduct>> {
    if let Some(product) = &intent.mentioned_product {
        let results = wr_graph::search_products(graph, &product.family, Category::PowerSource, POWER_SOURCE_SEED_LIMIT).await?;
        if !results.is_empty() {
            let candidates = fetch_products_for_search_results(graph, &results).await?;
            if !candidates.is_empty() {
                return Ok(candidates);
            }
        }
    }

    let query_embedding = embedding.embed_query(&intent.translated_query, vocabulary).await?;
    let semantic = hybrid_search(graph, &query_embedding, Some(Category::PowerSource), 0.6, PER_CATEGORY_LIMIT).await?;
    if !semantic.is_empty() {
        return Ok(semantic);
    }

    category_by_sales(graph, Category::PowerSource, PER_CATEGORY_LIMIT)
        .await
        .map_err(Into::into)
}

async fn fetch_products_for_search_results(
    graph: &GraphClient,
    results: &[wr_graph::ProductSearchResult],
) -> RecommendResult<Vec<ScoredProduct>> {
    let mut out = Vec::with_capacity(results.len());
    for result in results {
        if let Some(product) = wr_graph::fetch_product_by_gin(graph, &result.product_id).await? {
            out.push(ScoredProduct { product, score: result.match_score });
        }
    }
    Ok(out)
}

/// `DETERMINES` is a hard filter (§4.6.3, open question 1): when a seed
/// PowerSource has outgoing `DETERMINES` edges into `category`, only
/// those determined products are eligible for that seed and the broader
/// `COMPATIBLE_WITH`/`CO_OCCURS` traversal is skipped for it entirely.
/// Seeds with no `DETERMINES` edges fall back to the traversal as before.
async fn gather_compatible_category(
    graph: &GraphClient,
    seed_gins: &[&str],
    category: Category,
    max_hops: u32,
) -> RecommendResult<Vec<ScoredProduct>> {
    let mut by_gin: HashMap<String, ScoredProduct> = HashMap::new();
    for seed in seed_gins {
        let determined = determines_in_category(graph, seed, category, PER_CATEGORY_LIMIT).await?;
        if !determined.is_empty() {
            merge_scored(&mut by_gin, determined);
            continue;
        }
        let found = compatible_in_category(graph, seed, category, max_hops, PER_CATEGORY_LIMIT).await?;
        merge_scored(&mut by_gin, found);
    }
    Ok(rank_and_truncate(by_gin))
}

fn merge_scored(by_gin: &mut HashMap<String, ScoredProduct>, found: Vec<ScoredProduct>) {
    for candidate in found {
        by_gin
            .entry(candidate.product.gin.clone())
            .and_modify(|existing| {
                if candidate.score > existing.score {
                    existing.score = candidate.score;
                }
            })
            .or_insert(candidate);
    }
}

fn rank_and_truncate(by_gin: HashMap<String, ScoredProduct>) -> Vec<ScoredProduct> {
    let mut merged: Vec<ScoredProduct> = by_gin.into_values().collect();
    merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    merged.truncate(PER_CATEGORY_LIMIT);
    merged
}

async fn top_up_with_pagerank(
    graph: &GraphClient,
    seed_gins: &[&str],
    existing: &mut Vec<ScoredProduct>,
    category: Category,
) -> RecommendResult<()> {
    if existing.len() >= PER_CATEGORY_LIMIT || seed_gins.is_empty() {
        return Ok(());
    }
    let mut seen: std::collections::HashSet<String> = existing.iter().map(|c| c.product.gin.clone()).collect();
    for seed in seed_gins {
        let popular = pagerank_popular(graph, seed, PER_CATEGORY_LIMIT).await?;
        for candidate in popular.into_iter().filter(|c| c.product.category.as_str() == category.as_str()) {
            if seen.insert(candidate.product.gin.clone()) {
                existing.push(candidate);
            }
            if existing.len() >= PER_CATEGORY_LIMIT {
                break;
            }
        }
    }
    Ok(())
}

/// Blends graph score with intent-relevance to produce `compatibility_score`,
/// then keeps the top `PER_CATEGORY_LIMIT` (§4.6.3 step 3).
fn score_and_rank(mut scored: Vec<ScoredProduct>, intent: &ProcessedIntent) -> Vec<PackageComponent> {
    scored.sort_by(|a, b| {
        let score_a = blended_score(a, intent);
        let score_b = blended_score(b, intent);
        score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(PER_CATEGORY_LIMIT);
    scored
        .into_iter()
        .map(|s| {
            let compatibility_score = blended_score(&s, intent);
            PackageComponent { product: s.product, compatibility_score }
        })
        .collect()
}

fn blended_score(scored: &ScoredProduct, intent: &ProcessedIntent) -> f64 {
    let relevance = score_component_compatibility(&scored.product, intent);
    0.6 * scored.score + 0.4 * relevance
}

/// How well a candidate matches the intent's process/material/industry
/// tokens, ported from `_score_component_compatibility`.
pub fn score_component_compatibility(product: &Product, intent: &ProcessedIntent) -> f64 {
    let haystack = format!(
        "{} {}",
        product.name.to_lowercase(),
        product.description.clone().unwrap_or_default().to_lowercase()
    );

    let mut hits = 0u32;
    let mut total = 0u32;

    for process in &intent.processes {
        total += 1;
        if haystack.contains(&process.to_lowercase()) {
            hits += 1;
        }
    }
    if let Some(material) = &intent.material {
        total += 1;
        if haystack.contains(&material.to_lowercase()) {
            hits += 1;
        }
    }
    if let Some(industry) = &intent.industry {
        total += 1;
        if haystack.contains(&industry.to_lowercase()) {
            hits += 1;
        }
    }
    if let Some(application) = &intent.application {
        total += 1;
        if haystack.contains(&application.to_lowercase()) {
            hits += 1;
        }
    }

    let token_score = if total == 0 { 0.5 } else { hits as f64 / total as f64 };
    let popularity = (product.sales_frequency as f64 / 200.0).min(1.0);

    (0.7 * token_score + 0.3 * popularity).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wr_core::Category;

    fn product_with_name(name: &str) -> Product {
        Product::placeholder(Category::PowerSource, name)
    }

    #[test]
    fn matching_process_raises_compatibility_score() {
        let mut intent = ProcessedIntent::default();
        intent.processes = vec!["MIG".to_string()];
        let mut product = product_with_name("Aristo Mig 500ix");
        product.description = Some("A versatile MIG welding power source".to_string());

        let score = score_component_compatibility(&product, &intent);
        assert!(score > 0.5);
    }

    #[test]
    fn no_intent_signals_returns_neutral_score() {
        let intent = ProcessedIntent::default();
        let product = product_with_name("Aristo 500ix");
        let score = score_component_compatibility(&product, &intent);
        assert!((0.3..=0.4).contains(&score));
    }
}
