//! Shared types for the recommendation engine (§4.6, §3 Glossary).

use serde::{Deserialize, Serialize};
use wr_core::Product;

/// A single scored component inside a package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageComponent {
    pub product: Product,
    pub compatibility_score: f64,
}

/// A formed PowerSource + Feeder + Cooler package, plus any accessories
/// and consumables the expert-package path or Trinity accessory lookup
/// attached (§3 Glossary, §4.6.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrinityPackage {
    pub power_source: Option<PackageComponent>,
    pub feeder: Option<PackageComponent>,
    pub cooler: Option<PackageComponent>,
    pub accessories: Vec<PackageComponent>,
    pub consumables: Vec<PackageComponent>,

    pub package_score: f64,
    pub trinity_compliance: bool,
    pub compliance_score: f64,
    pub total_price: f64,

    pub algorithm_source: String,
    pub search_metadata: serde_json::Value,
}

impl TrinityPackage {
    pub fn total_sales_frequency(&self) -> u64 {
        [&self.power_source, &self.feeder, &self.cooler]
            .into_iter()
            .flatten()
            .map(|c| c.product.sales_frequency as u64)
            .sum()
    }

    pub fn all_component_gins(&self) -> Vec<String> {
        let mut gins = Vec::new();
        for component in [&self.power_source, &self.feeder, &self.cooler].into_iter().flatten() {
            gins.push(component.product.gin.clone());
        }
        for component in self.accessories.iter().chain(self.consumables.iter()) {
            gins.push(component.product.gin.clone());
        }
        gins
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStrategy {
    GraphFocused,
    Hybrid,
    GuidedFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphAlgorithm {
    ShortestPath,
    Pagerank,
    Centrality,
    TrinitySemanticSearch,
    ProductSpecificSearch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub strategy: SearchStrategy,
    pub algorithms: Vec<GraphAlgorithm>,
    pub weights: std::collections::HashMap<String, f64>,
    pub reasoning: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfidenceDistribution {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

/// Public output of `RecommendationEngine::recommend` (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecommendations {
    pub packages: Vec<TrinityPackage>,
    pub total_packages_found: usize,
    pub search_metadata: Option<RoutingDecision>,
    pub algorithms_used: Vec<GraphAlgorithm>,
    pub confidence_distribution: ConfidenceDistribution,
    pub trinity_formation_rate: f64,
    pub needs_follow_up: bool,
}

impl ScoredRecommendations {
    pub fn empty(needs_follow_up: bool) -> Self {
        ScoredRecommendations {
            packages: Vec::new(),
            total_packages_found: 0,
            search_metadata: None,
            algorithms_used: Vec::new(),
            confidence_distribution: ConfidenceDistribution::default(),
            trinity_formation_rate: 0.0,
            needs_follow_up,
        }
    }
}

/// Candidate pools gathered per category before Trinity assembly (§4.6.3).
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    pub power_sources: Vec<PackageComponent>,
    pub feeders: Vec<PackageComponent>,
    pub coolers: Vec<PackageComponent>,
}

/// Tunables the original hardcoded, resolved as config fields rather
/// than constants (Open Question 3): the expert-mode score multiplier
/// and the golden-package backfill target category count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecommendConfig {
    pub expert_score_multiplier: f64,
    pub golden_package_target_categories: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        RecommendConfig { expert_score_multiplier: 1.1, golden_package_target_categories: 7 }
    }
}
