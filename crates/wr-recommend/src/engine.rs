//! Top-level recommendation engine (§4.6): wires routing, Trinity search,
//! candidate gathering, package formation, fallback, and metrics together.

use wr_core::DomainVocabulary;
use wr_embedding::EmbeddingClient;
use wr_graph::GraphClient;
use wr_intent::{ExpertiseMode, ProcessedIntent, UserContext};

use crate::candidates::gather_candidates;
use crate::error::RecommendResult;
use crate::fallback::sales_frequency_fallback_package;
use crate::metrics::{confidence_distribution, trinity_formation_rate};
use crate::package_former::{form_expert_package, form_standard_packages};
use crate::scoring::score_package_with_context;
use crate::strategy::make_routing_decision;
use crate::trinity_search::{query_wants_trinity, search_trinity_packages};
use crate::types::{RecommendConfig, ScoredRecommendations};

const KEPT_PACKAGES: usize = 10;

#[derive(Clone)]
pub struct RecommendationEngine {
    graph: GraphClient,
    embedding: EmbeddingClient,
    vocabulary: DomainVocabulary,
    config: RecommendConfig,
}

impl RecommendationEngine {
    pub fn new(graph: GraphClient, embedding: EmbeddingClient, vocabulary: DomainVocabulary) -> Self {
        Self::with_config(graph, embedding, vocabulary, RecommendConfig::default())
    }

    pub fn with_config(
        graph: GraphClient,
        embedding: EmbeddingClient,
        vocabulary: DomainVocabulary,
        config: RecommendConfig,
    ) -> Self {
        RecommendationEngine { graph, embedding, vocabulary, config }
    }

    /// Runs the full recommendation pipeline for an already-processed
    /// intent (§4.6).
    pub async fn recommend(&self, intent: &ProcessedIntent, context: &UserContext) -> RecommendResult<ScoredRecommendations> {
        let routing = make_routing_decision(intent);

        let mut packages = if query_wants_trinity(&intent.translated_query) {
            let family = intent.mentioned_product.as_ref().map(|p| p.family.as_str());
            search_trinity_packages(&self.graph, &self.embedding, &self.vocabulary, &intent.translated_query, family).await?
        } else {
            Vec::new()
        };

        if packages.is_empty() {
            let candidates = gather_candidates(&self.graph, &self.embedding, &self.vocabulary, intent, routing.strategy).await?;

            let mode = intent.mode.unwrap_or_default();
            if matches!(mode, ExpertiseMode::Expert | ExpertiseMode::Hybrid) {
                if let Some(expert_package) = form_expert_package(&self.graph, &candidates, intent, context, &self.config).await? {
                    packages.push(expert_package);
                }
            }

            packages.append(&mut form_standard_packages(&candidates, intent, context, &self.config));

            if packages.is_empty() {
                if let Some(fallback_package) = sales_frequency_fallback_package(&self.graph, intent, &self.config).await? {
                    packages.push(fallback_package);
                }
            }
        }

        if packages.is_empty() {
            return Ok(ScoredRecommendations::empty(true));
        }

        let mode = intent.mode.unwrap_or_default();
        for package in packages.iter_mut() {
            if package.package_score == 0.0 {
                package.package_score = score_package_with_context(package, &intent.translated_query, mode, context, &self.config);
            }
        }

        packages.sort_by(|a, b| {
            b.package_score
                .partial_cmp(&a.package_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.total_sales_frequency().cmp(&a.total_sales_frequency()))
                .then_with(|| a.total_price.partial_cmp(&b.total_price).unwrap_or(std::cmp::Ordering::Equal))
        });
        packages.truncate(KEPT_PACKAGES);

        Ok(ScoredRecommendations {
            total_packages_found: packages.len(),
            algorithms_used: routing.algorithms.clone(),
            confidence_distribution: confidence_distribution(&packages),
            trinity_formation_rate: trinity_formation_rate(&packages),
            search_metadata: Some(routing),
            needs_follow_up: false,
            packages,
        })
    }
}
