//! Strategy routing (§4.6.1): pick the graph algorithms and weights the
//! rest of the engine uses for this query.

use wr_intent::{ExpertiseMode, ProcessedIntent};

use crate::types::{GraphAlgorithm, RoutingDecision, SearchStrategy};

const EXPERT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Raw-query phrases that force the Guided-flow strategy regardless of
/// expertise mode, grounded in `_make_routing_decision`'s `guided_flow_patterns`.
const GUIDED_FLOW_PATTERNS: &[&str] =
    &["form a package with", "complete setup for a beginner", "multi-process machine"];

pub fn make_routing_decision(intent: &ProcessedIntent) -> RoutingDecision {
    let lower_query = intent.translated_query.to_lowercase();

    if GUIDED_FLOW_PATTERNS.iter().any(|pattern| lower_query.contains(pattern)) {
        return RoutingDecision {
            strategy: SearchStrategy::GuidedFlow,
            algorithms: vec![GraphAlgorithm::ProductSpecificSearch, GraphAlgorithm::Pagerank],
            weights: weights(&[("semantic", 0.3), ("compatibility", 0.4), ("popularity", 0.3)]),
            reasoning: "query matches a guided-flow intent pattern".to_string(),
            confidence: 0.8,
        };
    }

    let is_expert = intent.mode == Some(ExpertiseMode::Expert) && intent.confidence > EXPERT_CONFIDENCE_THRESHOLD;

    if is_expert {
        RoutingDecision {
            strategy: SearchStrategy::GraphFocused,
            algorithms: vec![GraphAlgorithm::ShortestPath, GraphAlgorithm::Pagerank],
            weights: weights(&[("compatibility", 0.8), ("popularity", 0.2), ("semantic", 0.0)]),
            reasoning: format!(
                "expert mode with confidence {:.2} above threshold {:.2}; favoring graph traversal over semantic search",
                intent.confidence, EXPERT_CONFIDENCE_THRESHOLD
            ),
            confidence: intent.confidence,
        }
    } else {
        RoutingDecision {
            strategy: SearchStrategy::Hybrid,
            algorithms: vec![GraphAlgorithm::ShortestPath, GraphAlgorithm::Centrality],
            weights: weights(&[("semantic", 0.4), ("compatibility", 0.6), ("popularity", 0.0)]),
            reasoning: "non-expert or low-confidence intent; seeding with semantic similarity then traversing compatibility"
                .to_string(),
            confidence: intent.confidence,
        }
    }
}

fn weights(pairs: &[(&str, f64)]) -> std::collections::HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(mode: ExpertiseMode, confidence: f32, query: &str) -> ProcessedIntent {
        ProcessedIntent {
            translated_query: query.to_string(),
            mode: Some(mode),
            confidence,
            ..Default::default()
        }
    }

    #[test]
    fn expert_high_confidence_routes_graph_focused() {
        let decision = make_routing_decision(&intent(ExpertiseMode::Expert, 0.9, "need a welder"));
        assert_eq!(decision.strategy, SearchStrategy::GraphFocused);
    }

    #[test]
    fn expert_low_confidence_falls_back_to_hybrid() {
        let decision = make_routing_decision(&intent(ExpertiseMode::Expert, 0.5, "need a welder"));
        assert_eq!(decision.strategy, SearchStrategy::Hybrid);
    }

    #[test]
    fn guided_phrase_overrides_expert_mode() {
        let decision = make_routing_decision(&intent(
            ExpertiseMode::Expert,
            0.95,
            "please form a package with a power source and feeder",
        ));
        assert_eq!(decision.strategy, SearchStrategy::GuidedFlow);
    }

    #[test]
    fn hybrid_mode_routes_hybrid() {
        let decision = make_routing_decision(&intent(ExpertiseMode::Hybrid, 0.5, "need a welder"));
        assert_eq!(decision.strategy, SearchStrategy::Hybrid);
    }
}
