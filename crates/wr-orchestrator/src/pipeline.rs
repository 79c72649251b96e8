//! Pipeline (§4.8): a plain state machine driving the three agents in
//! sequence — intent processing, recommendation generation, response
//! composition — with per-stage timers and a catastrophic-failure
//! minimal response when recommendation generation can't recover.

use std::time::{Duration, Instant};

use tracing::{error, info, warn};
use wr_compose::ComposedResponse;
use wr_intent::{IntentProcessor, ProcessedIntent, UserContext};
use wr_recommend::RecommendationEngine;

use crate::metrics::{MetricsRegistry, StageTiming, WorkflowMetrics, DEFAULT_CAPACITY};

const DEFAULT_RECOMMEND_TIMEOUT: Duration = Duration::from_secs(30);
const LOW_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// Wires the three components together behind one entry point
/// (`process`), matching the teacher's composition-root pattern of
/// injecting already-constructed collaborators rather than building
/// them internally.
pub struct Pipeline {
    intent: IntentProcessor,
    recommend: RecommendationEngine,
    recommend_timeout: Duration,
    metrics: MetricsRegistry,
}

impl Pipeline {
    pub fn new(intent: IntentProcessor, recommend: RecommendationEngine) -> Self {
        Pipeline::with_options(intent, recommend, DEFAULT_RECOMMEND_TIMEOUT, DEFAULT_CAPACITY)
    }

    pub fn with_options(
        intent: IntentProcessor,
        recommend: RecommendationEngine,
        recommend_timeout: Duration,
        metrics_capacity: usize,
    ) -> Self {
        Pipeline { intent, recommend, recommend_timeout, metrics: MetricsRegistry::new(metrics_capacity) }
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Runs the whole request: never fails. A stage that can't recover
    /// still produces a `ComposedResponse` asking the user to retry
    /// rather than an HTTP error.
    pub async fn process(&self, query: &str, context: &UserContext) -> (ComposedResponse, WorkflowMetrics) {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let mut timings = Vec::new();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let intent = self.process_intent(query, context, &mut timings, &mut warnings, &trace_id).await;
        let response = self.generate_response(&intent, context, &mut timings, &mut errors, &trace_id).await;

        let metrics = WorkflowMetrics {
            trace_id,
            stage_timings: timings,
            total_time_ms: elapsed_ms(started),
            errors: errors.clone(),
            warnings,
            succeeded: errors.is_empty(),
        };
        self.metrics.record(metrics.clone());

        (response, metrics)
    }

    async fn process_intent(
        &self,
        query: &str,
        context: &UserContext,
        timings: &mut Vec<StageTiming>,
        warnings: &mut Vec<String>,
        trace_id: &str,
    ) -> ProcessedIntent {
        let stage_start = Instant::now();
        let intent = self.intent.process(query, context).await;
        timings.push(StageTiming { stage: "processing_intent", duration_ms: elapsed_ms(stage_start) });

        if intent.confidence < LOW_CONFIDENCE_THRESHOLD {
            warn!(trace_id, confidence = intent.confidence, "low-confidence intent, proceeding with reduced certainty");
            warnings.push(format!("low-confidence intent ({:.2})", intent.confidence));
        }
        info!(
            trace_id,
            language = ?intent.language,
            mode = ?intent.mode,
            confidence = intent.confidence,
            "intent processed"
        );
        intent
    }

    async fn generate_response(
        &self,
        intent: &ProcessedIntent,
        context: &UserContext,
        timings: &mut Vec<StageTiming>,
        errors: &mut Vec<String>,
        trace_id: &str,
    ) -> ComposedResponse {
        let stage_start = Instant::now();
        let outcome = tokio::time::timeout(self.recommend_timeout, self.recommend.recommend(intent, context)).await;
        timings.push(StageTiming { stage: "generating_recommendations", duration_ms: elapsed_ms(stage_start) });

        let recommendations = match outcome {
            Ok(Ok(recommendations)) => recommendations,
            Ok(Err(err)) => {
                error!(trace_id, %err, "recommendation stage failed, returning minimal response");
                errors.push(format!("recommendation stage failed: {err}"));
                return ComposedResponse::error_fallback();
            }
            Err(_) => {
                error!(trace_id, timeout_secs = self.recommend_timeout.as_secs(), "recommendation stage timed out");
                errors.push("recommendation stage timed out".to_string());
                return ComposedResponse::error_fallback();
            }
        };

        let stage_start = Instant::now();
        let response = wr_compose::compose(&recommendations, intent, context);
        timings.push(StageTiming { stage: "composing_response", duration_ms: elapsed_ms(stage_start) });
        response
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_confidence_threshold_matches_documented_value() {
        assert_eq!(LOW_CONFIDENCE_THRESHOLD, 0.3);
    }
}
