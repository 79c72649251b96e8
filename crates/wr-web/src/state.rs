//! Application state: the collaborators every handler needs, wired once
//! at startup by `wr-cli`'s composition root and shared read-only behind
//! `Arc` (§5).

use std::sync::Arc;

use wr_db::DbPool;
use wr_graph::GraphClient;
use wr_intent::IntentProcessor;
use wr_orchestrator::Pipeline;
use wr_recommend::RecommendationEngine;

/// Shared across every handler. `pipeline` drives the conversational
/// chat endpoint end to end; `intent`/`recommend` are called directly by
/// the enterprise endpoint, which needs the raw `ScoredRecommendations`
/// rather than the chat-shaped `ComposedResponse`.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub intent: IntentProcessor,
    pub recommend: RecommendationEngine,
    pub graph: GraphClient,
    pub db: Arc<DbPool>,
}

impl AppState {
    pub fn new(
        pipeline: Pipeline,
        intent: IntentProcessor,
        recommend: RecommendationEngine,
        graph: GraphClient,
        db: DbPool,
    ) -> Self {
        AppState { pipeline: Arc::new(pipeline), intent, recommend, graph, db: Arc::new(db) }
    }
}
