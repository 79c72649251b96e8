//! Request handlers (§6): conversational chat, enterprise recommendation,
//! and the rolling-window metrics endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::dto::{EnterpriseRecommendationRequest, EnterpriseRecommendationResponse, SparkyMessageRequest, SparkyMessageResponse};
use crate::state::AppState;

pub async fn sparky_message(
    State(state): State<AppState>,
    Json(request): Json<SparkyMessageRequest>,
) -> Json<SparkyMessageResponse> {
    let conversation_id = request.session_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    let context = request.to_user_context();

    let (composed, _metrics) = state.pipeline.process(&request.message, &context).await;
    Json(SparkyMessageResponse::from_composed(composed, conversation_id))
}

pub async fn enterprise_recommendations(
    State(state): State<AppState>,
    Json(request): Json<EnterpriseRecommendationRequest>,
) -> Result<Json<EnterpriseRecommendationResponse>, StatusCode> {
    let session_id = request.session_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    let context = request.to_user_context();

    let intent = state.intent.process(&request.query, &context).await;
    let recommendations = state.recommend.recommend(&intent, &context).await.map_err(|err| {
        tracing::error!(%err, "enterprise recommendation request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let explanation = request.include_explanations.then(|| {
        let composed = wr_compose::compose(&recommendations, &intent, &context);
        composed.detailed_explanation
    });

    Ok(Json(EnterpriseRecommendationResponse::from_recommendations(
        recommendations,
        session_id,
        explanation,
        request.max_results,
    )))
}

pub async fn metrics(State(state): State<AppState>) -> Json<serde_json::Value> {
    let summary = state.pipeline.metrics().summary();
    let recent = state.pipeline.metrics().recent(20);
    Json(serde_json::json!({ "summary": summary, "recent": recent }))
}
