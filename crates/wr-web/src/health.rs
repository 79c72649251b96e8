//! Health probes (§6): liveness never depends on a collaborator,
//! readiness fails closed if the graph store can't be reached.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.graph.health().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(%err, "readiness probe: graph store unreachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn detailed(State(state): State<AppState>) -> Json<serde_json::Value> {
    let graph_ok = state.graph.health().await.is_ok();
    let db_ok = state.db.ping().await.is_ok();
    let status = if graph_ok && db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "components": {
            "graph_store": graph_ok,
            "relational_store": db_ok,
        }
    }))
}
