//! HTTP surface (§6): the conversational chat entry point, the
//! enterprise recommendation endpoint, health probes, and rolling-window
//! metrics — all behind a single axum router built from one `AppState`.

pub mod dto;
pub mod health;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let api = Router::new()
        .route("/sparky/message", post(routes::sparky_message))
        .route("/enterprise/recommendations", post(routes::enterprise_recommendations))
        .route("/enterprise/metrics", get(routes::metrics))
        .route("/health", get(health::health))
        .route("/health/detailed", get(health::detailed))
        .route("/health/readiness", get(health::readiness))
        .route("/health/liveness", get(health::liveness))
        .with_state(state);

    Router::new().nest("/api/v1", api).layer(TraceLayer::new_for_http()).layer(cors)
}

/// Binds and serves until the process receives a shutdown signal.
/// Startup failures (bind errors) propagate to the caller, which exits
/// non-zero (§6).
pub async fn run_server(state: AppState, port: u16) -> std::io::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "web server listening");
    axum::serve(listener, app).await
}
