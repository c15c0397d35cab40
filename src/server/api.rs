//! API route definitions

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers, AppState};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": true,
            "message": "Not found. See /health for API status.",
        })),
    )
}

/// Create the monitoring API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/alerts", get(handlers::get_alerts))
        .route("/metrics/baseline", get(handlers::get_baseline_metrics))
        .route("/metrics/latest", get(handlers::get_latest_metrics))
        .route("/metrics/history", get(handlers::get_performance_history))
        .route("/drift/data", get(handlers::get_data_drift))
        .route("/drift/concept", get(handlers::get_concept_drift))
        .route("/retraining/status", get(handlers::get_retraining_status))
        .fallback(handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state)
}
