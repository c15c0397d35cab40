//! HTTP request handlers
//!
//! Each artifact handler has the same two behaviors: an absent file returns
//! an empty/null sentinel, a present file returns its parsed JSON verbatim.

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::storage;

use super::error::Result;
use super::AppState;

/// Health probe
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "driftwatch-monitoring-api",
    }))
}

/// Load an artifact as raw JSON, mapping an absent file to the sentinel
fn artifact_or(path: &Path, sentinel: Value) -> Result<Json<Value>> {
    let value: Option<Value> = storage::load_optional(path)?;
    Ok(Json(value.unwrap_or(sentinel)))
}

/// Alert log; absent log is an empty list
pub async fn get_alerts(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    artifact_or(&state.monitor_config.alerts_log_path(), json!([]))
}

pub async fn get_baseline_metrics(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    artifact_or(&state.monitor_config.baseline_metrics_path(), Value::Null)
}

pub async fn get_latest_metrics(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    artifact_or(&state.monitor_config.latest_performance_path(), Value::Null)
}

pub async fn get_performance_history(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    artifact_or(&state.monitor_config.performance_history_path(), Value::Null)
}

pub async fn get_data_drift(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    artifact_or(&state.monitor_config.data_drift_path(), Value::Null)
}

pub async fn get_concept_drift(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    artifact_or(&state.monitor_config.concept_drift_path(), Value::Null)
}

pub async fn get_retraining_status(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    artifact_or(&state.monitor_config.retrain_decisions_path(), Value::Null)
}
