//! Error types for the monitoring API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Artifact error: {0}")]
    Artifact(String),
}

impl From<crate::error::DriftwatchError> for ServerError {
    fn from(err: crate::error::DriftwatchError) -> Self {
        ServerError::Artifact(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let ServerError::Artifact(msg) = &self;
        tracing::error!(detail = %msg, "artifact error");

        let body = Json(json!({
            "error": true,
            "message": "A monitoring artifact could not be read",
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
