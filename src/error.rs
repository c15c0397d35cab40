//! Error types for the driftwatch monitoring pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for driftwatch operations
pub type Result<T> = std::result::Result<T, DriftwatchError>;

/// Main error type for the monitoring pipeline
#[derive(Error, Debug)]
pub enum DriftwatchError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed artifact at {path}: {reason}")]
    ArtifactError { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<polars::error::PolarsError> for DriftwatchError {
    fn from(err: polars::error::PolarsError) -> Self {
        DriftwatchError::DataError(err.to_string())
    }
}
