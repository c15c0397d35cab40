//! Driftwatch - ML model monitoring pipeline
//!
//! Trains a baseline classifier once, then repeatedly evaluates it against
//! freshly sampled data to detect statistical drift and performance
//! degradation, escalating to alerts and an automated retraining decision.
//!
//! # Modules
//!
//! ## Monitoring core
//! - [`stats`] - Two-sample Kolmogorov-Smirnov test
//! - [`drift`] - Data (feature) and concept (prediction) drift detection
//! - [`monitor`] - Per-batch performance monitoring
//! - [`alerts`] - Rule-based alert engine over the monitoring reports
//! - [`retrain`] - Time-windowed retraining decision controller
//!
//! ## Model and data
//! - [`dataset`] - In-memory tabular datasets, seeded sampling, batching
//! - [`model`] - Logistic regression with standardization, binary metrics
//! - [`baseline`] - Baseline training stage (model + reference artifacts)
//! - [`evaluate`] - Production evaluation stage
//!
//! ## Infrastructure
//! - [`config`] - Artifact paths and monitoring thresholds
//! - [`storage`] - JSON artifact persistence (replace vs append-only)
//! - [`pipeline`] - Ordered step runner with continue-on-failure
//!
//! ## Services
//! - [`server`] - Read-only HTTP API over the artifacts
//! - [`cli`] - Command-line interface

pub mod error;

pub mod config;
pub mod dataset;
pub mod model;
pub mod stats;
pub mod storage;

pub mod alerts;
pub mod baseline;
pub mod drift;
pub mod evaluate;
pub mod monitor;
pub mod retrain;

pub mod pipeline;

pub mod cli;
pub mod server;

pub use error::{DriftwatchError, Result};
