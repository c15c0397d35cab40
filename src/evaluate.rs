//! Production evaluation stage
//!
//! Loads the trained model, scores a fresh sample standing in for live
//! traffic, and records a single performance snapshot. No training happens
//! here.

use tracing::info;

use crate::config::MonitorConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::model::{ClassificationMetrics, TrainedClassifier};
use crate::storage;

/// Seed for the simulated production sample
const PRODUCTION_SAMPLE_SEED: u64 = 7;
const PRODUCTION_SAMPLE_FRACTION: f64 = 0.2;

/// Production evaluation stage
pub struct Evaluator;

impl Evaluator {
    /// Score a seeded production sample with the persisted model and write
    /// the latest-performance snapshot, replacing any previous one.
    ///
    /// A missing model artifact is fatal for this stage.
    pub fn run(config: &MonitorConfig, data: &Dataset) -> Result<ClassificationMetrics> {
        let model: TrainedClassifier = storage::load_required(&config.model_path())?;

        let production = data.sample_fraction(PRODUCTION_SAMPLE_FRACTION, PRODUCTION_SAMPLE_SEED)?;

        let y_pred = model.predict(production.features.view())?;
        let y_prob = model.predict_proba(production.features.view())?;
        let metrics = ClassificationMetrics::compute(
            production.target.view(),
            y_pred.view(),
            y_prob.view(),
        );

        storage::save(&config.latest_performance_path(), &metrics)?;

        info!(
            accuracy = metrics.accuracy,
            roc_auc = metrics.roc_auc,
            n_samples = production.n_rows(),
            "model evaluation complete"
        );
        Ok(metrics)
    }
}
