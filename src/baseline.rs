//! Baseline training stage
//!
//! Trains the reference model and captures the ground-truth state used by
//! every later monitoring stage: baseline performance metrics and
//! training-time feature statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MonitorConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::model::{ClassificationMetrics, TrainedClassifier};
use crate::storage;

/// Seed for the train/test split
const SPLIT_SEED: u64 = 42;
const TEST_FRACTION: f64 = 0.2;

/// Training-time summary statistics for one feature.
/// Immutable after creation; the reference shape for drift comparisons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureStatistic {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl FeatureStatistic {
    /// Compute from a feature column (sample standard deviation)
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = if values.len() > 1 {
            values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean,
            std: variance.sqrt(),
            min,
            max,
        }
    }
}

/// Baseline training stage
pub struct BaselineTrainer;

impl BaselineTrainer {
    /// Train the baseline model and persist the model artifact, baseline
    /// performance metrics, and per-feature statistics.
    pub fn run(config: &MonitorConfig, data: &Dataset) -> Result<ClassificationMetrics> {
        let (train, test) = data.train_test_split(TEST_FRACTION, SPLIT_SEED);

        let classifier = TrainedClassifier::fit(&train)?;

        let y_pred = classifier.predict(test.features.view())?;
        let y_prob = classifier.predict_proba(test.features.view())?;
        let metrics =
            ClassificationMetrics::compute(test.target.view(), y_pred.view(), y_prob.view());

        let feature_stats: BTreeMap<String, FeatureStatistic> = train
            .feature_names
            .iter()
            .enumerate()
            .map(|(j, name)| (name.clone(), FeatureStatistic::from_values(&train.column(j))))
            .collect();

        storage::save(&config.model_path(), &classifier)?;
        storage::save(&config.baseline_metrics_path(), &metrics)?;
        storage::save(&config.feature_stats_path(), &feature_stats)?;

        info!(
            accuracy = metrics.accuracy,
            roc_auc = metrics.roc_auc,
            n_train = train.n_rows(),
            n_test = test.n_rows(),
            "baseline training complete"
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_statistic() {
        let stats = FeatureStatistic::from_values(&[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 8.0);
        // Sample std of 2,4,6,8
        assert!((stats.std - 2.5819888974716116).abs() < 1e-12);
    }

    #[test]
    fn test_run_writes_all_baseline_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = MonitorConfig::new(dir.path());
        let data = Dataset::synthetic(400, 4, 42);

        let metrics = BaselineTrainer::run(&config, &data).unwrap();
        assert!(metrics.accuracy > 0.7);

        assert!(config.model_path().exists());
        assert!(config.baseline_metrics_path().exists());
        assert!(config.feature_stats_path().exists());

        let stats: BTreeMap<String, FeatureStatistic> =
            storage::load_required(&config.feature_stats_path()).unwrap();
        assert_eq!(stats.len(), 4);
        assert!(stats.contains_key("feature_0"));
    }
}
