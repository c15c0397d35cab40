//! Batch performance monitoring
//!
//! Replays the dataset in fixed-size contiguous batches, scores each one,
//! and flags batches whose accuracy falls below a fraction of the baseline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MonitorConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::model::{ClassificationMetrics, TrainedClassifier};
use crate::storage;

/// Performance of one monitoring batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub timestamp: DateTime<Utc>,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub roc_auc: f64,
    /// True when accuracy falls strictly below ratio * baseline accuracy
    pub performance_degraded: bool,
}

/// Ordered per-batch performance history for one monitoring run.
/// Written as a full replacement; prior runs are not merged.
pub type PerformanceHistory = Vec<PerformanceSnapshot>;

/// Batch performance monitor
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    batch_size: usize,
    degradation_ratio: f64,
}

impl PerformanceMonitor {
    /// Create a monitor with the given batch size and degradation ratio
    pub fn new(batch_size: usize, degradation_ratio: f64) -> Self {
        Self {
            batch_size: batch_size.max(1),
            degradation_ratio: degradation_ratio.clamp(0.0, 1.0),
        }
    }

    /// Degradation decision. Strict inequality: accuracy exactly at
    /// ratio * baseline is not degraded.
    pub fn is_degraded(&self, accuracy: f64, baseline_accuracy: f64) -> bool {
        accuracy < self.degradation_ratio * baseline_accuracy
    }

    /// Score every complete batch of the dataset in original order.
    /// A trailing partial batch is dropped, not evaluated.
    pub fn monitor(
        &self,
        model: &TrainedClassifier,
        data: &Dataset,
        baseline_accuracy: f64,
    ) -> Result<PerformanceHistory> {
        let mut history = Vec::new();

        for (x_batch, y_batch) in data.batches(self.batch_size) {
            let y_pred = model.predict(x_batch)?;
            let y_prob = model.predict_proba(x_batch)?;
            let metrics = ClassificationMetrics::compute(y_batch, y_pred.view(), y_prob.view());

            history.push(PerformanceSnapshot {
                timestamp: Utc::now(),
                accuracy: metrics.accuracy,
                precision: metrics.precision,
                recall: metrics.recall,
                roc_auc: metrics.roc_auc,
                performance_degraded: self.is_degraded(metrics.accuracy, baseline_accuracy),
            });
        }

        Ok(history)
    }

    /// Pipeline stage: load the model and baseline metrics, replay the
    /// dataset in batches, and persist the history as a full replacement.
    pub fn run(config: &MonitorConfig, data: &Dataset) -> Result<PerformanceHistory> {
        let model: TrainedClassifier = storage::load_required(&config.model_path())?;
        let baseline: ClassificationMetrics =
            storage::load_required(&config.baseline_metrics_path())?;

        let monitor = Self::new(config.batch_size, config.degradation_ratio);
        let history = monitor.monitor(&model, data, baseline.accuracy)?;

        storage::save(&config.performance_history_path(), &history)?;

        let degraded = history.iter().filter(|s| s.performance_degraded).count();
        info!(
            n_batches = history.len(),
            n_degraded = degraded,
            "performance monitoring complete"
        );
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degradation_boundary_is_not_degraded() {
        let monitor = PerformanceMonitor::new(50, 0.90);
        // Exactly at the threshold: not degraded
        assert!(!monitor.is_degraded(0.72, 0.80));
        assert!(monitor.is_degraded(0.7199, 0.80));
        assert!(!monitor.is_degraded(0.73, 0.80));
    }

    #[test]
    fn test_120_rows_batch_50_yields_two_snapshots() {
        let data = Dataset::synthetic(120, 3, 42);
        let model = TrainedClassifier::fit(&data).unwrap();

        let monitor = PerformanceMonitor::new(50, 0.90);
        let history = monitor.monitor(&model, &data, 0.9).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_snapshots_in_dataset_order() {
        let data = Dataset::synthetic(300, 3, 42);
        let model = TrainedClassifier::fit(&data).unwrap();

        let monitor = PerformanceMonitor::new(50, 0.90);
        let history = monitor.monitor(&model, &data, 0.9).unwrap();
        assert_eq!(history.len(), 6);
        for pair in history.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn test_impossible_baseline_degrades_every_batch() {
        let data = Dataset::synthetic(200, 3, 42);
        let model = TrainedClassifier::fit(&data).unwrap();

        // Baseline accuracy above 1.0 cannot be met at the 0.99 ratio
        let monitor = PerformanceMonitor::new(50, 0.99);
        let history = monitor.monitor(&model, &data, 1.5).unwrap();
        assert!(history.iter().all(|s| s.performance_degraded));
    }

    #[test]
    fn test_run_persists_history() {
        let dir = tempfile::tempdir().unwrap();
        let config = MonitorConfig::new(dir.path());
        let data = Dataset::synthetic(260, 3, 42);

        crate::baseline::BaselineTrainer::run(&config, &data).unwrap();
        let history = PerformanceMonitor::run(&config, &data).unwrap();
        assert_eq!(history.len(), 5);

        let persisted: PerformanceHistory =
            storage::load_required(&config.performance_history_path()).unwrap();
        assert_eq!(persisted.len(), history.len());
    }
}
