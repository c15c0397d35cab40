//! Centralized configuration: artifact paths and monitoring thresholds

use std::path::PathBuf;

use crate::error::Result;

/// Statistical significance level for the KS drift tests
pub const DEFAULT_P_VALUE_THRESHOLD: f64 = 0.05;
/// Number of samples per monitoring batch
pub const DEFAULT_BATCH_SIZE: usize = 50;
/// Fraction of baseline accuracy below which a batch counts as degraded
pub const DEFAULT_DEGRADATION_RATIO: f64 = 0.90;
/// Number of recent CRITICAL alerts that triggers retraining
pub const DEFAULT_CRITICAL_ALERT_THRESHOLD: usize = 1;
/// Trailing window for alert analysis, in hours
pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;

/// Configuration for the monitoring pipeline.
///
/// All artifact paths are derived from a single base directory so the whole
/// pipeline can be pointed at a scratch location in tests.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Root directory for models and reports
    pub base_dir: PathBuf,
    /// Significance level for KS tests
    pub p_value_threshold: f64,
    /// Samples per monitoring batch
    pub batch_size: usize,
    /// Degradation ratio against baseline accuracy
    pub degradation_ratio: f64,
    /// CRITICAL alert count that triggers retraining
    pub critical_alert_threshold: usize,
    /// Trailing alert window in hours
    pub lookback_hours: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let base_dir = std::env::var("DRIFTWATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Self::new(base_dir)
    }
}

impl MonitorConfig {
    /// Create a configuration rooted at the given directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            p_value_threshold: DEFAULT_P_VALUE_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
            degradation_ratio: DEFAULT_DEGRADATION_RATIO,
            critical_alert_threshold: DEFAULT_CRITICAL_ALERT_THRESHOLD,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }

    /// Set the p-value threshold for drift detection
    pub fn with_p_value_threshold(mut self, threshold: f64) -> Self {
        self.p_value_threshold = threshold.clamp(0.001, 0.5);
        self
    }

    /// Set the monitoring batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the degradation ratio
    pub fn with_degradation_ratio(mut self, ratio: f64) -> Self {
        self.degradation_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the CRITICAL alert count threshold
    pub fn with_critical_alert_threshold(mut self, count: usize) -> Self {
        self.critical_alert_threshold = count;
        self
    }

    /// Set the lookback window in hours
    pub fn with_lookback_hours(mut self, hours: i64) -> Self {
        self.lookback_hours = hours.max(0);
        self
    }

    // ── Artifact paths ─────────────────────────────────────────────────────

    /// Serialized trained model
    pub fn model_path(&self) -> PathBuf {
        self.base_dir.join("models/baseline/model.json")
    }

    /// Baseline performance metrics
    pub fn baseline_metrics_path(&self) -> PathBuf {
        self.base_dir.join("reports/baseline/performance_metrics.json")
    }

    /// Baseline per-feature statistics
    pub fn feature_stats_path(&self) -> PathBuf {
        self.base_dir.join("reports/baseline/feature_stats.json")
    }

    /// Most recent production evaluation snapshot
    pub fn latest_performance_path(&self) -> PathBuf {
        self.base_dir.join("reports/monitoring/latest_performance.json")
    }

    /// Per-batch performance history
    pub fn performance_history_path(&self) -> PathBuf {
        self.base_dir.join("reports/monitoring/performance_history.json")
    }

    /// Concept drift report
    pub fn concept_drift_path(&self) -> PathBuf {
        self.base_dir.join("reports/monitoring/concept_drift_report.json")
    }

    /// Data drift report
    pub fn data_drift_path(&self) -> PathBuf {
        self.base_dir.join("reports/drift/data_drift_report.json")
    }

    /// Append-only alert log
    pub fn alerts_log_path(&self) -> PathBuf {
        self.base_dir.join("reports/alerts/alerts_log.json")
    }

    /// Append-only retrain decision log
    pub fn retrain_decisions_path(&self) -> PathBuf {
        self.base_dir.join("reports/retraining/retrain_decisions.json")
    }

    /// Create every directory an artifact can land in
    pub fn ensure_directories(&self) -> Result<()> {
        let paths = [
            self.model_path(),
            self.baseline_metrics_path(),
            self.latest_performance_path(),
            self.data_drift_path(),
            self.alerts_log_path(),
            self.retrain_decisions_path(),
        ];
        for path in &paths {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = MonitorConfig::new("/tmp/dw");
        assert_eq!(config.p_value_threshold, 0.05);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.degradation_ratio, 0.90);
        assert_eq!(config.critical_alert_threshold, 1);
        assert_eq!(config.lookback_hours, 24);
    }

    #[test]
    fn test_paths_under_base_dir() {
        let config = MonitorConfig::new("/tmp/dw");
        assert!(config.data_drift_path().starts_with("/tmp/dw"));
        assert!(config
            .alerts_log_path()
            .ends_with("reports/alerts/alerts_log.json"));
    }

    #[test]
    fn test_builder_clamps() {
        let config = MonitorConfig::new(".")
            .with_p_value_threshold(0.9)
            .with_batch_size(0)
            .with_lookback_hours(-5);
        assert_eq!(config.p_value_threshold, 0.5);
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.lookback_hours, 0);
    }
}
