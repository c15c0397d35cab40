//! Feature-distribution drift detection

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MonitorConfig;
use crate::dataset::Dataset;
use crate::error::{DriftwatchError, Result};
use crate::stats::ks_two_sample;
use crate::storage;

/// Seed for the simulated production sample, fixed so repeated runs over the
/// same source data are deterministic
const PRODUCTION_SAMPLE_SEED: u64 = 99;
const PRODUCTION_SAMPLE_FRACTION: f64 = 0.2;

/// KS test outcome for a single feature
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureDriftResult {
    /// KS statistic (max ECDF distance)
    pub ks_statistic: f64,
    /// Significance of the observed distance
    pub p_value: f64,
    /// True when p_value falls strictly below the significance threshold
    pub drift_detected: bool,
}

/// Per-feature drift report, keyed by feature name.
///
/// Written as a full replacement each run; historical drift reports are not
/// retained (unlike the alert and decision logs, which append).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataDriftReport(pub BTreeMap<String, FeatureDriftResult>);

impl DataDriftReport {
    /// Names of features whose distributions drifted
    pub fn drifted_features(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, r)| r.drift_detected)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Count of drifted features
    pub fn n_drifted(&self) -> usize {
        self.0.values().filter(|r| r.drift_detected).count()
    }
}

/// Multiple-comparison handling across per-feature tests.
///
/// The default tests each feature independently at the nominal significance
/// level, so false positives accumulate with feature count. Bonferroni
/// divides the level by the number of features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionMethod {
    #[default]
    None,
    Bonferroni,
}

/// Detects per-feature distribution drift via two-sample KS tests
#[derive(Debug, Clone)]
pub struct DataDriftDetector {
    p_value_threshold: f64,
    correction: CorrectionMethod,
}

impl DataDriftDetector {
    /// Create a detector with the given significance level
    pub fn new(p_value_threshold: f64) -> Self {
        Self {
            p_value_threshold: p_value_threshold.clamp(0.001, 0.5),
            correction: CorrectionMethod::None,
        }
    }

    /// Enable a multiple-comparison correction strategy
    pub fn with_correction(mut self, correction: CorrectionMethod) -> Self {
        self.correction = correction;
        self
    }

    /// Effective per-feature threshold after correction
    fn effective_threshold(&self, n_features: usize) -> f64 {
        match self.correction {
            CorrectionMethod::None => self.p_value_threshold,
            CorrectionMethod::Bonferroni => self.p_value_threshold / n_features.max(1) as f64,
        }
    }

    /// Compare each feature's distribution between reference and production
    /// samples. Columns are evaluated independently (and in parallel).
    pub fn detect(&self, reference: &Dataset, production: &Dataset) -> Result<DataDriftReport> {
        if reference.feature_names != production.feature_names {
            return Err(DriftwatchError::ValidationError(
                "Reference and production samples have different columns".to_string(),
            ));
        }

        let threshold = self.effective_threshold(reference.n_features());

        let results: Result<Vec<(String, FeatureDriftResult)>> = reference
            .feature_names
            .par_iter()
            .enumerate()
            .map(|(j, name)| {
                let ks = ks_two_sample(&reference.column(j), &production.column(j))?;
                Ok((
                    name.clone(),
                    FeatureDriftResult {
                        ks_statistic: ks.statistic,
                        p_value: ks.p_value,
                        drift_detected: ks.is_significant(threshold),
                    },
                ))
            })
            .collect();

        Ok(DataDriftReport(results?.into_iter().collect()))
    }

    /// Pipeline stage: compare the source data against a seeded production
    /// sample and persist the report, replacing any previous one.
    pub fn run(config: &MonitorConfig, data: &Dataset) -> Result<DataDriftReport> {
        let production = data.sample_fraction(PRODUCTION_SAMPLE_FRACTION, PRODUCTION_SAMPLE_SEED)?;

        let detector = Self::new(config.p_value_threshold);
        let report = detector.detect(data, &production)?;

        storage::save(&config.data_drift_path(), &report)?;

        info!(
            n_features = report.0.len(),
            n_drifted = report.n_drifted(),
            "data drift detection complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_drift_on_resample() {
        let data = Dataset::synthetic(500, 4, 42);
        let production = data.sample_fraction(0.3, 99).unwrap();

        let detector = DataDriftDetector::new(0.05);
        let report = detector.detect(&data, &production).unwrap();

        assert_eq!(report.0.len(), 4);
        // A random subsample of the same data should not drift
        assert_eq!(report.n_drifted(), 0);
    }

    #[test]
    fn test_drift_on_shifted_features() {
        let data = Dataset::synthetic(500, 3, 42);
        let mut shifted = data.sample_fraction(0.3, 99).unwrap();
        shifted.features.mapv_inplace(|v| v + 10.0);

        let detector = DataDriftDetector::new(0.05);
        let report = detector.detect(&data, &shifted).unwrap();

        assert_eq!(report.n_drifted(), 3);
        assert_eq!(report.drifted_features().len(), 3);
        for result in report.0.values() {
            assert!(result.p_value < 0.05);
            assert!(result.ks_statistic > 0.5);
        }
    }

    #[test]
    fn test_run_rejects_empty_dataset() {
        use ndarray::{Array1, Array2};

        let dir = tempfile::tempdir().unwrap();
        let config = MonitorConfig::new(dir.path());
        // A header-only CSV loads as a zero-row dataset
        let empty = Dataset {
            feature_names: vec!["feature_0".to_string()],
            features: Array2::zeros((0, 1)),
            target: Array1::zeros(0),
        };

        assert!(matches!(
            DataDriftDetector::run(&config, &empty),
            Err(DriftwatchError::DataError(_))
        ));
        assert!(!config.data_drift_path().exists());
    }

    #[test]
    fn test_mismatched_columns_rejected() {
        let a = Dataset::synthetic(100, 3, 42);
        let b = Dataset::synthetic(100, 4, 42);
        let detector = DataDriftDetector::new(0.05);
        assert!(detector.detect(&a, &b).is_err());
    }

    #[test]
    fn test_bonferroni_tightens_threshold() {
        let detector = DataDriftDetector::new(0.05).with_correction(CorrectionMethod::Bonferroni);
        assert!((detector.effective_threshold(10) - 0.005).abs() < 1e-12);

        let uncorrected = DataDriftDetector::new(0.05);
        assert_eq!(uncorrected.effective_threshold(10), 0.05);
    }

    #[test]
    fn test_report_serializes_as_map() {
        let data = Dataset::synthetic(200, 2, 42);
        let production = data.sample_fraction(0.2, 99).unwrap();
        let report = DataDriftDetector::new(0.05).detect(&data, &production).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("feature_0"));
        assert!(obj["feature_0"].get("ks_statistic").is_some());
        assert!(obj["feature_0"].get("p_value").is_some());
        assert!(obj["feature_0"].get("drift_detected").is_some());
    }
}
