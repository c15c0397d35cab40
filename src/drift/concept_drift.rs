//! Concept drift detection over prediction distributions

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MonitorConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::model::TrainedClassifier;
use crate::stats::ks_two_sample;
use crate::storage;

/// Seeds for the simulated baseline-era and production-era samples
const BASELINE_SAMPLE_SEED: u64 = 42;
const PRODUCTION_SAMPLE_SEED: u64 = 99;
const SAMPLE_FRACTION: f64 = 0.5;

/// KS comparison of the model's positive-class probability distributions.
///
/// Probability scores shift before hard labels do, so this catches
/// degradation even while predicted classes stay stable. Written as a full
/// replacement each run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConceptDriftReport {
    pub ks_statistic: f64,
    pub p_value: f64,
    pub concept_drift_detected: bool,
}

/// Detects shifts in the model's predicted-probability distribution
#[derive(Debug, Clone)]
pub struct ConceptDriftDetector {
    p_value_threshold: f64,
}

impl ConceptDriftDetector {
    /// Create a detector with the given significance level
    pub fn new(p_value_threshold: f64) -> Self {
        Self {
            p_value_threshold: p_value_threshold.clamp(0.001, 0.5),
        }
    }

    /// Compare predicted-probability distributions between two feature samples
    pub fn detect(
        &self,
        model: &TrainedClassifier,
        baseline: &Dataset,
        production: &Dataset,
    ) -> Result<ConceptDriftReport> {
        let baseline_probs = model.predict_proba(baseline.features.view())?.to_vec();
        let production_probs = model.predict_proba(production.features.view())?.to_vec();

        let ks = ks_two_sample(&baseline_probs, &production_probs)?;

        Ok(ConceptDriftReport {
            ks_statistic: ks.statistic,
            p_value: ks.p_value,
            concept_drift_detected: ks.is_significant(self.p_value_threshold),
        })
    }

    /// Pipeline stage: load the persisted model, score seeded baseline and
    /// production samples, and persist a single-record report.
    pub fn run(config: &MonitorConfig, data: &Dataset) -> Result<ConceptDriftReport> {
        let model: TrainedClassifier = storage::load_required(&config.model_path())?;

        let baseline = data.sample_fraction(SAMPLE_FRACTION, BASELINE_SAMPLE_SEED)?;
        let production = data.sample_fraction(SAMPLE_FRACTION, PRODUCTION_SAMPLE_SEED)?;

        let detector = Self::new(config.p_value_threshold);
        let report = detector.detect(&model, &baseline, &production)?;

        storage::save(&config.concept_drift_path(), &report)?;

        info!(
            ks_statistic = report.ks_statistic,
            p_value = report.p_value,
            drift = report.concept_drift_detected,
            "concept drift analysis complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_drift_between_similar_samples() {
        let data = Dataset::synthetic(600, 4, 42);
        let model = TrainedClassifier::fit(&data).unwrap();

        let baseline = data.sample_fraction(0.5, 42).unwrap();
        let production = data.sample_fraction(0.5, 99).unwrap();

        let detector = ConceptDriftDetector::new(0.05);
        let report = detector.detect(&model, &baseline, &production).unwrap();

        assert!(!report.concept_drift_detected);
        assert!(report.p_value >= 0.05);
    }

    #[test]
    fn test_drift_when_inputs_shift() {
        let data = Dataset::synthetic(600, 4, 42);
        let model = TrainedClassifier::fit(&data).unwrap();

        let baseline = data.sample_fraction(0.5, 42).unwrap();
        let mut production = data.sample_fraction(0.5, 99).unwrap();
        // Push every feature toward the positive-class region
        production.features.mapv_inplace(|v| v + 5.0);

        let detector = ConceptDriftDetector::new(0.05);
        let report = detector.detect(&model, &baseline, &production).unwrap();

        assert!(report.concept_drift_detected);
        assert!(report.ks_statistic > 0.3);
    }

    #[test]
    fn test_report_field_names() {
        let report = ConceptDriftReport {
            ks_statistic: 0.4,
            p_value: 0.01,
            concept_drift_detected: true,
        };
        let json = serde_json::to_value(report).unwrap();
        assert!(json.get("concept_drift_detected").unwrap().as_bool().unwrap());
        assert!(json.get("ks_statistic").is_some());
    }
}
