//! Drift detection
//!
//! Detects feature-distribution drift and prediction-distribution (concept)
//! drift between a reference sample and a production sample, using the
//! two-sample Kolmogorov-Smirnov test.

mod concept_drift;
mod data_drift;

pub use concept_drift::{ConceptDriftDetector, ConceptDriftReport};
pub use data_drift::{CorrectionMethod, DataDriftDetector, DataDriftReport, FeatureDriftResult};
