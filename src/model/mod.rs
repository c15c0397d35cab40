//! Model training and evaluation
//!
//! A regularized logistic regression classifier with feature standardization,
//! plus binary classification metrics.

mod logistic;
mod metrics;

pub use logistic::{LogisticRegression, TrainedClassifier};
pub use metrics::ClassificationMetrics;
