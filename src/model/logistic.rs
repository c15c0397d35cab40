//! Logistic regression with feature standardization

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{DriftwatchError, Result};

/// Binary logistic regression trained by gradient descent with L2 regularization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted coefficients
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    /// Regularization strength (L2)
    pub alpha: f64,
    /// Maximum iterations
    pub max_iter: usize,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
    /// Learning rate
    pub learning_rate: f64,
    /// Whether the model has been fitted
    pub is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create a new unfit model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            alpha: 0.01,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
            is_fitted: false,
        }
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set learning rate
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Sigmoid function
    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Fit the model using gradient descent
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(DriftwatchError::ValidationError(format!(
                "x has {} rows but y has {} entries",
                n_samples,
                y.len()
            )));
        }

        let mut weights = Array1::zeros(n_features);
        let mut bias = 0.0;

        let lr = self.learning_rate;
        let alpha = self.alpha;

        for _iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);

            let errors = &predictions - y;
            let dw = (x.t().dot(&errors) / n_samples as f64) + (alpha * &weights);
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - lr * dw;
            bias -= lr * db;
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        self.is_fitted = true;

        Ok(self)
    }

    /// Positive-class probability for each row
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(DriftwatchError::ModelNotFitted)?;
        let intercept = self.intercept.unwrap_or(0.0);

        let linear = x.dot(coefficients) + intercept;
        Ok(Self::sigmoid(&linear))
    }

    /// Hard class labels (0.0 / 1.0) at the 0.5 cutoff
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}

/// A fitted classifier bundled with the standardization it was trained under.
///
/// Standardization parameters are captured at fit time so production inputs
/// are scaled exactly the way training inputs were. Serialized to JSON as the
/// persistent model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedClassifier {
    /// Feature names, in training column order
    pub feature_names: Vec<String>,
    /// Per-column training means
    pub means: Array1<f64>,
    /// Per-column training standard deviations
    pub stds: Array1<f64>,
    /// The underlying fitted model
    pub model: LogisticRegression,
}

impl TrainedClassifier {
    /// Standardize and fit on a training dataset
    pub fn fit(train: &Dataset) -> Result<Self> {
        let means = train
            .features
            .mean_axis(Axis(0))
            .ok_or_else(|| DriftwatchError::DataError("Empty training set".to_string()))?;
        let stds = train.features.std_axis(Axis(0), 0.0);

        let scaled = scale(train.features.view(), &means, &stds);

        let mut model = LogisticRegression::new();
        model.fit(&scaled, &train.target)?;

        Ok(Self {
            feature_names: train.feature_names.clone(),
            means,
            stds,
            model,
        })
    }

    /// Positive-class probabilities for raw (unscaled) inputs
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let scaled = scale(x, &self.means, &self.stds);
        self.model.predict_proba(scaled.view())
    }

    /// Hard labels for raw (unscaled) inputs
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let scaled = scale(x, &self.means, &self.stds);
        self.model.predict(scaled.view())
    }
}

/// Column-wise standardization; constant columns pass through unscaled
fn scale(x: ArrayView2<f64>, means: &Array1<f64>, stds: &Array1<f64>) -> Array2<f64> {
    let mut out = x.to_owned();
    for (j, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
        let std = if stds[j] > 1e-12 { stds[j] } else { 1.0 };
        col.mapv_inplace(|v| (v - means[j]) / std);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_separable_data() {
        let train = Dataset::synthetic(400, 4, 42);
        let clf = TrainedClassifier::fit(&train).unwrap();

        let pred = clf.predict(train.features.view()).unwrap();
        let correct = pred
            .iter()
            .zip(train.target.iter())
            .filter(|(p, t)| (*p - *t).abs() < 0.5)
            .count();
        let accuracy = correct as f64 / train.n_rows() as f64;
        assert!(accuracy > 0.8, "accuracy {} too low", accuracy);
    }

    #[test]
    fn test_predict_unfitted_fails() {
        let model = LogisticRegression::new();
        let x = Array2::zeros((3, 2));
        assert!(matches!(
            model.predict_proba(x.view()),
            Err(DriftwatchError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        let train = Dataset::synthetic(200, 3, 42);
        let clf = TrainedClassifier::fit(&train).unwrap();
        let proba = clf.predict_proba(train.features.view()).unwrap();
        assert!(proba.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_roundtrip_through_json() {
        let train = Dataset::synthetic(150, 3, 42);
        let clf = TrainedClassifier::fit(&train).unwrap();

        let json = serde_json::to_string(&clf).unwrap();
        let restored: TrainedClassifier = serde_json::from_str(&json).unwrap();

        let before = clf.predict_proba(train.features.view()).unwrap();
        let after = restored.predict_proba(train.features.view()).unwrap();
        assert_eq!(before, after);
    }
}
