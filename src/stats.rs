//! Two-sample Kolmogorov-Smirnov test

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{DriftwatchError, Result};

/// Outcome of a two-sample KS test
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KsTest {
    /// Maximum absolute distance between the two empirical CDFs
    pub statistic: f64,
    /// Significance under the null hypothesis of equal distributions
    pub p_value: f64,
}

impl KsTest {
    /// Drift decision at the given significance level.
    /// Strict inequality: p == threshold is not drift.
    pub fn is_significant(&self, threshold: f64) -> bool {
        self.p_value < threshold
    }
}

/// Empirical CDF evaluated at x over sorted data
fn ecdf(sorted_data: &[f64], x: f64) -> f64 {
    let count = sorted_data.iter().filter(|&&v| v <= x).count();
    count as f64 / sorted_data.len() as f64
}

/// Asymptotic Kolmogorov survival function Q(lambda) = 2 * sum (-1)^(k-1) exp(-2 k^2 lambda^2).
/// The series converges quickly for lambda > 0.2; below that the sum saturates at 1.
fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=100 {
        let term = (-2.0 * (k as f64).powi(2) * lambda * lambda).exp();
        sum += sign * term;
        sign = -sign;
        if term < 1e-10 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Run a two-sample KS test between two 1-D samples.
///
/// The statistic is the maximum absolute difference between the empirical
/// CDFs; the p-value uses the asymptotic approximation with the
/// small-sample correction `lambda = (sqrt(ne) + 0.12 + 0.11/sqrt(ne)) * D`
/// where `ne = n1*n2/(n1+n2)`.
pub fn ks_two_sample(reference: &[f64], test: &[f64]) -> Result<KsTest> {
    if reference.is_empty() || test.is_empty() {
        return Err(DriftwatchError::ValidationError(
            "Empty sample provided to KS test".to_string(),
        ));
    }

    let mut ref_sorted: Vec<f64> = reference.to_vec();
    let mut test_sorted: Vec<f64> = test.to_vec();
    ref_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    test_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    // Evaluate both ECDFs at every distinct observed value
    let mut combined: Vec<f64> = ref_sorted.iter().chain(test_sorted.iter()).copied().collect();
    combined.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    combined.dedup();

    let statistic = combined
        .iter()
        .map(|&x| {
            let f1 = ecdf(&ref_sorted, x);
            let f2 = ecdf(&test_sorted, x);
            (f1 - f2).abs()
        })
        .fold(0.0, f64::max);

    let n1 = reference.len() as f64;
    let n2 = test.len() as f64;
    let ne = (n1 * n2 / (n1 + n2)).sqrt();
    let lambda = (ne + 0.12 + 0.11 / ne) * statistic;
    let p_value = kolmogorov_survival(lambda);

    Ok(KsTest { statistic, p_value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_samples() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let result = ks_two_sample(&data, &data).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert!(result.p_value > 0.99);
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn test_disjoint_samples() {
        let reference: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let test: Vec<f64> = (0..50).map(|i| 1000.0 + i as f64).collect();
        let result = ks_two_sample(&reference, &test).unwrap();
        assert!((result.statistic - 1.0).abs() < 1e-12);
        assert!(result.p_value < 0.001);
        assert!(result.is_significant(0.05));
    }

    #[test]
    fn test_similar_samples_not_significant() {
        let reference: Vec<f64> = (0..100).map(|i| (i % 10) as f64).collect();
        let test: Vec<f64> = (0..100).map(|i| ((i + 1) % 10) as f64).collect();
        let result = ks_two_sample(&reference, &test).unwrap();
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn test_empty_sample_rejected() {
        let data = vec![1.0, 2.0];
        assert!(ks_two_sample(&[], &data).is_err());
        assert!(ks_two_sample(&data, &[]).is_err());
    }

    #[test]
    fn test_threshold_boundary_is_not_drift() {
        let result = KsTest {
            statistic: 0.3,
            p_value: 0.05,
        };
        assert!(!result.is_significant(0.05));
        let below = KsTest {
            statistic: 0.3,
            p_value: 0.049,
        };
        assert!(below.is_significant(0.05));
    }

    #[test]
    fn test_survival_function_monotone() {
        let qs: Vec<f64> = [0.5, 1.0, 1.5, 2.0]
            .iter()
            .map(|&l| kolmogorov_survival(l))
            .collect();
        for pair in qs.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }
}
