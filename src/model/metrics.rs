//! Binary classification metrics

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Accuracy, precision, recall, and ROC-AUC for a binary classifier.
///
/// This is the shape persisted as the baseline metrics artifact and as the
/// latest-performance snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub roc_auc: f64,
}

impl ClassificationMetrics {
    /// Compute all metrics from true labels, hard predictions, and
    /// positive-class probabilities.
    pub fn compute(
        y_true: ArrayView1<f64>,
        y_pred: ArrayView1<f64>,
        y_prob: ArrayView1<f64>,
    ) -> Self {
        let n = y_true.len();

        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| (*t - *p).abs() < 0.5)
            .count();
        let accuracy = if n > 0 { correct as f64 / n as f64 } else { 0.0 };

        let (tp, fp, fn_) = confusion_counts(y_true, y_pred);
        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let recall = if tp + fn_ > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            0.0
        };

        let roc_auc = roc_auc(y_true, y_prob);

        Self {
            accuracy,
            precision,
            recall,
            roc_auc,
        }
    }
}

fn confusion_counts(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> (usize, usize, usize) {
    let mut tp = 0;
    let mut fp = 0;
    let mut fn_ = 0;

    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        let t_bool = *t > 0.5;
        let p_bool = *p > 0.5;
        match (t_bool, p_bool) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }

    (tp, fp, fn_)
}

/// Rank-based ROC-AUC (Mann-Whitney U with average ranks for ties).
///
/// Requires the continuous positive-class probability; a sample containing
/// only one class has no defined ROC curve, for which 0.5 is returned.
pub fn roc_auc(y_true: ArrayView1<f64>, y_prob: ArrayView1<f64>) -> f64 {
    let n_pos = y_true.iter().filter(|&&t| t > 0.5).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    // Sort indices by predicted probability
    let mut order: Vec<usize> = (0..y_true.len()).collect();
    order.sort_by(|&a, &b| {
        y_prob[a]
            .partial_cmp(&y_prob[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Assign average ranks to tied probabilities (1-based ranks)
    let mut ranks = vec![0.0; y_true.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && (y_prob[order[j + 1]] - y_prob[order[i]]).abs() < 1e-12 {
            j += 1;
        }
        let avg_rank = ((i + 1) + (j + 1)) as f64 / 2.0;
        for k in i..=j {
            ranks[order[k]] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(t, _)| **t > 0.5)
        .map(|(_, r)| *r)
        .sum();

    let u = rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0;
    u / (n_pos * n_neg) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_predictions() {
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let y_pred = array![0.0, 0.0, 1.0, 1.0];
        let y_prob = array![0.1, 0.2, 0.8, 0.9];

        let m = ClassificationMetrics::compute(y_true.view(), y_pred.view(), y_prob.view());
        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.precision, 1.0);
        assert_eq!(m.recall, 1.0);
        assert_eq!(m.roc_auc, 1.0);
    }

    #[test]
    fn test_mixed_predictions() {
        let y_true = array![1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        let y_pred = array![1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0];
        let y_prob = array![0.9, 0.2, 0.8, 0.4, 0.3, 0.7, 0.6, 0.1];

        let m = ClassificationMetrics::compute(y_true.view(), y_pred.view(), y_prob.view());
        assert_eq!(m.accuracy, 0.75);
        // tp=3, fp=1, fn=1
        assert_eq!(m.precision, 0.75);
        assert_eq!(m.recall, 0.75);
        assert!(m.roc_auc > 0.5);
    }

    #[test]
    fn test_auc_inverted_scores() {
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let y_prob = array![0.9, 0.8, 0.2, 0.1];
        assert_eq!(roc_auc(y_true.view(), y_prob.view()), 0.0);
    }

    #[test]
    fn test_auc_with_ties() {
        let y_true = array![0.0, 1.0, 0.0, 1.0];
        let y_prob = array![0.5, 0.5, 0.5, 0.5];
        assert!((roc_auc(y_true.view(), y_prob.view()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_auc_single_class_is_half() {
        let y_true = array![1.0, 1.0, 1.0];
        let y_prob = array![0.2, 0.5, 0.9];
        assert_eq!(roc_auc(y_true.view(), y_prob.view()), 0.5);
    }

    #[test]
    fn test_no_positive_predictions() {
        let y_true = array![1.0, 1.0, 0.0];
        let y_pred = array![0.0, 0.0, 0.0];
        let y_prob = array![0.4, 0.4, 0.3];

        let m = ClassificationMetrics::compute(y_true.view(), y_pred.view(), y_prob.view());
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
    }
}
