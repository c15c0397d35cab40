//! In-memory tabular dataset with named numeric columns

use std::path::Path;

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};
use polars::prelude::*;
use rand::prelude::*;

use crate::error::{DriftwatchError, Result};

/// A labeled tabular dataset: named numeric feature columns plus a binary target.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Column names, in feature matrix order
    pub feature_names: Vec<String>,
    /// Feature matrix, one row per sample
    pub features: Array2<f64>,
    /// Binary target (0.0 or 1.0), one entry per row
    pub target: Array1<f64>,
}

impl Dataset {
    /// Number of samples
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Load a CSV file, treating `target` as the label column and every other
    /// numeric column as a feature.
    pub fn from_csv(path: &Path, target: &str) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .into_reader_with_file_handle(file)
            .finish()?;

        let target_col = df
            .column(target)
            .map_err(|_| DriftwatchError::DataError(format!("Target column '{}' not found", target)))?;
        let y = column_to_f64(target_col)?;

        let mut feature_names = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();
        for col in df.get_columns() {
            if col.name() == target {
                continue;
            }
            feature_names.push(col.name().to_string());
            columns.push(column_to_f64(col)?);
        }

        if feature_names.is_empty() {
            return Err(DriftwatchError::DataError(
                "No feature columns found".to_string(),
            ));
        }

        let n_rows = y.len();
        let n_cols = columns.len();
        let mut features = Array2::zeros((n_rows, n_cols));
        for (j, col) in columns.iter().enumerate() {
            for (i, &v) in col.iter().enumerate() {
                features[[i, j]] = v;
            }
        }

        Ok(Self {
            feature_names,
            features,
            target: Array1::from_vec(y),
        })
    }

    /// Generate a deterministic two-class Gaussian dataset.
    ///
    /// Class 1 features are centered at `1.5 + 0.1 * j` per column j, class 0
    /// at `-0.5 - 0.1 * j`, both with unit variance, so the classes are
    /// separable but overlapping. Identical seeds produce identical data.
    pub fn synthetic(n_rows: usize, n_features: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let feature_names: Vec<String> = (0..n_features).map(|j| format!("feature_{}", j)).collect();

        let mut features = Array2::zeros((n_rows, n_features));
        let mut target = Array1::zeros(n_rows);

        for i in 0..n_rows {
            let label = if rng.gen::<f64>() < 0.55 { 1.0 } else { 0.0 };
            target[i] = label;
            for j in 0..n_features {
                let center = if label > 0.5 {
                    1.5 + 0.1 * j as f64
                } else {
                    -0.5 - 0.1 * j as f64
                };
                features[[i, j]] = center + gaussian(&mut rng);
            }
        }

        Self {
            feature_names,
            features,
            target,
        }
    }

    /// Select a subset of rows by index
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut features = Array2::zeros((indices.len(), self.n_features()));
        let mut target = Array1::zeros(indices.len());
        for (row, &idx) in indices.iter().enumerate() {
            features.row_mut(row).assign(&self.features.row(idx));
            target[row] = self.target[idx];
        }
        Self {
            feature_names: self.feature_names.clone(),
            features,
            target,
        }
    }

    /// Draw a reproducible random subsample of `frac` of the rows.
    ///
    /// Simulates production traffic: the same source data and seed always
    /// yield the same sample. A dataset with no rows (e.g. a header-only
    /// CSV) cannot be sampled and is an error.
    pub fn sample_fraction(&self, frac: f64, seed: u64) -> Result<Self> {
        if self.n_rows() == 0 {
            return Err(DriftwatchError::DataError(
                "Cannot sample from an empty dataset".to_string(),
            ));
        }

        let n = ((self.n_rows() as f64) * frac.clamp(0.0, 1.0)).round() as usize;
        let n = n.clamp(1, self.n_rows());

        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices: Vec<usize> = (0..self.n_rows()).collect();
        indices.shuffle(&mut rng);
        indices.truncate(n);

        Ok(self.select_rows(&indices))
    }

    /// Stratified train/test split with a fixed seed.
    /// Returns (train, test).
    pub fn train_test_split(&self, test_fraction: f64, seed: u64) -> (Self, Self) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut train_idx = Vec::new();
        let mut test_idx = Vec::new();

        for class in [0.0, 1.0] {
            let mut class_idx: Vec<usize> = (0..self.n_rows())
                .filter(|&i| (self.target[i] - class).abs() < 0.5)
                .collect();
            class_idx.shuffle(&mut rng);
            let n_test = ((class_idx.len() as f64) * test_fraction.clamp(0.0, 1.0)).round() as usize;
            test_idx.extend_from_slice(&class_idx[..n_test]);
            train_idx.extend_from_slice(&class_idx[n_test..]);
        }

        (self.select_rows(&train_idx), self.select_rows(&test_idx))
    }

    /// Fixed-size, non-overlapping, contiguous batches in original row order.
    /// A trailing partial batch is dropped, not returned.
    pub fn batches(&self, batch_size: usize) -> Vec<(ArrayView2<f64>, ArrayView1<f64>)> {
        let n_complete = self.n_rows() / batch_size;
        (0..n_complete)
            .map(|b| {
                let start = b * batch_size;
                let end = start + batch_size;
                (
                    self.features.slice(s![start..end, ..]),
                    self.target.slice(s![start..end]),
                )
            })
            .collect()
    }

    /// Values of one feature column as a contiguous vector
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.features.column(index).to_vec()
    }
}

/// Standard normal draw via Box-Muller
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn column_to_f64(col: &Series) -> Result<Vec<f64>> {
    let casted = col.cast(&DataType::Float64)?;
    let ca = casted.f64()?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}
