//! Z-score standardization of raw feature columns.
//!
//! `z = (x - mean) / std`, with the population standard deviation. The
//! fitted parameters are persisted inside every model artifact and must be
//! reused verbatim at inference time; refitting on inference data silently
//! shifts every prediction.

use serde::{Deserialize, Serialize};

use crate::error::{LrError, Result};
use crate::math::matrix::Matrix;

/// Fitted per-column mean and standard deviation. Immutable once fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl StandardScaler {
    /// Computes column statistics of `x`.
    ///
    /// A zero-variance column degrades to identity scaling (its std is
    /// stored as 1.0), so transform only centers it. A column counts as
    /// zero-variance when all its values are equal, even if rounding in the
    /// mean leaves a tiny nonzero deviation.
    pub fn fit(x: &Matrix) -> Result<StandardScaler> {
        if x.rows == 0 {
            return Err(LrError::EmptyData("cannot fit a scaler on zero rows".into()));
        }

        let mean = x.col_means();
        let std = x.col_stds()
            .into_iter()
            .enumerate()
            .map(|(j, s)| {
                if s == 0.0 || is_constant(&x.column(j)) {
                    log::warn!("feature column {j} has zero variance; scaling it by 1.0");
                    1.0
                } else {
                    s
                }
            })
            .collect();

        Ok(StandardScaler { mean, std })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Applies the fitted parameters column by column.
    ///
    /// # Panics
    /// Panics if `x.cols` differs from the number of fitted features.
    pub fn transform(&self, x: &Matrix) -> Matrix {
        assert_eq!(
            x.cols,
            self.n_features(),
            "scaler was fitted on {} features, got {}",
            self.n_features(),
            x.cols
        );
        Matrix {
            rows: x.rows,
            cols: x.cols,
            data: x.data.iter().map(|row| self.transform_row(row)).collect(),
        }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        assert_eq!(row.len(), self.n_features(), "feature count mismatch");
        row.iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }

    pub fn fit_transform(x: &Matrix) -> Result<(StandardScaler, Matrix)> {
        let scaler = StandardScaler::fit(x)?;
        let scaled = scaler.transform(x);
        Ok((scaler, scaled))
    }

    /// Checks parameters read from disk: equal lengths, finite means and
    /// strictly positive finite deviations.
    pub fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.mean.len() != n_features || self.std.len() != n_features {
            return Err(format!(
                "scaler must have {n_features} means and deviations, found {} and {}",
                self.mean.len(),
                self.std.len()
            ));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err("scaler mean is not finite".into());
        }
        if self.std.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err("scaler standard deviation must be positive".into());
        }
        Ok(())
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> Matrix {
        Matrix::from_data(vec![
            vec![1.0, 1.0],
            vec![2.0, 1.0],
            vec![2.0, 2.0],
            vec![3.0, 3.0],
            vec![8.0, 4.0],
        ])
    }

    #[test]
    fn transformed_training_data_is_standardized() {
        let (_, z) = StandardScaler::fit_transform(&sample()).unwrap();
        for m in z.col_means() {
            assert_abs_diff_eq!(m, 0.0, epsilon = 1e-12);
        }
        for s in z.col_stds() {
            assert_abs_diff_eq!(s, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn transform_reuses_fitted_parameters() {
        let scaler = StandardScaler::fit(&sample()).unwrap();
        let single = Matrix::from_data(vec![vec![3.0, 3.0]]);
        let z = scaler.transform(&single);
        assert_abs_diff_eq!(z.data[0][0], (3.0 - scaler.mean[0]) / scaler.std[0], epsilon = 1e-12);
        assert_abs_diff_eq!(z.data[0][1], (3.0 - scaler.mean[1]) / scaler.std[1], epsilon = 1e-12);
    }

    #[test]
    fn constant_column_degrades_to_centering() {
        let x = Matrix::from_data(vec![vec![1.0, 5.0], vec![3.0, 5.0]]);
        let scaler = StandardScaler::fit(&x).unwrap();
        assert_eq!(scaler.std[1], 1.0);
        assert_eq!(scaler.transform(&x).column(1), vec![0.0, 0.0]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(StandardScaler::fit(&Matrix::zeros(0, 2)), Err(LrError::EmptyData(_))));
    }

    #[test]
    #[should_panic]
    fn transform_rejects_wrong_width() {
        let scaler = StandardScaler::fit(&sample()).unwrap();
        scaler.transform(&Matrix::zeros(1, 3));
    }

    #[test]
    fn validate_rejects_non_positive_std() {
        let scaler = StandardScaler { mean: vec![0.0, 0.0], std: vec![1.0, 0.0] };
        assert!(scaler.validate(2).is_err());
        assert!(scaler.validate(3).is_err());
    }

    #[test]
    fn inexact_constant_column_degrades_to_centering() {
        let x = Matrix::from_data(vec![vec![0.1, 1.0], vec![0.1, 2.0], vec![0.1, 3.0]]);
        let scaler = StandardScaler::fit(&x).unwrap();
        assert_eq!(scaler.std[0], 1.0);
        let z = scaler.transform_row(&[0.2, 2.0]);
        assert_abs_diff_eq!(z[0], 0.2 - scaler.mean[0], epsilon = 1e-12);
        assert_abs_diff_eq!(z[1], 0.0, epsilon = 1e-12);
    }
}
