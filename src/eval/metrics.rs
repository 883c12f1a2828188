use std::fmt;

use crate::loss::mse::MseLoss;

/// Regression quality on held-out data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub mse: f64,
    pub rmse: f64,
    /// Coefficient of determination. `NaN` when every target is identical,
    /// since the total sum of squares is then zero.
    pub r2: f64,
}

impl Metrics {
    /// Computes MSE, RMSE and R² of `predicted` against `actual`.
    ///
    /// # Panics
    /// Panics if the slices are empty or of different lengths.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Metrics {
        assert!(!actual.is_empty(), "metrics need at least one sample");
        assert_eq!(actual.len(), predicted.len(), "actual and predicted must have equal length");

        let mse = MseLoss::loss(predicted, actual);
        Metrics {
            mse,
            rmse: mse.sqrt(),
            r2: r2_score(actual, predicted),
        }
    }

    pub fn r2_defined(&self) -> bool {
        !self.r2.is_nan()
    }
}

/// `1 - SS_res / SS_tot`, or `NaN` if every target is identical.
///
/// Constant targets are detected by comparing values rather than testing
/// `SS_tot == 0`: a mean that does not round back exactly (three times `0.1`)
/// leaves a residue of about 1e-34 in `SS_tot`.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.iter().all(|&y| y == actual[0]) {
        return f64::NAN;
    }
    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = actual.iter().zip(predicted).map(|(y, p)| (y - p).powi(2)).sum();
    1.0 - ss_res / ss_tot
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MSE: {:.2}, RMSE: {:.2}, ", self.mse, self.rmse)?;
        if self.r2_defined() {
            write!(f, "R2: {:.4}", self.r2)
        } else {
            write!(f, "R2: undefined (constant targets)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn perfect_predictions() {
        let y = [4.0e6, 5.0e6, 6.0e6, 8.0e6];
        let m = Metrics::compute(&y, &y);
        assert_eq!(m.mse, 0.0);
        assert_eq!(m.rmse, 0.0);
        assert_abs_diff_eq!(m.r2, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn known_values() {
        let y = [1.0, 2.0, 3.0];
        let p = [2.0, 2.0, 2.0];
        let m = Metrics::compute(&y, &p);
        assert_abs_diff_eq!(m.mse, 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.rmse, (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(m.r2, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_targets_make_r2_undefined() {
        let m = Metrics::compute(&[5.0, 5.0, 5.0], &[4.0, 5.0, 6.0]);
        assert!(m.r2.is_nan());
        assert!(!m.r2_defined());
        assert!(m.to_string().contains("undefined"));
        assert_abs_diff_eq!(m.mse, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn inexact_constant_targets_are_still_undefined() {
        let m = Metrics::compute(&[0.1, 0.1, 0.1], &[0.2, 0.1, 0.0]);
        assert!(m.r2.is_nan(), "r2 = {}", m.r2);
    }

    #[test]
    fn single_sample_is_allowed() {
        let m = Metrics::compute(&[3.0], &[1.0]);
        assert_eq!(m.mse, 4.0);
        assert!(m.r2.is_nan());
    }

    #[test]
    #[should_panic]
    fn empty_input_panics() {
        Metrics::compute(&[], &[]);
    }
}
