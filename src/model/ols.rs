//! Closed-form ordinary least squares, the baseline the gradient-descent
//! model is compared against.
//!
//! Solves the normal equations `(XᵀX) β = Xᵀy` on the design matrix with
//! Gauss-Jordan elimination and partial pivoting. Columns whose pivot
//! vanishes (constant or collinear features) get a zero coefficient instead
//! of failing the fit.

use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;
use crate::model::predictor::predict;
use crate::preprocessing::design::design_matrix;

/// Relative pivot threshold below which a column is treated as dependent.
const PIVOT_EPS: f64 = 1e-12;

/// Fitted intercept plus one coefficient per (scaled) feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearRegression {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegression {
    /// Fits on features **without** a bias column; the intercept is added
    /// internally.
    ///
    /// # Panics
    /// Panics if `x` has no rows or `y.len() != x.rows`.
    pub fn fit(x: &Matrix, y: &[f64]) -> LinearRegression {
        assert!(x.rows > 0, "cannot fit on zero rows");
        assert_eq!(x.rows, y.len(), "features and targets must have equal length");

        let d = design_matrix(x);
        let d_t = d.transpose();
        let gram = d_t.clone() * d;
        let rhs = d_t.mul_vec(y);

        let beta = solve_normal_equations(gram, rhs);
        LinearRegression {
            intercept: beta[0],
            coefficients: beta[1..].to_vec(),
        }
    }

    /// Intercept followed by coefficients, the layout `predict` expects.
    pub fn weights(&self) -> Vec<f64> {
        std::iter::once(self.intercept)
            .chain(self.coefficients.iter().copied())
            .collect()
    }

    /// Predicts from features without a bias column.
    pub fn predict(&self, x: &Matrix) -> Vec<f64> {
        predict(&design_matrix(x), &self.weights())
    }
}

/// Gauss-Jordan on `[a | b]`; free variables are fixed at zero.
fn solve_normal_equations(a: Matrix, b: Vec<f64>) -> Vec<f64> {
    let n = a.rows;
    let mut aug: Vec<Vec<f64>> = a.data.into_iter()
        .zip(b)
        .map(|(mut row, bi)| {
            row.push(bi);
            row
        })
        .collect();

    let scale = aug.iter()
        .flat_map(|row| row[..n].iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
        .max(1.0);
    let tol = scale * PIVOT_EPS;

    let mut pivots: Vec<(usize, usize)> = Vec::with_capacity(n);
    let mut row = 0;
    for col in 0..n {
        if row == n {
            break;
        }
        let (p, max) = (row..n)
            .map(|r| (r, aug[r][col].abs()))
            .fold((row, 0.0f64), |best, cur| if cur.1 > best.1 { cur } else { best });
        if max < tol {
            log::warn!("normal equations: column {col} is linearly dependent; coefficient set to 0");
            continue;
        }
        aug.swap(row, p);

        let pivot_row = aug[row].clone();
        for (r, other) in aug.iter_mut().enumerate() {
            if r == row {
                continue;
            }
            let factor = other[col] / pivot_row[col];
            if factor != 0.0 {
                for c in col..=n {
                    other[c] -= factor * pivot_row[c];
                }
            }
        }
        pivots.push((row, col));
        row += 1;
    }

    let mut beta = vec![0.0; n];
    for (r, c) in pivots {
        beta[c] = aug[r][n] / aug[r][c];
    }
    beta
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn recovers_exact_plane() {
        // y = 5 + 2a - 3b
        let rows = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![2.0, 3.0],
            vec![-1.0, 4.0],
        ];
        let y: Vec<f64> = rows.iter().map(|r| 5.0 + 2.0 * r[0] - 3.0 * r[1]).collect();
        let lr = LinearRegression::fit(&Matrix::from_data(rows), &y);
        assert_abs_diff_eq!(lr.intercept, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lr.coefficients[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lr.coefficients[1], -3.0, epsilon = 1e-9);
    }

    #[test]
    fn constant_feature_gets_zero_coefficient() {
        let x = Matrix::from_data(vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 0.0]]);
        let y = [2.0, 4.0, 6.0];
        let lr = LinearRegression::fit(&x, &y);
        assert_eq!(lr.coefficients[1], 0.0);
        let preds = lr.predict(&x);
        for (p, t) in preds.iter().zip(y.iter()) {
            assert_abs_diff_eq!(p, t, epsilon = 1e-9);
        }
    }

    #[test]
    fn centred_features_give_mean_intercept() {
        let x = Matrix::from_data(vec![vec![-1.0], vec![0.0], vec![1.0]]);
        let y = [1.0, 5.0, 3.0];
        let lr = LinearRegression::fit(&x, &y);
        assert_abs_diff_eq!(lr.intercept, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lr.coefficients[0], 1.0, epsilon = 1e-12);
    }
}
