use serde::{Serialize, Deserialize};
use std::ops::Mul;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix from row vectors.
    ///
    /// An empty `data` yields a 0×0 matrix. Rows of unequal length are a
    /// programming error and panic.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let rows = data.len();
        let cols = data.first().map(|r| r.len()).unwrap_or(0);
        assert!(
            data.iter().all(|r| r.len() == cols),
            "Matrix rows must all have the same length"
        );
        Matrix { rows, cols, data }
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// Matrix-vector product `self · v`, one output per row.
    ///
    /// # Panics
    /// Panics if `v.len() != self.cols`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(
            self.cols,
            v.len(),
            "Matrix has {} columns but vector has {} entries",
            self.cols,
            v.len()
        );
        self.data.iter()
            .map(|row| row.iter().zip(v.iter()).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// Copy of column `j`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.data.iter().map(|row| row[j]).collect()
    }

    /// Per-column arithmetic mean. Returns zeros for an empty matrix.
    pub fn col_means(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (s, x) in sums.iter_mut().zip(row.iter()) {
                *s += x;
            }
        }
        if self.rows == 0 {
            return sums;
        }
        let n = self.rows as f64;
        sums.into_iter().map(|s| s / n).collect()
    }

    /// Per-column population standard deviation (divides by `rows`).
    pub fn col_stds(&self) -> Vec<f64> {
        let means = self.col_means();
        let mut sq = vec![0.0; self.cols];
        for row in &self.data {
            for ((s, x), m) in sq.iter_mut().zip(row.iter()).zip(means.iter()) {
                *s += (x - m).powi(2);
            }
        }
        if self.rows == 0 {
            return sq;
        }
        let n = self.rows as f64;
        sq.into_iter().map(|s| (s / n).sqrt()).collect()
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res =  Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_vec_matches_matrix_product() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let v = [0.5, -1.0];
        let via_mul = a.clone() * Matrix::from_data(v.iter().map(|&x| vec![x]).collect());
        assert_eq!(a.mul_vec(&v), via_mul.column(0));
    }

    #[test]
    #[should_panic]
    fn mul_vec_rejects_wrong_length() {
        let a = Matrix::zeros(2, 3);
        a.mul_vec(&[1.0, 2.0]);
    }

    #[test]
    fn column_statistics() {
        let a = Matrix::from_data(vec![vec![1.0, 10.0], vec![3.0, 10.0]]);
        assert_eq!(a.col_means(), vec![2.0, 10.0]);
        assert_eq!(a.col_stds(), vec![1.0, 0.0]);
    }

    #[test]
    fn transpose_swaps_shape() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0, 3.0]]);
        let t = a.transpose();
        assert_eq!((t.rows, t.cols), (3, 1));
        assert_eq!(t.column(0), vec![1.0, 2.0, 3.0]);
    }
}
