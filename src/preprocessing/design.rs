use crate::math::matrix::Matrix;

/// Prepends the constant bias column: (m, n) → (m, n + 1), column 0 = 1.0.
pub fn design_matrix(scaled: &Matrix) -> Matrix {
    Matrix {
        rows: scaled.rows,
        cols: scaled.cols + 1,
        data: scaled.data.iter()
            .map(|row| std::iter::once(1.0).chain(row.iter().copied()).collect())
            .collect(),
    }
}

/// Drops column 0, the inverse of `design_matrix`.
pub fn strip_bias(design: &Matrix) -> Matrix {
    assert!(design.cols >= 1, "design matrix has no bias column");
    Matrix {
        rows: design.rows,
        cols: design.cols - 1,
        data: design.data.iter().map(|row| row[1..].to_vec()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_column_is_exactly_one() {
        let x = Matrix::from_data(vec![vec![-3.2, 1e9], vec![0.0, f64::NAN], vec![7.0, -0.5]]);
        let d = design_matrix(&x);
        assert_eq!((d.rows, d.cols), (3, 3));
        assert!(d.column(0).iter().all(|&b| b == 1.0));
        assert_eq!(d.data[2][1..], [7.0, -0.5]);
    }

    #[test]
    fn strip_bias_restores_input() {
        let x = Matrix::from_data(vec![vec![1.5, 2.5], vec![3.5, 4.5]]);
        assert_eq!(strip_bias(&design_matrix(&x)), x);
    }

    #[test]
    fn empty_input_keeps_shape() {
        let d = design_matrix(&Matrix::zeros(0, 2));
        assert_eq!((d.rows, d.cols), (0, 3));
    }
}
