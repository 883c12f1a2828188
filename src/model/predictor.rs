use crate::math::matrix::Matrix;

/// Linear prediction `ŷ = x · w`, one value per row of the design matrix.
///
/// # Panics
/// Panics if `x.cols != w.len()`. A mismatch means the weights belong to a
/// different feature layout, so it is never truncated or padded.
pub fn predict(x: &Matrix, w: &[f64]) -> Vec<f64> {
    assert_eq!(
        x.cols,
        w.len(),
        "design matrix has {} columns but weight vector has {} entries",
        x.cols,
        w.len()
    );
    x.mul_vec(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_product_per_row() {
        let x = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![1.0, -1.0, 0.0]]);
        assert_eq!(predict(&x, &[10.0, 1.0, 2.0]), vec![18.0, 9.0]);
    }

    #[test]
    #[should_panic(expected = "weight vector has 2 entries")]
    fn dimension_mismatch_is_fatal() {
        let x = Matrix::zeros(1, 3);
        predict(&x, &[1.0, 2.0]);
    }
}
