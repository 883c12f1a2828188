use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::model::predictor::predict;
use crate::train::history::TrainingHistory;
use crate::train::train_config::TrainConfig;

/// Fits `w` to minimise the half mean-squared error of `x · w` against `y`
/// by full-batch gradient descent.
///
/// Each of the `config.iterations` steps does
///
/// ```text
/// e = x·w - y
/// g = (1/m) · xᵀ·e
/// w = w - α·g
/// ```
///
/// and then records `J = (1/2m) · Σ e²` evaluated at the updated weights, so
/// the last history entry is the cost of the returned vector. Runs every
/// iteration even if the cost diverges; non-finite costs are recorded as is.
///
/// # Arguments
/// - `x`: design matrix, bias column included (m × n)
/// - `y`: targets, length m
/// - `initial`: starting weights, length n (conventionally zeros)
/// - `config`: learning rate, iteration count, optional progress logging
///
/// # Panics
/// Panics if `x` has no rows, if `y.len() != x.rows`, if
/// `initial.len() != x.cols` or if the learning rate is not positive.
pub fn gradient_descent(
    x: &Matrix,
    y: &[f64],
    initial: &[f64],
    config: &TrainConfig,
) -> (Vec<f64>, TrainingHistory) {
    assert!(x.rows > 0, "design matrix must not be empty");
    assert_eq!(x.rows, y.len(), "design matrix rows and targets must have equal length");
    assert_eq!(x.cols, initial.len(), "initial weights must match design matrix columns");
    assert!(config.learning_rate > 0.0, "learning rate must be positive");

    let inv_m = 1.0 / x.rows as f64;
    let x_t = x.transpose();
    let mut w = initial.to_vec();
    let mut history = TrainingHistory::with_capacity(config.iterations);

    for iter in 0..config.iterations {
        let error = MseLoss::derivative(&predict(x, &w), y);
        let grad = x_t.mul_vec(&error);

        for (wj, gj) in w.iter_mut().zip(grad.iter()) {
            *wj -= config.learning_rate * inv_m * gj;
        }

        let cost = MseLoss::cost(&predict(x, &w), y);
        history.push(cost);

        if let Some(every) = config.log_every.filter(|&e| e > 0) {
            if iter % every == 0 {
                log::debug!("iter {iter} cost={cost:.4e}");
            }
        }
    }

    (w, history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line_design() -> (Matrix, Vec<f64>) {
        // y = 2 + 3x on a centred x so a moderate rate converges fast.
        let xs = [-2.0, -1.0, 0.0, 1.0, 2.0];
        let x = Matrix::from_data(xs.iter().map(|&v| vec![1.0, v]).collect());
        let y = xs.iter().map(|v| 2.0 + 3.0 * v).collect();
        (x, y)
    }

    #[test]
    fn records_one_cost_per_iteration() {
        let (x, y) = line_design();
        let (_, history) = gradient_descent(&x, &y, &[0.0, 0.0], &TrainConfig::new(0.1, 37));
        assert_eq!(history.len(), 37);
    }

    #[test]
    fn zero_iterations_returns_initial_weights() {
        let (x, y) = line_design();
        let (w, history) = gradient_descent(&x, &y, &[0.5, -0.5], &TrainConfig::new(0.1, 0));
        assert_eq!(w, vec![0.5, -0.5]);
        assert!(history.is_empty());
        assert_eq!(history.final_cost(), None);
    }

    #[test]
    fn converges_on_exact_line() {
        let (x, y) = line_design();
        let (w, history) = gradient_descent(&x, &y, &[0.0, 0.0], &TrainConfig::new(0.1, 2000));
        assert!(history.is_non_increasing(1e-12));
        assert!(history.final_cost().unwrap() < 1e-12);
        assert_abs_diff_eq!(w[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(w[1], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn final_cost_matches_returned_weights() {
        let (x, mut y) = line_design();
        y[2] += 1.0;
        let (w, history) = gradient_descent(&x, &y, &[0.0, 0.0], &TrainConfig::new(0.05, 50));
        let expected = MseLoss::cost(&predict(&x, &w), &y);
        assert_abs_diff_eq!(history.final_cost().unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn oversized_rate_diverges_without_error() {
        let (x, y) = line_design();
        let (_, history) = gradient_descent(&x, &y, &[0.0, 0.0], &TrainConfig::new(5.0, 100));
        assert_eq!(history.len(), 100);
        assert!(history.costs[99] > history.costs[0]);
    }

    #[test]
    fn identical_inputs_give_identical_runs() {
        let (x, y) = line_design();
        let cfg = TrainConfig::new(0.1, 100);
        assert_eq!(
            gradient_descent(&x, &y, &[0.0, 0.0], &cfg),
            gradient_descent(&x, &y, &[0.0, 0.0], &cfg)
        );
    }

    #[test]
    fn zero_log_interval_is_ignored() {
        let (x, y) = line_design();
        let cfg = TrainConfig { log_every: Some(0), ..TrainConfig::new(0.1, 10) };
        let (_, history) = gradient_descent(&x, &y, &[0.0, 0.0], &cfg);
        assert_eq!(history.len(), 10);
    }

    #[test]
    #[should_panic]
    fn mismatched_weight_length_panics() {
        let (x, y) = line_design();
        gradient_descent(&x, &y, &[0.0], &TrainConfig::default());
    }
}
