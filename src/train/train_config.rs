/// Configuration for a `gradient_descent` run.
///
/// # Fields
/// - `learning_rate`: step size α; must be positive. Too large a value makes
///   the cost grow without bound, which is not detected.
/// - `iterations`: exact number of full-batch updates; there is no early stop
/// - `log_every`: when set, a `debug` log line with the current cost is
///   emitted every N iterations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub iterations: usize,
    pub log_every: Option<usize>,
}

impl TrainConfig {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
    pub const DEFAULT_ITERATIONS: usize = 2000;

    /// Creates a `TrainConfig` with no progress logging.
    pub fn new(learning_rate: f64, iterations: usize) -> Self {
        TrainConfig {
            learning_rate,
            iterations,
            log_every: None,
        }
    }

    pub fn with_log_every(mut self, every: usize) -> Self {
        self.log_every = if every == 0 { None } else { Some(every) };
        self
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(Self::DEFAULT_LEARNING_RATE, Self::DEFAULT_ITERATIONS)
    }
}
