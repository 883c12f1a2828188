/// Cost recorded after every gradient-descent update.
///
/// Diagnostics only: it is returned alongside the weights but never stored in
/// a model artifact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    pub costs: Vec<f64>,
}

impl TrainingHistory {
    pub fn with_capacity(iterations: usize) -> Self {
        TrainingHistory { costs: Vec::with_capacity(iterations) }
    }

    pub fn push(&mut self, cost: f64) {
        self.costs.push(cost);
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Cost after the last update, `None` for a zero-iteration run.
    pub fn final_cost(&self) -> Option<f64> {
        self.costs.last().copied()
    }

    /// True if no recorded cost exceeds its predecessor by more than `tol`.
    pub fn is_non_increasing(&self, tol: f64) -> bool {
        self.costs.windows(2).all(|w| w[1] <= w[0] + tol)
    }
}
