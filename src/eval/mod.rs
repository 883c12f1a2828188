pub mod metrics;

pub use metrics::{r2_score, Metrics};
