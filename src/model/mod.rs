pub mod artifact;
pub mod ols;
pub mod predictor;
pub mod store;

pub use artifact::{ModelArtifact, ModelKind};
pub use ols::LinearRegression;
pub use predictor::predict;
