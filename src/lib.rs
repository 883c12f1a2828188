pub mod math;
pub mod error;
pub mod data;
pub mod preprocessing;
pub mod loss;
pub mod train;
pub mod model;
pub mod eval;
pub mod format;
pub mod workflow;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use error::{LrError, Result};
pub use data::{Dataset, Education, FeatureVector, PredictionTable};
pub use preprocessing::{design_matrix, StandardScaler};
pub use loss::mse::MseLoss;
pub use train::{gradient_descent, TrainConfig, TrainingHistory};
pub use model::{predict, LinearRegression, ModelArtifact, ModelKind};
pub use eval::Metrics;
