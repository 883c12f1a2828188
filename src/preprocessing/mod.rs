pub mod design;
pub mod scaler;

pub use design::{design_matrix, strip_bias};
pub use scaler::StandardScaler;
