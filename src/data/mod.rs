pub mod dataset;
pub mod features;
pub mod split;
pub mod template;

pub use dataset::{Dataset, PredictionTable, SalaryRecord};
pub use features::{feature_matrix, Education, FeatureVector};
pub use split::train_test_split;
pub use template::{template_csv, template_dataset};
