pub mod gradient_descent;
pub mod history;
pub mod train_config;

pub use gradient_descent::gradient_descent;
pub use history::TrainingHistory;
pub use train_config::TrainConfig;
