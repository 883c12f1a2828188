use std::path::PathBuf;

/// Every recoverable failure the library reports.
///
/// Dimension mismatches between a design matrix and a weight vector are not
/// represented here: they are precondition violations and panic.
#[derive(thiserror::Error, Debug)]
pub enum LrError {
    /// Input table lacks one or more required columns.
    #[error("CSV must contain the columns {expected:?}; missing {missing:?}")]
    MissingColumns {
        expected: Vec<&'static str>,
        missing: Vec<String>,
    },

    /// A data row could not be turned into a feature vector / target.
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// A single feature vector is out of range (negative experience, unknown
    /// education level).
    #[error("invalid feature: {0}")]
    InvalidFeature(String),

    #[error("empty data: {0}")]
    EmptyData(String),

    /// No artifact exists at the given path.
    #[error("model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// File exists but is unreadable or matches neither recognized key set.
    #[error("corrupt model artifact {}: {reason}", path.display())]
    CorruptArtifact { path: PathBuf, reason: String },

    /// The artifact cannot be written in a form `load` would accept, e.g.
    /// weights that went non-finite when training diverged.
    #[error("refusing to save model artifact: {0}")]
    InvalidArtifact(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LrError>;
