//! Error types for the outbreak risk pipeline.

use thiserror::Error;

/// Unified error type for pipeline operations.
///
/// Data and training errors are fatal to the calling pipeline step;
/// [`PipelineError::ModelNotFound`] is recoverable by triggering a fresh
/// training run before retrying prediction.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Stratification impossible: a class has too few members
    #[error("insufficient data: class '{class}' has {count} member(s), need at least 2 to stratify")]
    InsufficientData { class: String, count: usize },

    /// Fewer than 2 distinct classes present at fit time
    #[error("degenerate training set: only {n_classes} distinct class(es) present, need at least 2")]
    DegenerateTrainingSet { n_classes: usize },

    /// Model artifact missing at load time
    #[error("model artifact not found at '{path}'; train the model first")]
    ModelNotFound { path: String },

    /// Strict schema reconciliation failure
    #[error("schema mismatch: input is missing column(s) [{}]", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// Empty input where at least one row is required
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    /// Test fraction outside the open interval (0, 1)
    #[error("invalid test fraction {0}: must be strictly between 0 and 1")]
    InvalidTestFraction(f64),

    /// I/O errors (artifact reading/writing)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact serialization/deserialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the pipeline
pub type Result<T> = std::result::Result<T, PipelineError>;
