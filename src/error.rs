//! Error types for the domus pipeline

use thiserror::Error;

/// Result type alias for domus operations
pub type Result<T> = std::result::Result<T, DomusError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum DomusError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Search error: {0}")]
    SearchError(String),

    #[error("Plot error: {0}")]
    PlotError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<polars::error::PolarsError> for DomusError {
    fn from(err: polars::error::PolarsError) -> Self {
        DomusError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for DomusError {
    fn from(err: serde_json::Error) -> Self {
        DomusError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for DomusError {
    fn from(err: ndarray::ShapeError) -> Self {
        DomusError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
