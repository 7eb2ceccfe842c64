// src/core/errors.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GamutError {
    /// A selected column does not exist in the cleaned table (after name normalization).
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Empty model input: no feature columns selected")]
    EmptyModelInput,

    /// A document value could not be reduced to plain JSON.
    #[error("Serialization error at {field}: {reason}")]
    Serialization { field: String, reason: String },

    #[error("Duplicate column after normalization: {0}")]
    DuplicateColumn(String),

    #[error("Target column {0} is not numeric")]
    NonNumericTarget(String),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Incompatible Dimensions: {0}")]
    IncompatibleDimensions(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ndarray Error: {0}")]
    Ndarray(String),
}

impl From<ndarray::ShapeError> for GamutError {
    fn from(err: ndarray::ShapeError) -> Self {
        GamutError::Ndarray(format!("ndarray ShapeError: {}", err))
    }
}

// Convenience type alias for Result
pub type Result<T> = std::result::Result<T, GamutError>;
