//! Error types for GeoKrig

use thiserror::Error;

/// Main error type for GeoKrig operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    Validation {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Coordinate dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

impl Error {
    /// Shorthand for [`Error::Validation`] with a displayable value.
    pub fn validation(
        name: &'static str,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Error::Validation {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for GeoKrig operations
pub type Result<T> = std::result::Result<T, Error>;
