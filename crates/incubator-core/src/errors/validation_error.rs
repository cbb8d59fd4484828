//! Input validation errors.

use super::error_code::{self, IncubatorErrorCode};

/// Malformed concept input. Raised before any provider call; always
/// recoverable by the caller correcting the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: String },

    #[error("{field} must be at least {min} characters, got {actual}")]
    TooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("{field} must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("unknown development stage: {value}")]
    UnknownStage { value: String },
}

impl IncubatorErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        error_code::VALIDATION_ERROR
    }
}
