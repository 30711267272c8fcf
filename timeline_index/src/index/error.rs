//! Error types for the timeline index

use std::fmt::Display;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors surfaced by the index
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange { start: String, end: String },

    #[error("Index invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl IndexError {
    /// Create an invalid range error
    pub fn invalid_range<C: Display>(start: C, end: C) -> Self {
        Self::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant_violation(message: &str) -> Self {
        Self::InvariantViolation {
            message: message.to_string(),
        }
    }

    /// Check if the caller caused this error (as opposed to an internal defect)
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidRange { .. })
    }

    /// Get error code for the logging system
    pub fn error_code(&self) -> crate::logging::Code {
        use crate::logging::codes;
        match self {
            Self::InvalidRange { .. } => codes::validation::INVALID_RANGE,
            Self::InvariantViolation { .. } => codes::validation::INVARIANT_VIOLATION,
        }
    }
}
