//! # Scheduler Errors

use crate::event::EventId;
use timeline_index::IndexError;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors surfaced by the scheduler
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Error from the underlying index
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Event configuration is incomplete or contradictory
    #[error("Invalid event configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Calendar arithmetic left the representable range
    #[error("Date out of range: {reason}")]
    OutOfRange { reason: String },

    /// No event is scheduled under this id
    #[error("Unknown event: {id}")]
    UnknownEvent { id: EventId },

    /// Event configuration could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SchedulerError {
    pub fn invalid_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }

    pub fn out_of_range(reason: &str) -> Self {
        Self::OutOfRange {
            reason: reason.to_string(),
        }
    }

    /// Check if the caller can fix this error by changing its input
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Index(e) => e.is_caller_error(),
            Self::InvalidConfig { .. }
            | Self::OutOfRange { .. }
            | Self::UnknownEvent { .. }
            | Self::Parse(_) => true,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Index(IndexError::InvalidRange { .. }) => {
                "Event ends before it starts".to_string()
            }
            Self::Index(e) => format!("Internal index error: {}", e),
            Self::InvalidConfig { reason } => format!("Invalid event: {}", reason),
            Self::OutOfRange { reason } => format!("Date out of range: {}", reason),
            Self::UnknownEvent { id } => format!("No event with id {}", id),
            Self::Parse(e) => format!("Could not read event: {}", e),
        }
    }
}
