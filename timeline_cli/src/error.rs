//! # CLI Errors

use timeline_scheduler::SchedulerError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Schedule file could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Schedule file is not valid TOML for the expected layout
    #[error("Invalid schedule file: {0}")]
    Toml(#[from] toml::de::Error),

    /// One `[[event]]` entry is malformed
    #[error("Event #{position} ({label}): {reason}")]
    InvalidEvent {
        position: usize,
        label: String,
        reason: String,
    },

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output failed: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    pub fn invalid_event(position: usize, label: Option<&str>, reason: impl Into<String>) -> Self {
        Self::InvalidEvent {
            position,
            label: label.unwrap_or("unlabelled").to_string(),
            reason: reason.into(),
        }
    }

    /// Message shown to the user on stderr
    pub fn user_message(&self) -> String {
        match self {
            Self::Scheduler(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
