// RUNTIME PREFERENCES

use super::constants::compile_time::logging::{DEFAULT_LOG_LEVEL, LOG_LEVEL_ENV};
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPreferences {
    /// Whether to re-validate every tree invariant after each mutation
    pub verify_invariants: bool,

    /// Whether to emit debug events for splits, merges and detaches
    pub log_structure: bool,
}

impl Default for IndexPreferences {
    fn default() -> Self {
        Self {
            verify_invariants: env::var("TIMELINE_VERIFY_INVARIANTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_structure: env::var("TIMELINE_LOG_STRUCTURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

impl IndexPreferences {
    /// Preferences with every optional behavior off, ignoring the environment
    pub fn quiet() -> Self {
        Self {
            verify_invariants: false,
            log_structure: false,
        }
    }

    /// Enable post-mutation invariant checks
    pub fn with_invariant_checks(mut self) -> Self {
        self.verify_invariants = true;
        self
    }

    /// Enable structural-change logging
    pub fn with_structure_logging(mut self) -> Self {
        self.log_structure = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Minimum level name (`error`, `warn`, `info`, `debug`)
    pub level: String,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            level: env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl LoggingPreferences {
    /// Parsed minimum level, falling back to info on unknown names
    pub fn min_level(&self) -> LogLevel {
        LogLevel::parse(&self.level).unwrap_or(LogLevel::Info)
    }
}
