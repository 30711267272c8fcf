//! # Scheduler Configuration

use timeline_index::IndexPreferences;

/// Configuration for the [`Scheduler`](crate::Scheduler)
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Id handed to the first scheduled event
    pub first_id: u64,

    /// Preferences for the underlying index
    pub index: IndexPreferences,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            first_id: 1,
            index: IndexPreferences::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start numbering events at `first_id`
    pub fn with_first_id(mut self, first_id: u64) -> Self {
        self.first_id = first_id;
        self
    }

    pub fn with_index_preferences(mut self, index: IndexPreferences) -> Self {
        self.index = index;
        self
    }

    /// Re-validate the index after every change
    pub fn with_invariant_checks(mut self) -> Self {
        self.index = self.index.with_invariant_checks();
        self
    }
}
