//! TOML schedule files
//!
//! ```toml
//! [[event]]
//! label = "standup"
//! start = "2024-06-03T09:30:00+02:00"
//! duration = { minutes = 15 }
//!
//! [[event]]
//! label = "review"
//! start = "2024-06-03T14:00:00+02:00"
//! end = "2024-06-03T15:00:00+02:00"
//! ```
//!
//! Instants are quoted RFC 3339 strings.

use crate::error::{CliError, CliResult};
use chrono::DateTime;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use timeline_scheduler::{CalendarDuration, EventConfig, Scheduler, SchedulerConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleFile {
    #[serde(default, rename = "event")]
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventEntry {
    pub label: Option<String>,
    pub start: String,
    pub end: Option<String>,
    pub duration: Option<CalendarDuration>,
}

impl EventEntry {
    /// Convert to a scheduler event; `position` is 1-based for messages
    pub fn to_config(&self, position: usize) -> CliResult<EventConfig> {
        let label = self.label.as_deref();
        let parse = |field: &str, text: &str| {
            DateTime::parse_from_rfc3339(text)
                .map_err(|e| CliError::invalid_event(position, label, format!("{} {:?}: {}", field, text, e)))
        };

        let mut config = EventConfig::new(parse("start", &self.start)?);
        match (&self.end, &self.duration) {
            (Some(_), Some(_)) => {
                return Err(CliError::invalid_event(position, label, "set either end or duration, not both"))
            }
            (Some(end), None) => config = config.ending_at(parse("end", end)?),
            (None, Some(duration)) => config = config.lasting(*duration),
            (None, None) => {}
        }

        if let Some(label) = label {
            config = config.with_label(label);
        }
        Ok(config)
    }
}

impl ScheduleFile {
    pub fn from_path(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> CliResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Schedule every entry, in file order
    pub fn build(&self, config: SchedulerConfig) -> CliResult<Scheduler> {
        let mut scheduler = Scheduler::with_config(config);
        for (offset, entry) in self.events.iter().enumerate() {
            let position = offset + 1;
            let event = entry.to_config(position)?;
            let id = scheduler
                .schedule(&event)
                .map_err(|e| CliError::invalid_event(position, entry.label.as_deref(), e.user_message()))?;
            log::debug!("Event #{} scheduled as {}", position, id);
        }
        Ok(scheduler)
    }
}
