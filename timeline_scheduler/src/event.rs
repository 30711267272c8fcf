//! # Event Types
//!
//! Caller-facing event definitions and the records the scheduler hands back.

use crate::duration::CalendarDuration;
use crate::error::{SchedulerError, SchedulerResult};
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to each scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event definition: a start instant plus either an end instant or a
/// duration measured from the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub start: DateTime<FixedOffset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<FixedOffset>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<CalendarDuration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EventConfig {
    /// Zero-length event at `start`
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            end: None,
            duration: None,
            label: None,
        }
    }

    /// Parse an event from JSON
    pub fn from_json(json: &str) -> SchedulerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn ending_at(mut self, end: DateTime<FixedOffset>) -> Self {
        self.end = Some(end);
        self.duration = None;
        self
    }

    pub fn lasting(mut self, duration: CalendarDuration) -> Self {
        self.duration = Some(duration);
        self.end = None;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Resolve the end instant.
    ///
    /// An event with neither `end` nor `duration` is a point in time.
    pub fn resolve_end(&self) -> SchedulerResult<DateTime<FixedOffset>> {
        match (&self.end, &self.duration) {
            (Some(_), Some(_)) => Err(SchedulerError::invalid_config(
                "both end and duration are set",
            )),
            (Some(end), None) => Ok(*end),
            (None, Some(duration)) => duration.apply_to(self.start),
            (None, None) => Ok(self.start),
        }
    }

    /// Millisecond timestamps `(start, end)` used as index coordinates
    pub fn to_millis(&self) -> SchedulerResult<(i64, i64)> {
        let end = self.resolve_end()?;
        Ok((self.start.timestamp_millis(), end.timestamp_millis()))
    }
}

/// A scheduled event as reported by queries and enumeration.
///
/// `fragment_start`/`fragment_end` bound the piece of the event this record
/// describes; for lookups that are not fragment-based they equal the full
/// range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub id: EventId,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub fragment_start: DateTime<FixedOffset>,
    pub fragment_end: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EventInfo {
    /// Whether this record covers the whole event
    pub fn is_whole(&self) -> bool {
        self.fragment_start == self.start && self.fragment_end == self.end
    }

    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }
}

/// Convert index coordinates back to an instant in `offset`
pub(crate) fn instant(millis: i64, offset: &FixedOffset) -> SchedulerResult<DateTime<FixedOffset>> {
    offset
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| SchedulerError::out_of_range("timestamp is not representable"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    #[test]
    fn test_end_or_duration() {
        let start = at("2024-06-01T10:00:00+01:00");

        let config = EventConfig::new(start).ending_at(at("2024-06-01T11:00:00+01:00"));
        assert_eq!(config.to_millis().unwrap(), (start.timestamp_millis(), start.timestamp_millis() + 3_600_000));

        let config = EventConfig::new(start).lasting(CalendarDuration::new().minutes(90));
        assert_eq!(config.resolve_end().unwrap(), at("2024-06-01T11:30:00+01:00"));

        let config = EventConfig::new(start);
        assert_eq!(config.resolve_end().unwrap(), start);
    }

    #[test]
    fn test_conflicting_config() {
        let mut config = EventConfig::new(at("2024-06-01T10:00:00Z")).lasting(CalendarDuration::new().hours(1));
        config.end = Some(at("2024-06-01T12:00:00Z"));

        assert_matches!(config.resolve_end(), Err(SchedulerError::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_json() {
        let config = EventConfig::from_json(
            r#"{"start": "2024-06-01T10:00:00+02:00", "duration": {"hours": 2}, "label": "standup"}"#,
        )
        .unwrap();

        assert_eq!(config.label.as_deref(), Some("standup"));
        assert_eq!(config.resolve_end().unwrap(), at("2024-06-01T12:00:00+02:00"));
        assert_matches!(EventConfig::from_json("{}"), Err(SchedulerError::Parse(_)));
    }

    #[test]
    fn test_instant_keeps_offset() {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let when = instant(0, &offset).unwrap();

        assert_eq!(when.offset(), &offset);
        assert_eq!(when.to_rfc3339(), "1970-01-01T05:00:00+05:00");
    }
}
