//! # Scheduler
//!
//! Translates [`EventConfig`]s into millisecond ranges and keeps them in a
//! [`TimelineIndex`] keyed by [`EventId`]. Overlapping events are allowed;
//! deciding what a conflict means is left to callers.

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::event::{instant, EventConfig, EventId, EventInfo};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use timeline_index::{IndexError, Span, TimelineIndex};

#[derive(Debug, Clone)]
struct Entry {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    /// Index coordinates of `start..end`
    millis: (i64, i64),
    label: Option<String>,
}

impl Entry {
    fn resolve(config: &EventConfig) -> SchedulerResult<Self> {
        Ok(Self {
            start: config.start,
            end: config.resolve_end()?,
            millis: config.to_millis()?,
            label: config.label.clone(),
        })
    }

    fn info(&self, id: EventId, fragment: Span<i64>) -> SchedulerResult<EventInfo> {
        let offset = self.start.offset();
        Ok(EventInfo {
            id,
            start: self.start,
            end: self.end,
            fragment_start: instant(fragment.start, offset)?,
            fragment_end: instant(fragment.end, offset)?,
            label: self.label.clone(),
        })
    }
}

/// Calendar of possibly overlapping events
#[derive(Debug, Clone)]
pub struct Scheduler {
    index: TimelineIndex<EventId, i64>,
    events: HashMap<EventId, Entry>,
    next_id: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            index: TimelineIndex::with_preferences(config.index),
            events: HashMap::new(),
            next_id: config.first_id,
        }
    }

    /// Number of scheduled events
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.index.has(&id)
    }

    /// Add an event and return its id. Ids increase with every successful
    /// call and are never reused.
    pub fn schedule(&mut self, config: &EventConfig) -> SchedulerResult<EventId> {
        let entry = Entry::resolve(config)?;
        let (start, end) = entry.millis;
        let next = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| SchedulerError::out_of_range("event ids exhausted"))?;

        let id = EventId::new(self.next_id);
        self.index.set(id, start, end)?;
        self.next_id = next;

        log::debug!("Scheduled event {} from {} to {}", id, entry.start, entry.end);
        self.events.insert(id, entry);
        Ok(id)
    }

    /// Drop an event. Returns `false` if no event has this id.
    pub fn unschedule(&mut self, id: EventId) -> bool {
        if !self.index.remove(&id) {
            return false;
        }
        self.events.remove(&id);
        log::debug!("Unscheduled event {}", id);
        true
    }

    /// Move an existing event to the times described by `config`
    pub fn reschedule(&mut self, id: EventId, config: &EventConfig) -> SchedulerResult<()> {
        if !self.events.contains_key(&id) {
            return Err(SchedulerError::UnknownEvent { id });
        }

        let entry = Entry::resolve(config)?;
        let (start, end) = entry.millis;
        self.index.set(id, start, end)?;

        log::debug!("Rescheduled event {} to {} .. {}", id, entry.start, entry.end);
        self.events.insert(id, entry);
        Ok(())
    }

    /// The whole event registered under `id`
    pub fn event(&self, id: EventId) -> SchedulerResult<Option<EventInfo>> {
        let (Some(entry), Some(range)) = (self.events.get(&id), self.index.get_range(&id)) else {
            return Ok(None);
        };
        entry.info(id, range).map(Some)
    }

    /// Every scheduled event, whole, ordered by start then id
    pub fn all_events(&self) -> SchedulerResult<Vec<EventInfo>> {
        let mut infos = self
            .index
            .ranges()
            .map(|(id, range)| self.entry(*id)?.info(*id, range))
            .collect::<SchedulerResult<Vec<_>>>()?;

        infos.sort_by_key(|info| (info.start, info.id));
        Ok(infos)
    }

    /// Every event fragment in time order, optionally filtered.
    ///
    /// Where events overlap the timeline is cut into fragments, so an event
    /// may be reported once per fragment it spans.
    pub fn events(&self, filter: Option<&dyn Fn(&EventInfo) -> bool>) -> SchedulerResult<Vec<EventInfo>> {
        let mut infos = Vec::new();
        for (id, fragment) in &self.index {
            let info = self.entry(*id)?.info(*id, fragment)?;
            if filter.map_or(true, |keep| keep(&info)) {
                infos.push(info);
            }
        }
        Ok(infos)
    }

    /// Whole events overlapping `[from, to)`, ordered by start then id
    pub fn events_between(
        &self,
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
    ) -> SchedulerResult<Vec<EventInfo>> {
        let ids = self
            .index
            .get_keys(from.timestamp_millis(), to.timestamp_millis())?;

        let mut infos = ids
            .into_iter()
            .map(|id| {
                let entry = self.entry(*id)?;
                let (start, end) = entry.millis;
                entry.info(*id, Span::new(start, end))
            })
            .collect::<SchedulerResult<Vec<_>>>()?;

        infos.sort_by_key(|info| (info.start, info.id));
        Ok(infos)
    }

    /// Whether any event overlaps `[from, to)`
    pub fn is_busy(&self, from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> SchedulerResult<bool> {
        Ok(self.index.filled(from.timestamp_millis(), to.timestamp_millis())?)
    }

    /// Whether any event covers the instant `at`
    pub fn is_busy_at(&self, at: DateTime<FixedOffset>) -> bool {
        self.index.filled_at(at.timestamp_millis())
    }

    /// Verify the underlying index
    pub fn check_invariants(&self) -> SchedulerResult<()> {
        Ok(self.index.check_invariants()?)
    }

    pub fn index(&self) -> &TimelineIndex<EventId, i64> {
        &self.index
    }

    fn entry(&self, id: EventId) -> SchedulerResult<&Entry> {
        self.events.get(&id).ok_or_else(|| {
            IndexError::invariant_violation(&format!("index holds unknown event {}", id)).into()
        })
    }
}
