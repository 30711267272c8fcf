//! # Timeline Scheduler
//!
//! Calendar events on top of [`timeline_index`]: event definitions with
//! RFC 3339 instants and calendar durations are resolved to millisecond
//! ranges and indexed by a monotonically increasing [`EventId`].
//!
//! ```no_run
//! use chrono::DateTime;
//! use timeline_scheduler::{CalendarDuration, EventConfig, Scheduler};
//!
//! let mut scheduler = Scheduler::new();
//! let start = DateTime::parse_from_rfc3339("2024-06-01T10:00:00+02:00")?;
//! let id = scheduler.schedule(&EventConfig::new(start).lasting(CalendarDuration::new().hours(1)))?;
//! assert!(scheduler.is_busy_at(start));
//! # let _ = id;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod duration;
pub mod error;
pub mod event;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use duration::CalendarDuration;
pub use error::{SchedulerError, SchedulerResult};
pub use event::{EventConfig, EventId, EventInfo};
pub use scheduler::Scheduler;
