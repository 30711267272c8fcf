//! # Timeline CLI
//!
//! Loads a TOML schedule into a [`timeline_scheduler::Scheduler`] and
//! answers listing and busy/free queries against it.

pub mod args;
pub mod commands;
pub mod error;
pub mod schedule;

pub use args::{Args, Command};
pub use commands::{execute, run};
pub use error::{CliError, CliResult};
pub use schedule::{EventEntry, ScheduleFile};
