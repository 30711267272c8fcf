//! Configuration module for the timeline index
//!
//! Compile-time constants live in [`constants`]; behavior that operators
//! may toggle without rebuilding is read from the environment by the
//! preference types in [`runtime`].

pub mod constants;
pub mod runtime;

pub use runtime::{IndexPreferences, LoggingPreferences};
