//! Token-keyed index of half-open ranges over an ordered line.
//!
//! Ranges are kept as a partition of disjoint fragments in a height-balanced
//! tree, each fragment carrying the set of tokens covering it, so memory
//! grows with the number of distinct covered sub-ranges rather than with
//! the number of tokens.

// Internal modules
pub mod config;
pub mod index;
#[macro_use]
pub mod logging;
pub mod tree;
pub mod utils;

// Re-export key types for library consumers
pub use config::IndexPreferences;
pub use index::{IndexError, IndexResult, TimelineIndex};
pub use tree::{Fragments, IntervalTree};
pub use utils::{Coordinate, Span};
