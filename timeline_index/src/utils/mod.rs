pub mod span;

pub use span::{Coordinate, Span};
