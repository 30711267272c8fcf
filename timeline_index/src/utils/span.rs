//! Half-open coordinate ranges for the timeline index
//!
//! Every registered token and every tree fragment is described by a
//! [`Span`]. A span with `start == end` is a single point; the containment
//! and intersection rules below treat such spans as the point itself rather
//! than as an empty range.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::index::{IndexError, IndexResult};

/// Coordinate type accepted by the index (timestamps, offsets, ...).
pub trait Coordinate: Copy + Ord + fmt::Debug + fmt::Display {}

impl<T> Coordinate for T where T: Copy + Ord + fmt::Debug + fmt::Display {}

/// A half-open range `[start, end)` on the coordinate line.
///
/// The derived ordering compares `start` first and `end` second, which is
/// exactly the in-order position of fragments in the tree: `[x, p)` sorts
/// before the point `[p, p)`, which sorts before `[p, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span<C> {
    /// Start coordinate (inclusive)
    pub start: C,
    /// End coordinate (exclusive)
    pub end: C,
}

impl<C: Coordinate> Span<C> {
    /// Create a new span
    pub fn new(start: C, end: C) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Create a span, rejecting `end < start`
    pub fn checked(start: C, end: C) -> IndexResult<Self> {
        if end < start {
            return Err(IndexError::invalid_range(start, end));
        }
        Ok(Self { start, end })
    }

    /// Create a single-point span
    pub fn point(at: C) -> Self {
        Self { start: at, end: at }
    }

    /// Get the start coordinate of this span
    pub fn start(&self) -> C {
        self.start
    }

    /// Get the end coordinate of this span
    pub fn end(&self) -> C {
        self.end
    }

    /// Check if this span is a single point
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Check if the point `at` lies in this span
    pub fn contains_point(&self, at: C) -> bool {
        if self.is_point() {
            at == self.start
        } else {
            self.start <= at && at < self.end
        }
    }

    /// Check if `other` lies entirely inside this span
    pub fn contains(&self, other: &Self) -> bool {
        if other.is_point() {
            self.contains_point(other.start)
        } else {
            self.start <= other.start && other.end <= self.end
        }
    }

    /// Check if this span shares at least one coordinate with `other`
    pub fn intersects(&self, other: &Self) -> bool {
        match (self.is_point(), other.is_point()) {
            (true, true) => self.start == other.start,
            (true, false) => other.contains_point(self.start),
            (false, true) => self.contains_point(other.start),
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }

    /// Check if `other` begins exactly where this span ends
    pub fn is_followed_by(&self, other: &Self) -> bool {
        self.end == other.start
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl<C: fmt::Display> fmt::Display for Span<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_checked_rejects_reversed_bounds() {
        assert_matches!(Span::checked(5, 4), Err(IndexError::InvalidRange { .. }));
        assert_eq!(Span::checked(4, 4).unwrap(), Span::point(4));
    }

    #[test]
    fn test_fragment_ordering() {
        let before = Span::new(10, 15);
        let point = Span::point(15);
        let after = Span::new(15, 20);

        assert!(before < point);
        assert!(point < after);
    }

    #[test]
    fn test_point_containment() {
        let span = Span::new(10, 20);

        assert!(span.contains_point(10));
        assert!(span.contains_point(19));
        assert!(!span.contains_point(20));
        assert!(span.contains(&Span::point(10)));
        assert!(!span.contains(&Span::point(20)));
        assert!(Span::point(7).contains(&Span::point(7)));
    }

    #[test]
    fn test_intersection_rules() {
        let span = Span::new(10, 20);

        assert!(span.intersects(&Span::new(19, 30)));
        assert!(!span.intersects(&Span::new(20, 30)));
        assert!(span.intersects(&Span::point(17)));
        assert!(span.intersects(&Span::point(10)));
        assert!(!span.intersects(&Span::point(20)));
        assert!(Span::point(10).intersects(&Span::new(10, 11)));
        assert!(!Span::point(10).intersects(&Span::new(5, 10)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Span::new(3, 9).to_string(), "[3, 9)");
    }
}
