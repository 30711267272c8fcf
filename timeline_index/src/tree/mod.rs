//! Fragment-partitioned AVL interval tree
//!
//! The tree owns a set of disjoint fragments of the coordinate line. Each
//! fragment carries the tokens whose registered range contains it, so the
//! number of nodes grows with the number of distinct covered sub-ranges,
//! not with the number of tokens. Registration bookkeeping (which range a
//! token was registered with) lives one level up in
//! [`TimelineIndex`](crate::index::TimelineIndex); the tree is handed that
//! range whenever it needs it.

mod balance;
mod insert;
mod node;
mod query;
mod remove;
mod traversal;
mod validation;

pub use node::Node;
pub use traversal::Fragments;

use crate::utils::{Coordinate, Span};
use node::Link;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

/// Self-balancing tree of token-covered fragments
#[derive(Debug, Clone)]
pub struct IntervalTree<K, C> {
    root: Link<K, C>,
    fragments: usize,
    log_structure: bool,
}

impl<K, C> Default for IntervalTree<K, C> {
    fn default() -> Self {
        Self {
            root: None,
            fragments: 0,
            log_structure: false,
        }
    }
}

impl<K, C> IntervalTree<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit debug events for splits, merges and detaches
    pub fn with_structure_logging(mut self, enabled: bool) -> Self {
        self.log_structure = enabled;
        self
    }

    /// Number of live fragments
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree (`-1` when empty)
    pub fn height(&self) -> i32 {
        balance::height(&self.root)
    }

    pub fn root(&self) -> Option<&Node<K, C>> {
        self.root.as_deref()
    }

    /// Drop every fragment
    pub fn clear(&mut self) {
        self.root = None;
        self.fragments = 0;
    }

    /// Tokens of the fragment with exactly this span
    pub fn tokens_of(&self, span: &Span<C>) -> Option<&HashSet<K>> {
        self.find(span).map(|node| &node.tokens)
    }

    pub(crate) fn find(&self, span: &Span<C>) -> Option<&Node<K, C>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match span.cmp(&node.span) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    pub(crate) fn find_mut(&mut self, span: &Span<C>) -> Option<&mut Node<K, C>> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match span.cmp(&node.span) {
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// The proper fragment `[start, end)` with `start <= at < end`, if any
    pub(crate) fn locate(&self, at: C) -> Option<&Node<K, C>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if at < node.span.start {
                current = node.left.as_deref();
            } else if at >= node.span.end {
                current = node.right.as_deref();
            } else {
                return Some(node);
            }
        }
        None
    }

    pub(crate) fn locate_mut(&mut self, at: C) -> Option<&mut Node<K, C>> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            if at < node.span.start {
                current = node.left.as_deref_mut();
            } else if at >= node.span.end {
                current = node.right.as_deref_mut();
            } else {
                return Some(node);
            }
        }
        None
    }
}
