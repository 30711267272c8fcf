//! Tree nodes: one fragment of the coordinate line and the tokens covering it

use crate::utils::{Coordinate, Span};
use std::collections::HashSet;
use std::hash::Hash;

/// Owned, optional child link
pub(crate) type Link<K, C> = Option<Box<Node<K, C>>>;

/// A fragment `[start, end)` plus every token whose registered range
/// contains it. Bounds are adjusted in place by splits and merges; the
/// node is only ever reachable through its parent's link.
#[derive(Debug, Clone)]
pub struct Node<K, C> {
    pub(crate) span: Span<C>,
    pub(crate) tokens: HashSet<K>,
    pub(crate) height: i32,
    pub(crate) left: Link<K, C>,
    pub(crate) right: Link<K, C>,
}

impl<K, C> Node<K, C>
where
    K: Eq + Hash,
    C: Coordinate,
{
    /// Create a leaf node
    pub(crate) fn new(span: Span<C>, tokens: HashSet<K>) -> Self {
        Self {
            span,
            tokens,
            height: 0,
            left: None,
            right: None,
        }
    }

    pub(crate) fn boxed(span: Span<C>, tokens: HashSet<K>) -> Box<Self> {
        Box::new(Self::new(span, tokens))
    }

    /// The fragment this node owns
    pub fn span(&self) -> Span<C> {
        self.span
    }

    /// Tokens covering the whole fragment
    pub fn tokens(&self) -> &HashSet<K> {
        &self.tokens
    }

    /// Cached subtree height (leaf = 0)
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn left(&self) -> Option<&Node<K, C>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node<K, C>> {
        self.right.as_deref()
    }
}
