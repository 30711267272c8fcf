//! Stack-based, left-to-right traversal

use super::node::Node;
use super::IntervalTree;
use crate::config::constants::compile_time::tree::INITIAL_STACK_CAPACITY;
use crate::utils::{Coordinate, Span};
use std::collections::hash_set;
use std::collections::HashSet;
use std::hash::Hash;
use std::iter::FusedIterator;

/// In-order node cursor over an explicit ancestor stack
#[derive(Debug, Clone)]
pub(crate) struct InOrder<'a, K, C> {
    stack: Vec<&'a Node<K, C>>,
}

impl<'a, K, C> InOrder<'a, K, C> {
    pub(crate) fn new(root: Option<&'a Node<K, C>>) -> Self {
        let mut cursor = Self {
            stack: Vec::with_capacity(INITIAL_STACK_CAPACITY),
        };
        cursor.descend_left(root);
        cursor
    }

    fn descend_left(&mut self, mut node: Option<&'a Node<K, C>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }

    /// The node the next call to `next` will return
    pub(crate) fn peek(&self) -> Option<&'a Node<K, C>> {
        self.stack.last().copied()
    }
}

impl<'a, K, C> Iterator for InOrder<'a, K, C> {
    type Item = &'a Node<K, C>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        Some(node)
    }
}

/// Lazy `(token, fragment)` sequence in left-to-right coordinate order.
///
/// A token owning several fragments is reported once per fragment. A point
/// fragment `[p, p)` also holds every token of the fragment starting at
/// `p`; those are reported with that fragment instead, so the point only
/// yields the tokens registered exactly at `p`.
#[derive(Debug, Clone)]
pub struct Fragments<'a, K, C> {
    nodes: InOrder<'a, K, C>,
    current: Option<(Span<C>, hash_set::Iter<'a, K>)>,
    reported_later: Option<&'a HashSet<K>>,
}

impl<'a, K, C> Fragments<'a, K, C>
where
    K: Eq + Hash,
    C: Coordinate,
{
    pub(crate) fn new(root: Option<&'a Node<K, C>>) -> Self {
        Self {
            nodes: InOrder::new(root),
            current: None,
            reported_later: None,
        }
    }
}

impl<'a, K, C> Iterator for Fragments<'a, K, C>
where
    K: Eq + Hash,
    C: Coordinate,
{
    type Item = (&'a K, Span<C>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((span, tokens)) = self.current.as_mut() {
                let guard = self.reported_later;
                if let Some(token) = tokens.find(|token| !guard.is_some_and(|seen| seen.contains(*token))) {
                    return Some((token, *span));
                }
                self.current = None;
            }

            let node = self.nodes.next()?;
            self.reported_later = if node.span.is_point() {
                self.nodes
                    .peek()
                    .filter(|next| !next.span.is_point() && next.span.start == node.span.start)
                    .map(|next| &next.tokens)
            } else {
                None
            };
            self.current = Some((node.span, node.tokens.iter()));
        }
    }
}

impl<K, C> FusedIterator for Fragments<'_, K, C>
where
    K: Eq + Hash,
    C: Coordinate,
{
}

impl<K, C> IntervalTree<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    /// Every `(token, fragment)` pair, left to right
    pub fn iter(&self) -> Fragments<'_, K, C> {
        Fragments::new(self.root.as_deref())
    }

    /// Every fragment node, left to right
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node<K, C>> + '_ {
        InOrder::new(self.root.as_deref())
    }
}

impl<'a, K, C> IntoIterator for &'a IntervalTree<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    type Item = (&'a K, Span<C>);
    type IntoIter = Fragments<'a, K, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
