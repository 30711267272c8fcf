//! Overlap queries
//!
//! Every query descends symmetrically: the left subtree is consulted when
//! the query starts at or before the node, the right subtree when it ends
//! at or after the node. Boundary equality is included so zero-width
//! fragments sitting exactly on a node's bounds are reached.

use super::node::{Link, Node};
use super::IntervalTree;
use crate::utils::{Coordinate, Span};
use std::collections::HashSet;
use std::hash::Hash;

impl<K, C> IntervalTree<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    /// Whether any fragment intersects `span`
    pub fn filled(&self, span: &Span<C>) -> bool {
        any_intersecting(&self.root, span)
    }

    /// Distinct tokens across every fragment intersecting `span`
    pub fn keys(&self, span: &Span<C>) -> HashSet<&K> {
        let mut keys = HashSet::new();
        for node in self.nodes_intersecting(span) {
            keys.extend(node.tokens.iter());
        }
        keys
    }

    /// Fragments intersecting `span`, left to right
    pub fn nodes_intersecting(&self, span: &Span<C>) -> Vec<&Node<K, C>> {
        let mut out = Vec::new();
        collect(&self.root, span, &|node: &Node<K, C>| node.span.intersects(span), &mut out);
        out
    }

    pub(crate) fn spans_intersecting(&self, span: &Span<C>) -> Vec<Span<C>> {
        self.nodes_intersecting(span)
            .into_iter()
            .map(|node| node.span)
            .collect()
    }

    /// Fragments intersecting `span` or sharing one of its bounds, left to
    /// right. These are the only candidates a merge around `span` can touch.
    pub(crate) fn spans_touching(&self, span: &Span<C>) -> Vec<Span<C>> {
        let mut out = Vec::new();
        collect(
            &self.root,
            span,
            &|node: &Node<K, C>| node.span.start <= span.end && node.span.end >= span.start,
            &mut out,
        );
        out.into_iter().map(|node| node.span).collect()
    }

    /// Every fragment, left to right
    pub(crate) fn nodes(&self) -> Vec<&Node<K, C>> {
        self.iter_nodes().collect()
    }
}

fn any_intersecting<K, C: Coordinate>(link: &Link<K, C>, span: &Span<C>) -> bool {
    let Some(node) = link.as_deref() else {
        return false;
    };

    node.span.intersects(span)
        || (span.start <= node.span.start && any_intersecting(&node.left, span))
        || (span.end >= node.span.end && any_intersecting(&node.right, span))
}

fn collect<'a, K, C, F>(link: &'a Link<K, C>, span: &Span<C>, keep: &F, out: &mut Vec<&'a Node<K, C>>)
where
    C: Coordinate,
    F: Fn(&Node<K, C>) -> bool,
{
    let Some(node) = link.as_deref() else {
        return;
    };

    if span.start <= node.span.start {
        collect(&node.left, span, keep, out);
    }
    if keep(node) {
        out.push(node);
    }
    if span.end >= node.span.end {
        collect(&node.right, span, keep, out);
    }
}
