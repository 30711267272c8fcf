//! Insertion: split straddling fragments, fill uncovered gaps, tag the range

use super::balance::rebalance_link;
use super::node::{Link, Node};
use super::IntervalTree;
use crate::log_debug;
use crate::logging::codes;
use crate::utils::{Coordinate, Span};
use std::collections::HashSet;
use std::hash::Hash;

impl<K, C> IntervalTree<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    /// Add `token` to every fragment inside `span`, creating and splitting
    /// fragments as needed. The caller guarantees `token` is not already
    /// present anywhere in the tree.
    pub fn insert(&mut self, token: K, span: Span<C>) {
        if span.is_point() {
            self.insert_point(token, span.start);
            return;
        }

        self.split_at(span.start);
        self.split_at(span.end);

        for gap in self.gaps(&span) {
            self.attach(Node::boxed(gap, HashSet::new()));
            if self.log_structure {
                log_debug!(
                    codes::tree::FRAGMENT_CREATED,
                    "Fragment created for uncovered coordinates",
                    "span" => gap
                );
            }
        }

        tag(&mut self.root, &span, &token);
    }

    fn insert_point(&mut self, token: K, at: C) {
        let point = Span::point(at);
        if let Some(node) = self.find_mut(&point) {
            node.tokens.insert(token);
            return;
        }

        // A point inherits every token of the fragment it sits in
        let mut tokens = self
            .locate(at)
            .map(|node| node.tokens.clone())
            .unwrap_or_default();
        tokens.insert(token);

        self.split_at(at);
        self.attach(Node::boxed(point, tokens));
        if self.log_structure {
            log_debug!(
                codes::tree::FRAGMENT_CREATED,
                "Point fragment created",
                "span" => point
            );
        }
    }

    /// Split the proper fragment strictly containing `at` into
    /// `[start, at)` (shrunk in place) and a new `[at, end)` carrying the
    /// same tokens. Returns whether a split happened.
    pub(crate) fn split_at(&mut self, at: C) -> bool {
        let remainder = match self.locate_mut(at) {
            Some(node) if node.span.start < at => {
                let remainder = Node::boxed(Span::new(at, node.span.end), node.tokens.clone());
                node.span.end = at;
                remainder
            }
            _ => return false,
        };

        if self.log_structure {
            log_debug!(
                codes::tree::FRAGMENT_SPLIT,
                "Fragment split at range boundary",
                "at" => at,
                "remainder" => remainder.span
            );
        }
        self.attach(remainder);
        true
    }

    /// Sub-ranges of `span` not covered by any proper fragment. Point
    /// fragments act as boundaries so no gap ever swallows one.
    fn gaps(&self, span: &Span<C>) -> Vec<Span<C>> {
        let mut gaps = Vec::new();
        let mut cursor = span.start;

        for fragment in self.spans_intersecting(span) {
            if fragment.start > cursor {
                gaps.push(Span::new(cursor, fragment.start));
            }
            if fragment.end > cursor {
                cursor = fragment.end;
            }
        }

        if cursor < span.end {
            gaps.push(Span::new(cursor, span.end));
        }
        gaps
    }

    /// Link a detached node in at its in-order position
    pub(crate) fn attach(&mut self, node: Box<Node<K, C>>) {
        attach(&mut self.root, node);
        self.fragments += 1;
    }
}

fn attach<K, C: Coordinate>(link: &mut Link<K, C>, fragment: Box<Node<K, C>>) {
    let Some(node) = link.as_mut() else {
        *link = Some(fragment);
        return;
    };

    if fragment.span < node.span {
        attach(&mut node.left, fragment);
    } else {
        attach(&mut node.right, fragment);
    }
    rebalance_link(link);
}

/// Add `token` to every fragment contained in `span`
fn tag<K, C>(link: &mut Link<K, C>, span: &Span<C>, token: &K)
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    let Some(node) = link.as_deref_mut() else {
        return;
    };

    if span.start <= node.span.start {
        tag(&mut node.left, span, token);
    }
    if span.contains(&node.span) {
        node.tokens.insert(token.clone());
    }
    if span.end >= node.span.end {
        tag(&mut node.right, span, token);
    }
}
