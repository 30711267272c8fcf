//! Removal: drain a token, splice out emptied fragments, merge equal neighbours

use super::balance::{rebalance, rebalance_link};
use super::node::{Link, Node};
use super::IntervalTree;
use crate::log_debug;
use crate::logging::codes;
use crate::utils::{Coordinate, Span};
use std::cmp::Ordering;
use std::hash::Hash;

impl<K, C> IntervalTree<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    /// Remove `token` from every fragment inside `span` (the range it was
    /// registered with). Returns whether any fragment held it.
    pub fn remove(&mut self, token: &K, span: &Span<C>) -> bool {
        let mut drained = Vec::new();
        drain(&mut self.root, span, token, &mut drained);
        if drained.is_empty() {
            return false;
        }

        for (fragment, emptied) in &drained {
            if *emptied {
                self.detach(fragment);
            }
        }

        self.normalize(span);
        true
    }

    /// Unlink the fragment with exactly this span
    pub(crate) fn detach(&mut self, span: &Span<C>) -> Option<Box<Node<K, C>>> {
        let removed = detach(&mut self.root, span)?;
        self.fragments -= 1;
        if self.log_structure {
            log_debug!(
                codes::tree::FRAGMENT_DETACHED,
                "Fragment detached",
                "span" => removed.span,
                "fragments" => self.fragments
            );
        }
        Some(removed)
    }

    /// Restore partition minimality around `span` after a removal.
    ///
    /// Points whose token set equals that of the fragment starting at the
    /// same coordinate are absorbed first; then contiguous proper fragments
    /// with equal sets are merged, cascading across the whole window.
    fn normalize(&mut self, span: &Span<C>) {
        let window = self.spans_touching(span);
        for pair in window.windows(2) {
            let (point, next) = (pair[0], pair[1]);
            if point.is_point()
                && !next.is_point()
                && next.start == point.start
                && self.same_tokens(&point, &next)
            {
                self.detach(&point);
                if self.log_structure {
                    log_debug!(
                        codes::tree::POINT_ABSORBED,
                        "Point fragment absorbed",
                        "point" => point,
                        "into" => next
                    );
                }
            }
        }

        let window = self.spans_touching(span);
        let mut iter = window.into_iter();
        let Some(mut current) = iter.next() else {
            return;
        };

        for next in iter {
            let mergeable = !current.is_point()
                && !next.is_point()
                && current.is_followed_by(&next)
                && self.same_tokens(&current, &next);

            if !mergeable {
                current = next;
                continue;
            }

            self.detach(&next);
            let merged = current.merge(next);
            if let Some(node) = self.find_mut(&current) {
                node.span = merged;
            }
            if self.log_structure {
                log_debug!(
                    codes::tree::FRAGMENT_MERGED,
                    "Adjacent fragments merged",
                    "left" => current,
                    "right" => next,
                    "merged" => merged
                );
            }
            current = merged;
        }
    }

    fn same_tokens(&self, a: &Span<C>, b: &Span<C>) -> bool {
        match (self.tokens_of(a), self.tokens_of(b)) {
            (Some(a), Some(b)) => !a.is_empty() && a == b,
            _ => false,
        }
    }
}

/// Delete `token` from each fragment contained in `span`, recording the
/// fragment and whether its set is now empty
fn drain<K, C>(link: &mut Link<K, C>, span: &Span<C>, token: &K, drained: &mut Vec<(Span<C>, bool)>)
where
    K: Eq + Hash,
    C: Coordinate,
{
    let Some(node) = link.as_deref_mut() else {
        return;
    };

    if span.start <= node.span.start {
        drain(&mut node.left, span, token, drained);
    }
    if span.contains(&node.span) && node.tokens.remove(token) {
        drained.push((node.span, node.tokens.is_empty()));
    }
    if span.end >= node.span.end {
        drain(&mut node.right, span, token, drained);
    }
}

fn detach<K, C: Coordinate>(link: &mut Link<K, C>, span: &Span<C>) -> Option<Box<Node<K, C>>> {
    let node = link.as_mut()?;
    let removed = match span.cmp(&node.span) {
        Ordering::Less => detach(&mut node.left, span),
        Ordering::Greater => detach(&mut node.right, span),
        Ordering::Equal => {
            let mut removed = link.take()?;
            *link = splice(&mut removed);
            return Some(removed);
        }
    };
    rebalance_link(link);
    removed
}

/// Build the subtree that replaces `node` once it is unlinked: its only
/// child, or its in-order predecessor (left-heavy) or successor carrying
/// both children.
fn splice<K, C>(node: &mut Node<K, C>) -> Link<K, C> {
    match (node.left.take(), node.right.take()) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(left), Some(right)) => {
            if left.height > right.height {
                let mut left = Some(left);
                let Some(mut predecessor) = take_max(&mut left) else {
                    return Some(right);
                };
                predecessor.left = left;
                predecessor.right = Some(right);
                Some(rebalance(predecessor))
            } else {
                let mut right = Some(right);
                let Some(mut successor) = take_min(&mut right) else {
                    return Some(left);
                };
                successor.left = Some(left);
                successor.right = right;
                Some(rebalance(successor))
            }
        }
    }
}

fn take_max<K, C>(link: &mut Link<K, C>) -> Option<Box<Node<K, C>>> {
    let node = link.as_mut()?;
    if node.right.is_some() {
        let max = take_max(&mut node.right);
        rebalance_link(link);
        return max;
    }

    let mut max = link.take()?;
    *link = max.left.take();
    Some(max)
}

fn take_min<K, C>(link: &mut Link<K, C>) -> Option<Box<Node<K, C>>> {
    let node = link.as_mut()?;
    if node.left.is_some() {
        let min = take_min(&mut node.left);
        rebalance_link(link);
        return min;
    }

    let mut min = link.take()?;
    *link = min.right.take();
    Some(min)
}
