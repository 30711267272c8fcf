//! Structural invariant checks

use super::balance::{balance_factor, height};
use super::node::{Link, Node};
use super::IntervalTree;
use crate::config::constants::compile_time::tree::MAX_BALANCE_FACTOR;
use crate::index::{IndexError, IndexResult};
use crate::utils::{Coordinate, Span};
use std::hash::Hash;

impl<K, C> IntervalTree<K, C>
where
    K: Eq + Hash + Clone,
    C: Coordinate,
{
    /// Check ordering, height balance, cached heights, non-empty token sets
    /// and partition minimality over the whole tree.
    pub fn validate(&self) -> IndexResult<()> {
        check_heights(&self.root)?;

        let nodes = self.nodes();
        if nodes.len() != self.fragments {
            return Err(IndexError::invariant_violation(&format!(
                "fragment count {} does not match {} reachable nodes",
                self.fragments,
                nodes.len()
            )));
        }

        for node in &nodes {
            if node.tokens.is_empty() {
                return Err(IndexError::invariant_violation(&format!(
                    "fragment {} has no tokens",
                    node.span
                )));
            }
        }

        for pair in nodes.windows(2) {
            check_adjacent(pair[0], pair[1])?;
        }

        Ok(())
    }
}

/// Verify cached heights and balance factors bottom-up, returning the
/// recomputed height.
fn check_heights<K, C: Coordinate>(link: &Link<K, C>) -> IndexResult<i32> {
    let Some(node) = link.as_deref() else {
        return Ok(height(link));
    };

    let left = check_heights(&node.left)?;
    let right = check_heights(&node.right)?;
    let expected = 1 + left.max(right);

    if node.height != expected {
        return Err(IndexError::invariant_violation(&format!(
            "fragment {} caches height {} but has height {}",
            node.span, node.height, expected
        )));
    }
    if balance_factor(node).abs() > MAX_BALANCE_FACTOR {
        return Err(IndexError::invariant_violation(&format!(
            "fragment {} has balance factor {}",
            node.span,
            balance_factor(node)
        )));
    }
    Ok(expected)
}

fn check_adjacent<K, C>(prev: &Node<K, C>, next: &Node<K, C>) -> IndexResult<()>
where
    K: Eq + Hash,
    C: Coordinate,
{
    let (a, b): (Span<C>, Span<C>) = (prev.span, next.span);

    if a >= b || a.end > b.start {
        return Err(IndexError::invariant_violation(&format!(
            "fragments {} and {} are out of order or overlap",
            a, b
        )));
    }

    let contiguous_proper = !a.is_point() && !b.is_point() && a.is_followed_by(&b);
    let absorbable_point = a.is_point() && !b.is_point() && a.start == b.start;
    if (contiguous_proper || absorbable_point) && prev.tokens == next.tokens {
        return Err(IndexError::invariant_violation(&format!(
            "fragments {} and {} carry equal token sets and were not merged",
            a, b
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_tree_is_valid() {
        let tree: IntervalTree<u8, i64> = IntervalTree::new();
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_detects_stale_height() {
        let mut tree = IntervalTree::new();
        tree.insert(1u8, Span::new(0, 10));
        tree.insert(2u8, Span::new(20, 30));
        if let Some(root) = tree.root.as_deref_mut() {
            root.height = 7;
        }

        assert_matches!(tree.validate(), Err(IndexError::InvariantViolation { .. }));
    }

    #[test]
    fn test_detects_unmerged_neighbours() {
        let mut tree = IntervalTree::new();
        tree.insert(1u8, Span::new(0, 10));
        tree.insert(2u8, Span::new(10, 20));
        if let Some(node) = tree.find_mut(&Span::new(10, 20)) {
            node.tokens.remove(&2);
            node.tokens.insert(1);
        }

        assert_matches!(tree.validate(), Err(IndexError::InvariantViolation { .. }));
    }
}
