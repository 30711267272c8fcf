//! AVL height bookkeeping and rotations

use super::node::{Link, Node};
use crate::config::constants::compile_time::tree::{
    EMPTY_HEIGHT, MAX_BALANCE_FACTOR, MAX_ROTATION_BALANCE_FACTOR,
};
use crate::log_warning;
use crate::logging::codes;

pub(crate) fn height<K, C>(link: &Link<K, C>) -> i32 {
    link.as_ref().map_or(EMPTY_HEIGHT, |node| node.height)
}

pub(crate) fn update_height<K, C>(node: &mut Node<K, C>) {
    node.height = 1 + height(&node.left).max(height(&node.right));
}

/// `height(right) - height(left)`
pub(crate) fn balance_factor<K, C>(node: &Node<K, C>) -> i32 {
    height(&node.right) - height(&node.left)
}

pub(crate) fn rotate_left<K, C>(mut node: Box<Node<K, C>>) -> Box<Node<K, C>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    update_height(&mut node);
    pivot.left = Some(node);
    update_height(&mut pivot);
    pivot
}

pub(crate) fn rotate_right<K, C>(mut node: Box<Node<K, C>>) -> Box<Node<K, C>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    update_height(&mut node);
    pivot.right = Some(node);
    update_height(&mut pivot);
    pivot
}

/// Refresh the node's height and restore `|balance| <= 1` with a single or
/// double rotation.
pub(crate) fn rebalance<K, C>(mut node: Box<Node<K, C>>) -> Box<Node<K, C>> {
    update_height(&mut node);
    let factor = balance_factor(&node);

    if factor.abs() > MAX_ROTATION_BALANCE_FACTOR {
        return repair(node, factor);
    }

    if factor > MAX_BALANCE_FACTOR {
        if let Some(right) = node.right.take() {
            node.right = Some(if balance_factor(&right) < 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        rotate_left(node)
    } else if factor < -MAX_BALANCE_FACTOR {
        if let Some(left) = node.left.take() {
            node.left = Some(if balance_factor(&left) > 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        rotate_right(node)
    } else {
        node
    }
}

pub(crate) fn rebalance_link<K, C>(link: &mut Link<K, C>) {
    if let Some(node) = link.take() {
        *link = Some(rebalance(node));
    }
}

/// Handle a balance factor no single mutation can produce. Children are
/// rebalanced first, then the node is rotated toward its lighter side until
/// it is back within bounds, re-balancing the demoted node each time.
fn repair<K, C>(mut node: Box<Node<K, C>>, factor: i32) -> Box<Node<K, C>> {
    log_warning!(
        codes::tree::BALANCE_REPAIRED,
        "Balance factor outside rotation range",
        "factor" => factor,
        "height" => node.height
    );

    rebalance_link(&mut node.left);
    rebalance_link(&mut node.right);
    update_height(&mut node);

    for _ in 0..factor.abs() {
        let current = balance_factor(&node);
        if current.abs() <= MAX_BALANCE_FACTOR {
            break;
        }
        node = if current > 0 {
            let mut rotated = rotate_left(node);
            rebalance_link(&mut rotated.left);
            rotated
        } else {
            let mut rotated = rotate_right(node);
            rebalance_link(&mut rotated.right);
            rotated
        };
        update_height(&mut node);
    }

    node
}
