//! Queries over trees whose values follow binary-search-tree ordering.

use std::cmp::Ordering;

use tracing::{debug, instrument, trace};

use crate::domain::{BinaryTree, DomainError, NodeId, Side, Sum, TreeResult, Value};

/// Strict BST check: every left descendant is smaller and every right
/// descendant larger than its ancestor. Empty trees are valid.
#[instrument(level = "debug", skip(tree))]
pub fn is_valid_bst(tree: &BinaryTree) -> bool {
    // Exclusive bounds, widened so the extreme `Value`s stay representable.
    let mut stack: Vec<(NodeId, Sum, Sum)> = tree
        .root()
        .map(|id| (id, Sum::MIN, Sum::MAX))
        .into_iter()
        .collect();

    while let Some((id, low, high)) = stack.pop() {
        let Some(node) = tree.get_node(id) else {
            continue;
        };
        let v = Sum::from(node.value);
        if v <= low || v >= high {
            return false;
        }
        stack.extend(node.left.map(|l| (l, low, v)));
        stack.extend(node.right.map(|r| (r, v, high)));
    }
    true
}

/// Node holding `value`, if any.
pub fn search_bst(tree: &BinaryTree, value: Value) -> Option<NodeId> {
    let mut current = tree.root();
    while let Some(id) = current {
        let node = tree.get_node(id)?;
        current = match value.cmp(&node.value) {
            Ordering::Equal => return Some(id),
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
        };
    }
    None
}

/// Insert `value` as a new leaf, keeping BST order.
///
/// Values must stay unique: inserting a value already present fails with
/// `MalformedInput` and leaves the tree unchanged, so `is_valid_bst` keeps
/// holding for trees built this way.
#[instrument(level = "debug", skip(tree))]
pub fn insert_into_bst(tree: &mut BinaryTree, value: Value) -> TreeResult<NodeId> {
    let mut current = match tree.root() {
        None => return tree.insert_node(value, None),
        Some(root) => root,
    };
    loop {
        let node = tree.node(current)?;
        let side = match value.cmp(&node.value) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => {
                return Err(DomainError::MalformedInput(format!(
                    "value {} is already present",
                    value
                )))
            }
        };
        match node.child(side) {
            Some(next) => current = next,
            None => {
                trace!(?side, parent = %current, "attaching new leaf");
                return tree.insert_node(value, Some((current, side)));
            }
        }
    }
}

/// Remove the node holding `value`. Returns `false` when no node holds it.
///
/// A node with at most one child is replaced by that child. A node with two
/// children takes over the value of its inorder successor (leftmost node of
/// the right subtree), and the successor is unlinked instead.
#[instrument(level = "debug", skip(tree))]
pub fn delete_from_bst(tree: &mut BinaryTree, value: Value) -> TreeResult<bool> {
    // Descend to the target, remembering the slot that points at it.
    let mut slot: Option<(NodeId, Side)> = None;
    let mut current = tree.root();
    let target = loop {
        let Some(id) = current else {
            debug!(value, "value not found");
            return Ok(false);
        };
        let node = tree.node(id)?;
        let side = match value.cmp(&node.value) {
            Ordering::Equal => break id,
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
        };
        slot = Some((id, side));
        current = node.child(side);
    };

    let (left, right) = {
        let node = tree.node(target)?;
        (node.left, node.right)
    };
    match (left, right) {
        (Some(_), Some(right)) => {
            let mut successor_slot = (target, Side::Right);
            let mut successor = right;
            while let Some(next) = tree.node(successor)?.left {
                successor_slot = (successor, Side::Left);
                successor = next;
            }
            let successor_node = tree.node(successor)?.clone();
            trace!(node = %target, successor = %successor, "replacing with inorder successor");
            tree.relink(Some(successor_slot), successor_node.right);
            tree.remove_node(successor);
            if let Some(node) = tree.get_node_mut(target) {
                node.value = successor_node.value;
            }
        }
        (child, None) | (None, child) => {
            tree.relink(slot, child);
            tree.remove_node(target);
        }
    }
    tree.touch();
    Ok(true)
}

/// The `k`-th smallest value, 1-based.
#[instrument(level = "debug", skip(tree))]
pub fn kth_smallest(tree: &BinaryTree, k: usize) -> TreeResult<Value> {
    k.checked_sub(1)
        .and_then(|skip| tree.iter_inorder().nth(skip))
        .map(|(_, node)| node.value)
        .ok_or_else(|| {
            DomainError::PreconditionViolated(format!(
                "k = {} is outside 1..={}",
                k,
                tree.len()
            ))
        })
}

/// Sum of all values within `low..=high`, skipping subtrees outside the range.
#[instrument(level = "debug", skip(tree))]
pub fn range_sum_bst(tree: &BinaryTree, low: Value, high: Value) -> Sum {
    let mut total: Sum = 0;
    let mut stack: Vec<NodeId> = tree.root().into_iter().collect();
    while let Some(id) = stack.pop() {
        let Some(node) = tree.get_node(id) else {
            continue;
        };
        if node.value < low {
            stack.extend(node.right);
        } else if node.value > high {
            stack.extend(node.left);
        } else {
            total += Sum::from(node.value);
            stack.extend(node.left);
            stack.extend(node.right);
        }
    }
    total
}

/// Lowest common ancestor using the ordering instead of a full traversal.
#[instrument(level = "debug", skip(tree))]
pub fn bst_lowest_common_ancestor(tree: &BinaryTree, p: NodeId, q: NodeId) -> TreeResult<NodeId> {
    let a = tree.node(p)?.value;
    let b = tree.node(q)?.value;
    let mut current = tree.root();
    while let Some(id) = current {
        let node = tree.node(id)?;
        current = if a < node.value && b < node.value {
            node.left
        } else if a > node.value && b > node.value {
            node.right
        } else {
            return Ok(id);
        };
    }
    Err(DomainError::PreconditionViolated(
        "tree is empty or not ordered".to_string(),
    ))
}
