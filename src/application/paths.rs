//! Path aggregator: path sums, diameter and deepest-node queries.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::{BinaryTree, DomainError, NodeId, Sum, TreeResult};

/// True iff some root-to-leaf path sums to `target`. Empty tree: false.
#[instrument(level = "debug", skip(tree))]
pub fn has_path_sum(tree: &BinaryTree, target: Sum) -> bool {
    let mut stack: Vec<(NodeId, Sum)> = tree.root().map(|id| (id, 0)).into_iter().collect();
    while let Some((id, above)) = stack.pop() {
        let Some(node) = tree.get_node(id) else {
            continue;
        };
        let sum = above + Sum::from(node.value);
        if node.is_leaf() && sum == target {
            return true;
        }
        for child in [node.right, node.left].into_iter().flatten() {
            stack.push((child, sum));
        }
    }
    false
}

enum Visit {
    Enter(NodeId, Sum),
    Leave(Sum),
}

/// Number of downward paths (any start, any end) whose values sum to `target`.
///
/// Keeps a multiset of root-to-ancestor prefix sums along the current branch;
/// each node contributes the number of ancestors whose prefix equals
/// `prefix - target`. The `{0: 1}` entry covers paths starting at the root.
#[instrument(level = "debug", skip(tree))]
pub fn count_paths_with_sum(tree: &BinaryTree, target: Sum) -> u64 {
    let mut prefixes: HashMap<Sum, u64> = HashMap::from([(0, 1)]);
    let mut count = 0u64;
    let mut stack: Vec<Visit> = tree.root().map(|id| Visit::Enter(id, 0)).into_iter().collect();

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(id, above) => {
                let Some(node) = tree.get_node(id) else {
                    continue;
                };
                let prefix = above + Sum::from(node.value);
                if let Some(need) = prefix.checked_sub(target) {
                    count += prefixes.get(&need).copied().unwrap_or(0);
                }
                *prefixes.entry(prefix).or_insert(0) += 1;

                stack.push(Visit::Leave(prefix));
                for child in [node.right, node.left].into_iter().flatten() {
                    stack.push(Visit::Enter(child, prefix));
                }
            }
            Visit::Leave(prefix) => {
                if let Some(n) = prefixes.get_mut(&prefix) {
                    *n -= 1;
                    if *n == 0 {
                        prefixes.remove(&prefix);
                    }
                }
            }
        }
    }
    count
}

/// Largest sum over any node-to-node path.
///
/// Fails on an empty tree: "no path" is kept distinct from a legitimately
/// negative maximum.
#[instrument(level = "debug", skip(tree))]
pub fn max_path_sum(tree: &BinaryTree) -> TreeResult<Sum> {
    let mut best = Sum::MIN;
    // Each subtree reports the best gain of a path that starts at its root and goes down.
    let gain = tree.fold_postorder(|_, node, left: Option<Sum>, right: Option<Sum>| {
        let left = left.unwrap_or(0).max(0);
        let right = right.unwrap_or(0).max(0);
        let value = Sum::from(node.value);
        best = best.max(value + left + right);
        value + left.max(right)
    });
    match gain {
        Some(_) => Ok(best),
        None => Err(DomainError::PreconditionViolated(
            "max path sum of an empty tree is undefined".to_string(),
        )),
    }
}

/// Number of edges on the longest path between any two nodes.
#[instrument(level = "debug", skip(tree))]
pub fn diameter(tree: &BinaryTree) -> usize {
    let mut longest = 0;
    tree.fold_postorder(|_, _, left: Option<usize>, right: Option<usize>| {
        let (left, right) = (left.unwrap_or(0), right.unwrap_or(0));
        longest = longest.max(left + right);
        1 + left.max(right)
    });
    longest
}

/// Root of the smallest subtree that contains every deepest node.
/// `None` for an empty tree.
#[instrument(level = "debug", skip(tree))]
pub fn subtree_with_all_deepest(tree: &BinaryTree) -> Option<NodeId> {
    // Per subtree: the current candidate and the depth of its deepest node.
    type Deepest = Option<(NodeId, usize)>;
    let result = tree.fold_postorder(|id, _, left: Deepest, right: Deepest| {
        match (left, right) {
            (None, None) => (id, 1),
            (Some((candidate, depth)), None) | (None, Some((candidate, depth))) => {
                (candidate, depth + 1)
            }
            (Some((lc, ld)), Some((rc, rd))) => {
                if ld == rd {
                    (id, ld + 1)
                } else if ld > rd {
                    (lc, ld + 1)
                } else {
                    (rc, rd + 1)
                }
            }
        }
    });
    debug!(?result, "deepest subtree");
    result.map(|(candidate, _)| candidate)
}

/// Lowest common ancestor of the deepest leaves.
///
/// Same answer as `subtree_with_all_deepest`; both names are kept.
pub fn lca_of_deepest_leaves(tree: &BinaryTree) -> Option<NodeId> {
    subtree_with_all_deepest(tree)
}
