//! Ancestor and distance engine: LCA queries and distance-K neighbours.
//!
//! All comparisons here are by node identity, never by value.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::{BinaryTree, DomainError, NodeId, ParentIndex, TreeResult, Value};

/// Lowest common ancestor of `p` and `q` (a node is its own ancestor).
#[instrument(level = "debug", skip(tree))]
pub fn lowest_common_ancestor(tree: &BinaryTree, p: NodeId, q: NodeId) -> TreeResult<NodeId> {
    let need = if p == q { 1 } else { 2 };

    // Per subtree: the node reported upward (a target or the answer) and how many targets it holds.
    let result = tree.fold_postorder(
        |id, _, left: Option<(Option<NodeId>, u8)>, right: Option<(Option<NodeId>, u8)>| {
            let (l, l_hits) = left.unwrap_or((None, 0));
            let (r, r_hits) = right.unwrap_or((None, 0));
            let own = u8::from(id == p) + u8::from(id == q && p != q);
            let hits = l_hits + r_hits + own;
            let reported = if own > 0 {
                Some(id)
            } else {
                match (l, r) {
                    (Some(_), Some(_)) => Some(id),
                    (found, None) | (None, found) => found,
                }
            };
            (reported, hits)
        },
    );

    match result {
        Some((Some(lca), hits)) if hits == need => Ok(lca),
        _ => Err(DomainError::PreconditionViolated(format!(
            "nodes {} and {} are not both part of this tree",
            p, q
        ))),
    }
}

/// Lowest common ancestor of all `targets` (duplicates ignored).
///
/// Counts targets per subtree bottom-up; the first node whose count reaches
/// the number of targets is the answer and the walk stops there.
#[instrument(level = "debug", skip(tree, targets), fields(k = targets.len()))]
pub fn lowest_common_ancestor_of(tree: &BinaryTree, targets: &[NodeId]) -> TreeResult<NodeId> {
    let wanted: HashSet<NodeId> = targets.iter().copied().collect();
    if wanted.is_empty() {
        return Err(DomainError::PreconditionViolated(
            "lowest common ancestor needs at least one target".to_string(),
        ));
    }

    let mut counts: Vec<usize> = Vec::new();
    for (id, node) in tree.iter_postorder() {
        let right = node.right.and_then(|_| counts.pop()).unwrap_or(0);
        let left = node.left.and_then(|_| counts.pop()).unwrap_or(0);
        let total = left + right + usize::from(wanted.contains(&id));
        if total == wanted.len() {
            return Ok(id);
        }
        counts.push(total);
    }

    debug!(wanted = wanted.len(), "not all targets found");
    Err(DomainError::PreconditionViolated(
        "not all target nodes are part of this tree".to_string(),
    ))
}

/// Values of all nodes exactly `k` edges away from `target`, in BFS order.
///
/// Builds a fresh parent index; use `nodes_at_distance_k_with` to reuse one.
#[instrument(level = "debug", skip(tree))]
pub fn nodes_at_distance_k(tree: &BinaryTree, target: NodeId, k: usize) -> TreeResult<Vec<Value>> {
    let index = ParentIndex::build(tree);
    nodes_at_distance_k_with(&index, tree, target, k)
}

/// Like `nodes_at_distance_k`, with a cached parent index for `tree`.
///
/// The tree is walked as an undirected graph (left, right, parent). A `k`
/// beyond the farthest node yields an empty result.
#[instrument(level = "debug", skip(index, tree))]
pub fn nodes_at_distance_k_with(
    index: &ParentIndex,
    tree: &BinaryTree,
    target: NodeId,
    k: usize,
) -> TreeResult<Vec<Value>> {
    index.ensure_current(tree)?;
    tree.node(target)?;

    let mut visited: HashSet<NodeId> = HashSet::from([target]);
    let mut frontier = vec![target];

    for _ in 0..k {
        let mut next = Vec::new();
        for id in frontier {
            let Some(node) = tree.get_node(id) else {
                continue;
            };
            for neighbour in [node.left, node.right, index.parent(id)].into_iter().flatten() {
                if visited.insert(neighbour) {
                    next.push(neighbour);
                }
            }
        }
        if next.is_empty() {
            return Ok(Vec::new());
        }
        frontier = next;
    }

    Ok(frontier.into_iter().filter_map(|id| tree.value(id)).collect())
}
