//! Structural comparator: symmetry, balance, subtree matching, merge and mirroring.

use tracing::{debug, instrument};

use crate::domain::{BinaryTree, DomainError, NodeId, Side, TreeResult};

/// True iff the tree is a mirror image of itself around the root.
/// An empty tree is symmetric.
#[instrument(level = "debug", skip(tree))]
pub fn is_symmetric(tree: &BinaryTree) -> bool {
    let Some(root) = tree.root().and_then(|id| tree.get_node(id)) else {
        return true;
    };
    let mut pairs = vec![(root.left, root.right)];

    while let Some(pair) = pairs.pop() {
        match pair {
            (None, None) => {}
            (Some(a), Some(b)) => match (tree.get_node(a), tree.get_node(b)) {
                (Some(na), Some(nb)) if na.value == nb.value => {
                    pairs.push((na.left, nb.right));
                    pairs.push((na.right, nb.left));
                }
                _ => return false,
            },
            _ => return false,
        }
    }
    true
}

/// True iff every node's subtrees differ in height by at most one.
///
/// Stops at the first unbalanced node instead of finishing the height pass.
#[instrument(level = "debug", skip(tree))]
pub fn is_balanced(tree: &BinaryTree) -> bool {
    let mut heights: Vec<usize> = Vec::new();
    for (_, node) in tree.iter_postorder() {
        let right = node.right.and_then(|_| heights.pop()).unwrap_or(0);
        let left = node.left.and_then(|_| heights.pop()).unwrap_or(0);
        if left.abs_diff(right) > 1 {
            return false;
        }
        heights.push(1 + left.max(right));
    }
    true
}

/// Value and shape equality of two whole trees.
pub fn is_same_tree(a: &BinaryTree, b: &BinaryTree) -> bool {
    same_subtree(a, a.root(), b, b.root())
}

/// Value and shape equality of the subtree at `a_id` in `a` and the one at `b_id` in `b`.
pub fn same_subtree(
    a: &BinaryTree,
    a_id: Option<NodeId>,
    b: &BinaryTree,
    b_id: Option<NodeId>,
) -> bool {
    let mut pairs = vec![(a_id, b_id)];
    while let Some(pair) = pairs.pop() {
        match pair {
            (None, None) => {}
            (Some(x), Some(y)) => match (a.get_node(x), b.get_node(y)) {
                (Some(nx), Some(ny)) if nx.value == ny.value => {
                    pairs.push((nx.right, ny.right));
                    pairs.push((nx.left, ny.left));
                }
                _ => return false,
            },
            _ => return false,
        }
    }
    true
}

/// True iff some node of `tree` roots a subtree identical to `sub`.
/// An empty `sub` matches any tree, including an empty one.
#[instrument(level = "debug", skip(tree, sub), fields(nodes = tree.len(), sub_nodes = sub.len()))]
pub fn is_subtree(tree: &BinaryTree, sub: &BinaryTree) -> bool {
    let Some(sub_root) = sub.root() else {
        return true;
    };
    let Some(sub_value) = sub.value(sub_root) else {
        return true;
    };
    tree.iter()
        .filter(|(_, node)| node.value == sub_value)
        .any(|(id, _)| same_subtree(tree, Some(id), sub, Some(sub_root)))
}

/// Overlay two trees: overlapping positions sum their values, positions
/// present in only one input are taken over as they are.
///
/// Both inputs are consumed. The larger tree hosts the result and the other
/// tree's unmatched subtrees are moved into it. An overlapping sum that does
/// not fit the value type fails before either input is modified.
#[instrument(level = "debug", skip(a, b), fields(a_nodes = a.len(), b_nodes = b.len()))]
pub fn merge(a: BinaryTree, b: BinaryTree) -> TreeResult<BinaryTree> {
    let (mut host, mut guest) = if b.len() > a.len() { (b, a) } else { (a, b) };
    let (Some(host_root), Some(guest_root)) = (host.root(), guest.root()) else {
        return Ok(if host.is_empty() { guest } else { host });
    };

    // Read-only pass: collect overlapping positions and validate sums.
    let mut overlap = Vec::new();
    let mut stack = vec![(host_root, guest_root)];
    while let Some((h, g)) = stack.pop() {
        let hn = host.node(h)?;
        let gn = guest.node(g)?;
        hn.value.checked_add(gn.value).ok_or_else(|| {
            DomainError::MalformedInput(format!(
                "merged value {} + {} overflows",
                hn.value, gn.value
            ))
        })?;
        overlap.push((h, g));
        if let (Some(hl), Some(gl)) = (hn.left, gn.left) {
            stack.push((hl, gl));
        }
        if let (Some(hr), Some(gr)) = (hn.right, gn.right) {
            stack.push((hr, gr));
        }
    }

    let mut adopted = 0usize;
    for (h, g) in overlap {
        let (g_value, g_left, g_right) = match guest.get_node(g) {
            Some(n) => (n.value, n.left, n.right),
            None => continue,
        };
        let (h_left, h_right) = match host.get_node_mut(h) {
            Some(n) => {
                n.value += g_value;
                (n.left, n.right)
            }
            None => continue,
        };
        let slots = [(Side::Left, h_left, g_left), (Side::Right, h_right, g_right)];
        for (side, h_child, g_child) in slots {
            if let (None, Some(g_child)) = (h_child, g_child) {
                let moved = host.adopt_subtree(&mut guest, g_child);
                host.set_child(h, side, moved);
                adopted += 1;
            }
        }
    }
    host.touch();
    debug!(adopted, nodes = host.len(), "merged trees");
    Ok(host)
}

/// Invert the tree in place: every node swaps its left and right child.
#[instrument(level = "debug", skip(tree))]
pub fn mirror(tree: &mut BinaryTree) {
    tree.for_each_node_mut(|node| std::mem::swap(&mut node.left, &mut node.right));
}

pub fn mirrored(tree: &BinaryTree) -> BinaryTree {
    let mut copy = tree.clone();
    mirror(&mut copy);
    copy
}
