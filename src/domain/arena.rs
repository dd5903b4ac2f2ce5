use generational_arena::{Arena, Index};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{instrument, trace};

use crate::domain::error::{DomainError, TreeResult};

/// Payload stored in every node.
pub type Value = i32;

/// Accumulator width for sums over node values.
pub type Sum = i64;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

fn next_instance() -> u64 {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

/// Identity of a node inside the tree that issued it.
///
/// Two nodes with equal values are still distinct ids. An id is only
/// meaningful for the `BinaryTree` it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}g{}", slot, generation)
    }
}

/// Child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Tree node in the arena-based binary tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub value: Value,
    /// Index of the left child in the arena
    pub left: Option<NodeId>,
    /// Index of the right child in the arena
    pub right: Option<NodeId>,
}

impl TreeNode {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn child_slot_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Arena-based binary tree.
///
/// Nodes own their children exclusively through arena indices; there are no
/// back-edges. Parent links needed by distance queries are derived on demand
/// (see `ParentIndex`). Every structural mutation bumps `revision`, which is
/// how cached derived data detects that it went stale. Each tree also has a
/// process-unique `instance` id; a clone counts as a different tree.
#[derive(Debug)]
pub struct BinaryTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<NodeId>,
    revision: u64,
    instance: u64,
}

impl Clone for BinaryTree {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            root: self.root,
            revision: self.revision,
            instance: next_instance(),
        }
    }
}

impl Default for BinaryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            revision: 0,
            instance: next_instance(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
            revision: 0,
            instance: next_instance(),
        }
    }

    /// Inserts a node as the root (`parent == None`) or into a free child slot.
    ///
    /// Fails with `MalformedInput` when a root already exists, the parent is
    /// unknown, or the requested slot is occupied.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(
        &mut self,
        value: Value,
        parent: Option<(NodeId, Side)>,
    ) -> TreeResult<NodeId> {
        match parent {
            None => {
                if self.root.is_some() {
                    return Err(DomainError::MalformedInput(
                        "tree already has a root".to_string(),
                    ));
                }
                let id = NodeId(self.arena.insert(TreeNode::new(value)));
                self.root = Some(id);
                self.touch();
                Ok(id)
            }
            Some((parent_id, side)) => {
                match self.arena.get(parent_id.0) {
                    None => {
                        return Err(DomainError::MalformedInput(format!(
                            "parent {} is not part of this tree",
                            parent_id
                        )))
                    }
                    Some(p) if p.child(side).is_some() => {
                        return Err(DomainError::MalformedInput(format!(
                            "{:?} child of {} is already set",
                            side, parent_id
                        )))
                    }
                    Some(_) => {}
                }
                let id = NodeId(self.arena.insert(TreeNode::new(value)));
                self.set_child(parent_id, side, Some(id));
                self.touch();
                Ok(id)
            }
        }
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id.0)
    }

    /// Like `get_node`, but a missing id is a `PreconditionViolated` error.
    pub fn node(&self, id: NodeId) -> TreeResult<&TreeNode> {
        self.get_node(id).ok_or_else(|| {
            DomainError::PreconditionViolated(format!("node {} is not part of this tree", id))
        })
    }

    pub fn value(&self, id: NodeId) -> Option<Value> {
        self.get_node(id).map(|n| n.value)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Mutation counter; changes whenever the structure or a value changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Process-unique id of this tree value.
    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, self.root)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, self.root)
    }

    pub fn iter_inorder(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self, self.root)
    }

    /// Iterates the subtree rooted at `start` in preorder.
    pub fn iter_from(&self, start: NodeId) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, Some(start))
    }

    /// Bottom-up fold over the whole tree.
    ///
    /// `f` receives each node together with the folded results of its left
    /// and right subtree (`None` for a missing child). Runs on an explicit
    /// stack, so tree height is not limited by the call stack.
    pub fn fold_postorder<T, F>(&self, f: F) -> Option<T>
    where
        F: FnMut(NodeId, &TreeNode, Option<T>, Option<T>) -> T,
    {
        self.fold_subtree(self.root, f)
    }

    /// Bottom-up fold over the subtree rooted at `start`.
    pub fn fold_subtree<T, F>(&self, start: Option<NodeId>, mut f: F) -> Option<T>
    where
        F: FnMut(NodeId, &TreeNode, Option<T>, Option<T>) -> T,
    {
        // Postorder emits the whole left subtree, then the whole right
        // subtree, then the node: child results sit on top of the stack.
        let mut results: Vec<T> = Vec::new();
        for (id, node) in PostOrderIterator::new(self, start) {
            let right = node.right.and_then(|_| results.pop());
            let left = node.left.and_then(|_| results.pop());
            results.push(f(id, node, left, right));
        }
        results.pop()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.fold_postorder(|_, _, left: Option<usize>, right: Option<usize>| {
            1 + left.unwrap_or(0).max(right.unwrap_or(0))
        })
        .unwrap_or(0)
    }

    /// Collects all leaf nodes (nodes with no children), left to right.
    ///
    /// Empty trees return an empty vector.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    pub(crate) fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.arena.get_mut(id.0)
    }

    pub(crate) fn set_child(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        if let Some(p) = self.arena.get_mut(parent.0) {
            *p.child_slot_mut(side) = child;
        }
    }

    /// Applies `f` to every node; counts as one mutation.
    pub(crate) fn for_each_node_mut<F: FnMut(&mut TreeNode)>(&mut self, mut f: F) {
        for (_, node) in self.arena.iter_mut() {
            f(node);
        }
        self.touch();
    }

    /// Points `slot` (a parent's child slot, or the root when `None`) at `child`.
    pub(crate) fn relink(&mut self, slot: Option<(NodeId, Side)>, child: Option<NodeId>) {
        match slot {
            Some((parent, side)) => self.set_child(parent, side, child),
            None => self.root = child,
        }
    }

    /// Drops a node from the arena. Links pointing at it must already be gone.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> Option<TreeNode> {
        self.arena.remove(id.0)
    }

    pub(crate) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Moves the subtree rooted at `donor_root` out of `donor` into this arena.
    ///
    /// Node payloads are transferred, not copied; the donor loses them. The
    /// returned id is detached: the caller links it into place.
    pub(crate) fn adopt_subtree(
        &mut self,
        donor: &mut BinaryTree,
        donor_root: NodeId,
    ) -> Option<NodeId> {
        let mut adopted_root = None;
        let mut stack: Vec<(NodeId, Option<(NodeId, Side)>)> = vec![(donor_root, None)];

        while let Some((donor_id, attach)) = stack.pop() {
            let Some(node) = donor.arena.remove(donor_id.0) else {
                continue;
            };
            let id = NodeId(self.arena.insert(TreeNode::new(node.value)));
            match attach {
                Some((parent, side)) => self.set_child(parent, side, Some(id)),
                None => adopted_root = Some(id),
            }
            if let Some(right) = node.right {
                stack.push((right, Some((id, Side::Right))));
            }
            if let Some(left) = node.left {
                stack.push((left, Some((id, Side::Left))));
            }
        }

        if donor.root == Some(donor_root) {
            donor.root = None;
        }
        donor.touch();
        self.touch();
        trace!(?adopted_root, "adopted subtree");
        adopted_root
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a BinaryTree,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a BinaryTree, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current) {
                // Right first so that left is popped first
                self.stack.extend(node.right);
                self.stack.extend(node.left);
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a BinaryTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a BinaryTree, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: start.map(|id| (id, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                if let Some(right) = node.right {
                    self.stack.push((right, false));
                }
                if let Some(left) = node.left {
                    self.stack.push((left, false));
                }
            }
        }
        None
    }
}

pub struct InOrderIterator<'a> {
    tree: &'a BinaryTree,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<'a> InOrderIterator<'a> {
    fn new(tree: &'a BinaryTree, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            current: start,
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        // Walk down the left spine, then emit and step right
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree.get_node(id).and_then(|n| n.left);
        }
        let id = self.stack.pop()?;
        let node = self.tree.get_node(id)?;
        self.current = node.right;
        Some((id, node))
    }
}
