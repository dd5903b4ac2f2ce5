//! Traversal engine: breadth-first level views and depth-first serializations.

use std::collections::VecDeque;

use tracing::instrument;

use crate::domain::{BinaryTree, NodeId, Value};

/// Lazy breadth-first iterator yielding one `Vec` of values per level,
/// top to bottom, left to right within a level.
pub struct LevelOrder<'a> {
    tree: &'a BinaryTree,
    frontier: Vec<NodeId>,
}

impl<'a> LevelOrder<'a> {
    pub fn new(tree: &'a BinaryTree) -> Self {
        Self {
            tree,
            frontier: tree.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for LevelOrder<'a> {
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frontier.is_empty() {
            return None;
        }
        let mut level = Vec::with_capacity(self.frontier.len());
        let mut next = Vec::with_capacity(self.frontier.len() * 2);
        for id in self.frontier.drain(..) {
            if let Some(node) = self.tree.get_node(id) {
                level.push(node.value);
                next.extend(node.left);
                next.extend(node.right);
            }
        }
        self.frontier = next;
        Some(level)
    }
}

pub fn level_order(tree: &BinaryTree) -> LevelOrder<'_> {
    LevelOrder::new(tree)
}

/// Level order with every odd level (1, 3, 5, ...) reversed.
#[instrument(level = "debug", skip(tree))]
pub fn zigzag_level_order(tree: &BinaryTree) -> Vec<Vec<Value>> {
    level_order(tree)
        .enumerate()
        .map(|(depth, mut level)| {
            if depth % 2 == 1 {
                level.reverse();
            }
            level
        })
        .collect()
}

/// Last node visited on each level, i.e. what is visible from the right.
#[instrument(level = "debug", skip(tree))]
pub fn right_side_view(tree: &BinaryTree) -> Vec<Value> {
    level_order(tree)
        .filter_map(|level| level.last().copied())
        .collect()
}

pub fn preorder_values(tree: &BinaryTree) -> Vec<Value> {
    tree.iter().map(|(_, node)| node.value).collect()
}

pub fn inorder_values(tree: &BinaryTree) -> Vec<Value> {
    tree.iter_inorder().map(|(_, node)| node.value).collect()
}

pub fn postorder_values(tree: &BinaryTree) -> Vec<Value> {
    tree.iter_postorder().map(|(_, node)| node.value).collect()
}

/// Serialize to level-order notation (`None` = missing child), trailing
/// `None`s trimmed. Inverse of `TreeBuilder::from_level_order`.
#[instrument(level = "debug", skip(tree))]
pub fn to_level_order(tree: &BinaryTree) -> Vec<Option<Value>> {
    let mut out = Vec::with_capacity(tree.len() * 2 + 1);
    let mut queue: VecDeque<Option<NodeId>> = VecDeque::from([tree.root()]);

    while let Some(slot) = queue.pop_front() {
        match slot.and_then(|id| tree.get_node(id)) {
            Some(node) => {
                out.push(Some(node.value));
                queue.push_back(node.left);
                queue.push_back(node.right);
            }
            None => out.push(None),
        }
    }

    while matches!(out.last(), Some(None)) {
        out.pop();
    }
    out
}
