//! Tree builder: reconstructs binary trees from serialized traversal data.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, instrument};

use crate::domain::arena::{BinaryTree, NodeId, Side, Value};
use crate::domain::error::{DomainError, TreeResult};

/// Constructs binary trees from traversal sequences or level-order literals.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    /// Upper bound on the number of nodes a single build may create
    max_nodes: Option<usize>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_nodes(max_nodes: Option<usize>) -> Self {
        Self { max_nodes }
    }

    /// Rebuild a tree from its preorder and inorder sequences.
    ///
    /// Values must be unique. Runs in O(n): a value-to-inorder-position
    /// lookup is built once and a single cursor advances through `preorder`
    /// while inorder ranges are split around each subtree root.
    #[instrument(level = "debug", skip(self, preorder, inorder), fields(n = preorder.len()))]
    pub fn from_traversals(&self, preorder: &[Value], inorder: &[Value]) -> TreeResult<BinaryTree> {
        if preorder.len() != inorder.len() {
            return Err(malformed(format!(
                "preorder has {} values, inorder has {}",
                preorder.len(),
                inorder.len()
            )));
        }
        self.check_size(preorder.len())?;

        let mut position: HashMap<Value, usize> = HashMap::with_capacity(inorder.len());
        for (i, &value) in inorder.iter().enumerate() {
            if position.insert(value, i).is_some() {
                return Err(malformed(format!("duplicate value {} in inorder", value)));
            }
        }

        let mut tree = BinaryTree::with_capacity(preorder.len());
        // Frames are half-open inorder ranges plus the slot the subtree hangs from.
        let mut stack: Vec<(usize, usize, Option<(NodeId, Side)>)> = vec![(0, inorder.len(), None)];
        let mut cursor = 0;

        while let Some((lo, hi, attach)) = stack.pop() {
            if lo >= hi {
                continue;
            }
            let value = *preorder
                .get(cursor)
                .ok_or_else(|| malformed("preorder exhausted before inorder".to_string()))?;
            cursor += 1;

            let split = *position.get(&value).ok_or_else(|| {
                malformed(format!("preorder value {} missing from inorder", value))
            })?;
            if split < lo || split >= hi {
                debug!(value, split, lo, hi, "preorder value outside current inorder range");
                return Err(malformed(format!(
                    "preorder value {} is inconsistent with inorder",
                    value
                )));
            }

            let id = tree.insert_node(value, attach)?;
            // Right pushed first: the whole left subtree consumes the cursor before it
            stack.push((split + 1, hi, Some((id, Side::Right))));
            stack.push((lo, split, Some((id, Side::Left))));
        }

        Ok(tree)
    }

    /// Build from level-order notation where `None` marks a missing child.
    ///
    /// `[Some(1), None, Some(2)]` is a root `1` with right child `2`. Trailing
    /// `None`s may be omitted.
    #[instrument(level = "debug", skip(self, values), fields(n = values.len()))]
    pub fn from_level_order(&self, values: &[Option<Value>]) -> TreeResult<BinaryTree> {
        let mut tree = BinaryTree::new();
        let mut entries = values.iter();

        let root_value = match entries.next() {
            None => return Ok(tree),
            Some(None) => {
                if values.iter().any(Option::is_some) {
                    return Err(malformed("missing root but children given".to_string()));
                }
                return Ok(tree);
            }
            Some(Some(v)) => *v,
        };
        self.check_size(values.iter().flatten().count())?;

        let root = tree.insert_node(root_value, None)?;
        let mut parents = VecDeque::from([root]);

        while let Some(parent) = parents.pop_front() {
            for side in [Side::Left, Side::Right] {
                match entries.next() {
                    None => return Ok(tree),
                    Some(None) => {}
                    Some(Some(v)) => {
                        let child = tree.insert_node(*v, Some((parent, side)))?;
                        parents.push_back(child);
                    }
                }
            }
        }

        if entries.any(Option::is_some) {
            return Err(malformed("values left over without a parent".to_string()));
        }
        Ok(tree)
    }

    fn check_size(&self, n: usize) -> TreeResult<()> {
        match self.max_nodes {
            Some(max) if n > max => Err(malformed(format!(
                "{} nodes exceed configured limit of {}",
                n, max
            ))),
            _ => Ok(()),
        }
    }
}

fn malformed(message: String) -> DomainError {
    DomainError::MalformedInput(message)
}
