//! Derived, non-owning parent links.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::arena::{BinaryTree, NodeId};
use crate::domain::error::{DomainError, TreeResult};

/// Child-to-parent map built from one full traversal.
///
/// Metadata only: it is not part of tree identity and is tied to the tree
/// instance and revision it was built from.
#[derive(Debug, Clone)]
pub struct ParentIndex {
    parents: HashMap<NodeId, NodeId>,
    instance: u64,
    revision: u64,
}

impl ParentIndex {
    #[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
    pub fn build(tree: &BinaryTree) -> Self {
        let mut parents = HashMap::with_capacity(tree.len());
        for (id, node) in tree.iter() {
            for child in [node.left, node.right].into_iter().flatten() {
                parents.insert(child, id);
            }
        }
        Self {
            parents,
            instance: tree.instance(),
            revision: tree.revision(),
        }
    }

    /// Parent of `id`; `None` for the root or unknown ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    pub fn is_current(&self, tree: &BinaryTree) -> bool {
        self.instance == tree.instance() && self.revision == tree.revision()
    }

    /// Fails when `tree` is not the tree this index was built from, or was
    /// mutated after the build.
    pub fn ensure_current(&self, tree: &BinaryTree) -> TreeResult<()> {
        if self.instance != tree.instance() {
            debug!(built_for = self.instance, got = tree.instance(), "foreign parent index");
            return Err(DomainError::PreconditionViolated(
                "parent index was built for a different tree".to_string(),
            ));
        }
        if self.revision != tree.revision() {
            debug!(built = self.revision, now = tree.revision(), "stale parent index");
            return Err(DomainError::PreconditionViolated(
                "parent index is stale: tree was mutated after it was built".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::Side;

    #[test]
    fn test_parent_links_and_staleness() {
        let mut tree = BinaryTree::new();
        let root = tree.insert_node(1, None).unwrap();
        let left = tree.insert_node(2, Some((root, Side::Left))).unwrap();

        let index = ParentIndex::build(&tree);
        assert_eq!(index.parent(left), Some(root));
        assert_eq!(index.parent(root), None);
        assert!(index.ensure_current(&tree).is_ok());

        tree.insert_node(3, Some((root, Side::Right))).unwrap();
        assert!(matches!(
            index.ensure_current(&tree),
            Err(DomainError::PreconditionViolated(_))
        ));
    }

    #[test]
    fn test_index_is_bound_to_one_tree() {
        let mut a = BinaryTree::new();
        a.insert_node(1, None).unwrap();
        let mut b = BinaryTree::new();
        b.insert_node(1, None).unwrap();
        assert_eq!(a.revision(), b.revision());

        let index = ParentIndex::build(&a);
        assert!(index.is_current(&a));
        assert!(!index.is_current(&b));
        assert!(!index.is_current(&a.clone()));
        assert!(index.ensure_current(&b).is_err());
    }
}
