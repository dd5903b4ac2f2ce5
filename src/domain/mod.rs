//! Domain layer: node store, tree construction and errors
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod parents;

pub use arena::{
    BinaryTree, InOrderIterator, NodeId, PostOrderIterator, PreOrderIterator, Side, Sum, TreeNode,
    Value,
};
pub use builder::TreeBuilder;
pub use error::{DomainError, TreeResult};
pub use parents::ParentIndex;
