//! Binary tree analysis toolkit.
//!
//! Build a tree from preorder + inorder sequences (or level-order literals)
//! and run structural, path and ancestor queries against it:
//!
//! ```
//! use treekit::domain::TreeBuilder;
//! use treekit::application::{diameter, level_order};
//!
//! let tree = TreeBuilder::new()
//!     .from_traversals(&[3, 9, 20, 15, 7], &[9, 3, 15, 20, 7])
//!     .unwrap();
//! assert_eq!(tree.depth(), 3);
//! assert_eq!(diameter(&tree), 3);
//! assert_eq!(level_order(&tree).collect::<Vec<_>>(), vec![vec![3], vec![9, 20], vec![15, 7]]);
//! ```
//!
//! All operations run on explicit stacks or queues, so deep (skewed) trees
//! do not exhaust the call stack. Read-only queries may run concurrently on
//! a shared `&BinaryTree`; mutations take `&mut` or ownership.

pub mod application;
pub mod config;
pub mod domain;
pub mod util;

pub use application::{ApplicationError, ApplicationResult};
pub use domain::{BinaryTree, DomainError, NodeId, Side, Sum, TreeBuilder, TreeResult, Value};
