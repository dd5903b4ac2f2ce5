//! Application layer: query and transformation engines over built trees
//!
//! Every operation is a pure function of its input tree(s), except `merge`
//! (consumes both inputs), `mirror`, `insert_into_bst` and `delete_from_bst`
//! (mutate in place).

pub mod ancestry;
pub mod bst;
pub mod display;
pub mod error;
pub mod paths;
pub mod structure;
pub mod traversal;

pub use ancestry::{
    lowest_common_ancestor, lowest_common_ancestor_of, nodes_at_distance_k,
    nodes_at_distance_k_with,
};
pub use bst::{
    bst_lowest_common_ancestor, delete_from_bst, insert_into_bst, is_valid_bst, kth_smallest,
    range_sum_bst, search_bst,
};
pub use display::TreeDisplay;
pub use error::{ApplicationError, ApplicationResult};
pub use paths::{
    count_paths_with_sum, diameter, has_path_sum, lca_of_deepest_leaves, max_path_sum,
    subtree_with_all_deepest,
};
pub use structure::{
    is_balanced, is_same_tree, is_subtree, is_symmetric, merge, mirror, mirrored, same_subtree,
};
pub use traversal::{
    inorder_values, level_order, postorder_values, preorder_values, right_side_view, to_level_order,
    zigzag_level_order, LevelOrder,
};
