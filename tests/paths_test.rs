//! Tests for path sums, diameter and deepest-node queries

use rstest::{fixture, rstest};

use treekit::application::{
    count_paths_with_sum, diameter, has_path_sum, insert_into_bst, lca_of_deepest_leaves,
    lowest_common_ancestor_of, max_path_sum, subtree_with_all_deepest,
};
use treekit::domain::{BinaryTree, DomainError, NodeId, TreeBuilder, Value};
use treekit::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn tree(values: &[Option<Value>]) -> BinaryTree {
    TreeBuilder::new().from_level_order(values).unwrap()
}

#[fixture]
fn path_sum_tree() -> BinaryTree {
    tree(&[
        Some(5),
        Some(4),
        Some(8),
        Some(11),
        None,
        Some(13),
        Some(4),
        Some(7),
        Some(2),
        None,
        None,
        None,
        Some(1),
    ])
}

#[fixture]
fn path_count_tree() -> BinaryTree {
    tree(&[
        Some(10),
        Some(5),
        Some(-3),
        Some(3),
        Some(2),
        None,
        Some(11),
        Some(3),
        Some(-2),
        None,
        Some(1),
    ])
}

// ============================================================
// Root-to-Leaf Path Sum Tests
// ============================================================

#[rstest]
#[case(22, true)] // 5 -> 4 -> 11 -> 2
#[case(26, true)] // 5 -> 8 -> 13
#[case(18, true)] // 5 -> 8 -> 4 -> 1
#[case(9, false)] // 5 -> 4 stops at an inner node
#[case(0, false)]
fn given_path_sum_tree_when_testing_target_then_only_leaf_paths_count(
    path_sum_tree: BinaryTree,
    #[case] target: i64,
    #[case] expected: bool,
) {
    assert_eq!(has_path_sum(&path_sum_tree, target), expected);
}

#[test]
fn given_empty_tree_when_testing_path_sum_then_false() {
    assert!(!has_path_sum(&BinaryTree::new(), 0));
}

// ============================================================
// Downward Path Count Tests
// ============================================================

#[rstest]
fn given_path_count_tree_when_counting_eight_then_three(path_count_tree: BinaryTree) {
    // 5 -> 3, 5 -> 2 -> 1, -3 -> 11
    assert_eq!(count_paths_with_sum(&path_count_tree, 8), 3);
}

#[rstest]
#[case(5, 1)]
#[case(-5, 0)]
#[case(0, 0)]
fn given_single_node_when_counting_then_one_iff_value_matches(
    #[case] target: i64,
    #[case] expected: u64,
) {
    assert_eq!(count_paths_with_sum(&tree(&[Some(5)]), target), expected);
}

#[test]
fn given_zero_values_when_counting_zero_then_every_downward_path_counts() {
    // Chain 0 -> 0 -> 0 has 3 + 2 + 1 downward paths
    let chain = tree(&[Some(0), Some(0), None, Some(0)]);
    assert_eq!(count_paths_with_sum(&chain, 0), 6);
}

#[test]
fn given_extreme_values_when_counting_then_no_overflow() {
    let chain = tree(&[Some(i32::MAX), Some(i32::MAX), None, Some(i32::MAX)]);
    assert_eq!(count_paths_with_sum(&chain, 3 * i64::from(i32::MAX)), 1);
    assert_eq!(count_paths_with_sum(&chain, i64::MIN), 0);
}

// ============================================================
// Maximum Path Sum Tests
// ============================================================

#[rstest]
#[case(&[Some(1), Some(2), Some(3)], 6)]
#[case(&[Some(-10), Some(9), Some(20), None, None, Some(15), Some(7)], 42)]
#[case(&[Some(-3)], -3)]
#[case(&[Some(-2), Some(-1)], -1)]
#[case(&[Some(2), Some(-1), Some(-2)], 2)]
fn given_tree_when_max_path_sum_then_best_route(
    #[case] values: &[Option<Value>],
    #[case] expected: i64,
) {
    assert_eq!(max_path_sum(&tree(values)), Ok(expected));
}

#[test]
fn given_empty_tree_when_max_path_sum_then_precondition_violated() {
    assert!(matches!(
        max_path_sum(&BinaryTree::new()),
        Err(DomainError::PreconditionViolated(_))
    ));
}

// ============================================================
// Diameter Tests
// ============================================================

#[test]
fn given_concrete_scenario_when_measuring_then_diameter_three() {
    let tree = TreeBuilder::new()
        .from_traversals(&[3, 9, 20, 15, 7], &[9, 3, 15, 20, 7])
        .unwrap();
    assert_eq!(diameter(&tree), 3);
}

#[test]
fn given_diameter_off_root_when_measuring_then_found() {
    // Longest path runs through node 2, not the root
    let tree = tree(&[
        Some(1),
        Some(2),
        None,
        Some(3),
        Some(4),
        Some(5),
        None,
        None,
        Some(6),
        Some(7),
        None,
        None,
        Some(8),
    ]);
    assert_eq!(diameter(&tree), 6);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(31)]
#[case(200)]
fn given_various_shapes_when_measuring_then_bounded_by_twice_depth(#[case] seed: u64) {
    let mut tree = BinaryTree::new();
    let mut state = seed;
    for _ in 0..64 {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let _ = insert_into_bst(&mut tree, (state >> 40) as Value);
    }
    assert!(diameter(&tree) <= 2 * tree.depth());
}

#[test]
fn given_single_node_when_measuring_then_zero() {
    assert_eq!(diameter(&tree(&[Some(1)])), 0);
}

// ============================================================
// Deepest Nodes Tests
// ============================================================

fn value_of(tree: &BinaryTree, id: Option<NodeId>) -> Option<Value> {
    id.and_then(|id| tree.value(id))
}

#[rstest]
#[case(
    &[Some(3), Some(5), Some(1), Some(6), Some(2), Some(0), Some(8), None, None, Some(7), Some(4)],
    2
)]
#[case(&[Some(1)], 1)]
#[case(&[Some(0), Some(1), Some(3), None, Some(2)], 2)]
#[case(&[Some(1), Some(2), Some(3)], 1)]
fn given_tree_when_locating_deepest_subtree_then_both_entry_points_agree(
    #[case] values: &[Option<Value>],
    #[case] expected: Value,
) {
    let tree = tree(values);
    assert_eq!(value_of(&tree, subtree_with_all_deepest(&tree)), Some(expected));
    assert_eq!(lca_of_deepest_leaves(&tree), subtree_with_all_deepest(&tree));
}

#[rstest]
fn given_tree_when_locating_deepest_subtree_then_equals_lca_of_deepest_leaves(
    path_count_tree: BinaryTree,
) {
    let depth = path_count_tree.depth();
    let deepest: Vec<NodeId> = path_count_tree
        .leaves()
        .into_iter()
        .filter(|&leaf| depth_of(&path_count_tree, leaf) == depth)
        .collect();

    let expected = lowest_common_ancestor_of(&path_count_tree, &deepest).unwrap();
    assert_eq!(subtree_with_all_deepest(&path_count_tree), Some(expected));
}

fn depth_of(tree: &BinaryTree, target: NodeId) -> usize {
    let mut stack = vec![(tree.root().unwrap(), 1)];
    while let Some((id, depth)) = stack.pop() {
        if id == target {
            return depth;
        }
        let node = tree.get_node(id).unwrap();
        for child in [node.left, node.right].into_iter().flatten() {
            stack.push((child, depth + 1));
        }
    }
    0
}

#[test]
fn given_empty_tree_when_locating_deepest_subtree_then_none() {
    assert_eq!(subtree_with_all_deepest(&BinaryTree::new()), None);
}
