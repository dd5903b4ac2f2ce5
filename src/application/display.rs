use termtree::Tree;
use tracing::instrument;

use crate::config::RenderSettings;
use crate::domain::BinaryTree;

/// Render a tree as a `termtree::Tree` for terminal output.
pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_string_with(&RenderSettings::default())
    }

    fn to_tree_string_with(&self, settings: &RenderSettings) -> Tree<String>;
}

impl TreeDisplay for BinaryTree {
    // A lone child is printed next to a placeholder so left and right stay distinguishable.
    #[instrument(level = "debug", skip(self, settings))]
    fn to_tree_string_with(&self, settings: &RenderSettings) -> Tree<String> {
        let placeholder = || Tree::new(settings.missing_child.clone());
        self.fold_postorder(|_, node, left: Option<Tree<String>>, right: Option<Tree<String>>| {
            let leaves = match (left, right) {
                (None, None) => vec![],
                (Some(l), None) => vec![l, placeholder()],
                (None, Some(r)) => vec![placeholder(), r],
                (Some(l), Some(r)) => vec![l, r],
            };
            Tree::new(node.value.to_string()).with_leaves(leaves)
        })
        .unwrap_or_else(|| Tree::new(settings.empty_tree.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeBuilder;

    #[test]
    fn test_render_marks_missing_sibling() {
        let tree = TreeBuilder::new()
            .from_level_order(&[Some(1), None, Some(2)])
            .unwrap();
        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1");
        assert!(lines[1].ends_with('·'));
        assert!(lines[2].ends_with('2'));
    }

    #[test]
    fn test_render_empty_tree_uses_label() {
        let settings = RenderSettings {
            missing_child: "-".into(),
            empty_tree: "nothing".into(),
        };
        assert_eq!(
            BinaryTree::new().to_tree_string_with(&settings).to_string().trim_end(),
            "nothing"
        );
    }
}
