//! Text tree rendering via `termtree`

use termtree::Tree;

use crate::domain::entities::TreeNode;

/// Label of the synthetic root when rendering a whole forest.
pub const FOREST_LABEL: &str = "Academic Hierarchy";

pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl ToTermTree for TreeNode {
    fn to_term_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_term_tree()).collect();
        Tree::new(node_label(self)).with_leaves(leaves)
    }
}

impl ToTermTree for [TreeNode] {
    fn to_term_tree(&self) -> Tree<String> {
        if self.is_empty() {
            return Tree::new(format!("{} (empty)", FOREST_LABEL));
        }
        let leaves: Vec<_> = self.iter().map(|c| c.to_term_tree()).collect();
        Tree::new(FOREST_LABEL.to_string()).with_leaves(leaves)
    }
}

fn node_label(node: &TreeNode) -> String {
    format!("{} [{}] ({})", node.name, node.kind, node.id)
}
