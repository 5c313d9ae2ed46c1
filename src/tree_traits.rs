/*
Rendering lives outside the domain types, so it is provided through a trait
implemented for them here (E0116: no inherent impls on foreign types).
 */
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{SubstitutionBank, TemplateArena};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

// Each node shows its label and pre-order position: `NP [7]`
impl TreeNodeConvert for TemplateArena {
    #[instrument(level = "trace", skip_all)]
    fn to_tree_string(&self) -> Tree<String> {
        fn label(arena: &TemplateArena, idx: Index) -> String {
            arena
                .get_node(idx)
                .map(|node| format!("{} [{}]", node.label, node.position))
                .unwrap_or_default()
        }

        fn build_tree(arena: &TemplateArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    let mut child_tree = Tree::new(label(arena, child_idx));
                    build_tree(arena, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        match self.root() {
            Some(root_idx) => {
                let mut tree = Tree::new(label(self, root_idx));
                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

// Keys with candidate counts, candidates as leaves
impl TreeNodeConvert for SubstitutionBank {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves = self.iter().map(|(key, candidates)| {
            Tree::new(format!("{} ({})", key, candidates.len()))
                .with_leaves(candidates.iter().map(|c| c.to_string()))
        });
        Tree::new(format!("bank: {} candidates", self.len())).with_leaves(leaves)
    }
}
