//! A template tree paired with its positional index.

use crate::domain::arena::TemplateArena;
use crate::domain::tree::{Position, Tree};

/// The tree used as substitution target, indexed by pre-order position.
///
/// The tree is never mutated; every variant is built from a fresh copy.
#[derive(Debug)]
pub struct Template {
    tree: Tree,
    arena: TemplateArena,
}

impl Template {
    pub fn new(tree: Tree) -> Self {
        let arena = TemplateArena::from_tree(&tree);
        Self { tree, arena }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn arena(&self) -> &TemplateArena {
        &self.arena
    }

    /// Number of positions (nodes, terminals included).
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Template nodes paired with their positions, in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = (Position, &Tree)> {
        self.tree
            .pre_order()
            .enumerate()
            .map(|(i, node)| (Position(i), node))
    }

    pub fn node_at(&self, position: Position) -> Option<&Tree> {
        let path = self.arena.path_to(position)?;
        path.iter()
            .try_fold(&self.tree, |node, &slot| node.children().get(slot))
    }
}

impl From<Tree> for Template {
    fn from(tree: Tree) -> Self {
        Self::new(tree)
    }
}
