use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::tree::{Position, Tree};

/// Structural bookkeeping for one template node.
#[derive(Debug)]
pub struct TemplateNode {
    /// Node label (category tag, part-of-speech tag, or word for terminals)
    pub label: String,
    /// Pre-order position in the template
    pub position: Position,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
    /// Offset of this node among its parent's children
    pub slot: usize,
    /// Number of nodes in the subtree rooted here, this node included
    pub subtree_len: usize,
}

/// Arena-based index over a template tree.
///
/// Built once per template. Maps every pre-order [`Position`] to its node so
/// that ancestry tests and child-slot paths are answered without touching the
/// tree itself, and without relying on node identity.
#[derive(Debug)]
pub struct TemplateArena {
    /// Arena storage for all template nodes
    arena: Arena<TemplateNode>,
    /// Index of the root node, None for empty arenas
    root: Option<Index>,
    /// Arena indices in pre-order; `order[p]` is the node at position `p`
    order: Vec<Index>,
}

impl Default for TemplateArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            order: Vec::new(),
        }
    }

    /// Index `tree` in pre-order.
    #[instrument(level = "trace", skip_all)]
    pub fn from_tree(tree: &Tree) -> Self {
        let mut index = Self::new();
        let mut stack: Vec<(&Tree, Option<Index>, usize)> = vec![(tree, None, 0)];

        while let Some((node, parent, slot)) = stack.pop() {
            let idx = index.insert_node(node.label().to_string(), parent, slot);
            // Push children in reverse order for left-to-right traversal
            for (child_slot, child) in node.children().iter().enumerate().rev() {
                stack.push((child, Some(idx), child_slot));
            }
        }

        // Children always follow their parent in pre-order
        for &idx in index.order.iter().rev() {
            let len = 1 + index.arena[idx]
                .children
                .iter()
                .map(|&child| index.arena[child].subtree_len)
                .sum::<usize>();
            index.arena[idx].subtree_len = len;
        }

        index
    }

    fn insert_node(&mut self, label: String, parent: Option<Index>, slot: usize) -> Index {
        let node = TemplateNode {
            label,
            position: Position(self.order.len()),
            parent,
            children: Vec::new(),
            slot,
            subtree_len: 1,
        };
        let node_idx = self.arena.insert(node);
        self.order.push(node_idx);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&TemplateNode> {
        self.arena.get(idx)
    }

    pub fn node_at(&self, position: Position) -> Option<&TemplateNode> {
        self.order
            .get(position.index())
            .and_then(|&idx| self.arena.get(idx))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> {
        (0..self.order.len()).map(Position)
    }

    /// True if `ancestor` lies strictly above `descendant`.
    ///
    /// A subtree occupies a contiguous pre-order range starting at its root.
    pub fn is_ancestor(&self, ancestor: Position, descendant: Position) -> bool {
        match self.node_at(ancestor) {
            Some(node) => {
                ancestor < descendant && descendant.index() < ancestor.index() + node.subtree_len
            }
            None => false,
        }
    }

    /// True if one of the two positions is an ancestor of the other.
    pub fn are_related(&self, a: Position, b: Position) -> bool {
        self.is_ancestor(a, b) || self.is_ancestor(b, a)
    }

    pub fn parent_position(&self, position: Position) -> Option<Position> {
        self.node_at(position)
            .and_then(|node| node.parent)
            .and_then(|idx| self.arena.get(idx))
            .map(|parent| parent.position)
    }

    /// Child offsets leading from the root to `position`; empty for the root.
    pub fn path_to(&self, position: Position) -> Option<Vec<usize>> {
        let mut node = self.node_at(position)?;
        let mut path = Vec::new();
        while let Some(parent_idx) = node.parent {
            path.push(node.slot);
            node = self.arena.get(parent_idx)?;
        }
        path.reverse();
        Some(path)
    }

    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &TemplateNode)> {
        self.order
            .iter()
            .filter_map(|&idx| self.arena.get(idx).map(|node| (idx, node)))
    }
}
