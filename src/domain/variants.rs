//! Deduplicated collection of generated variants.

use std::collections::BTreeSet;

use crate::domain::tree::Tree;

/// Set of trees under structural equality, iterated in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSet {
    trees: BTreeSet<Tree>,
}

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if an equal tree was already present.
    pub fn insert(&mut self, tree: Tree) -> bool {
        self.trees.insert(tree)
    }

    pub fn contains(&self, tree: &Tree) -> bool {
        self.trees.contains(tree)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Distinct yields, in tree order.
    pub fn sentences(&self) -> Vec<String> {
        self.trees.iter().map(Tree::sentence).collect()
    }

    pub fn into_vec(self) -> Vec<Tree> {
        self.trees.into_iter().collect()
    }
}

impl Extend<Tree> for VariantSet {
    fn extend<I: IntoIterator<Item = Tree>>(&mut self, iter: I) {
        self.trees.extend(iter);
    }
}

impl FromIterator<Tree> for VariantSet {
    fn from_iter<I: IntoIterator<Item = Tree>>(iter: I) -> Self {
        Self {
            trees: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for VariantSet {
    type Item = Tree;
    type IntoIter = std::collections::btree_set::IntoIter<Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.into_iter()
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a Tree;
    type IntoIter = std::collections::btree_set::Iter<'a, Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}
