//! Substitution bank: candidate subtrees keyed by grammatical category.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::trace;

use crate::domain::tree::Tree;

pub const DEFAULT_WRAPPER_LABELS: [&str; 2] = ["ROOT", "FRAG"];

pub const DEFAULT_CLAUSE_LABELS: [&str; 1] = ["S"];

/// Read-only after construction. Values have set semantics: structurally
/// equal candidates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionBank {
    entries: BTreeMap<String, BTreeSet<Tree>>,
}

impl SubstitutionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tree` under `key`. Returns false if it was already present.
    pub fn insert(&mut self, key: impl Into<String>, tree: Tree) -> bool {
        self.entries.entry(key.into()).or_default().insert(tree)
    }

    /// Union `other` into this bank.
    pub fn merge(&mut self, other: SubstitutionBank) {
        for (key, trees) in other.entries {
            self.entries.entry(key).or_default().extend(trees);
        }
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<Tree>> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keys with their candidate sets, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Tree>)> {
        self.entries.iter().map(|(key, trees)| (key.as_str(), trees))
    }

    /// Every candidate across every key.
    pub fn candidates(&self) -> impl Iterator<Item = &Tree> {
        self.entries.values().flatten()
    }

    /// Total number of candidates.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(String, Tree)> for SubstitutionBank {
    fn from_iter<I: IntoIterator<Item = (String, Tree)>>(iter: I) -> Self {
        let mut bank = Self::new();
        for (key, tree) in iter {
            bank.insert(key, tree);
        }
        bank
    }
}

/// Accumulates parsed corpus sentences into a [`SubstitutionBank`].
///
/// Each sentence is unwrapped through its wrapper labels (first child only)
/// to reach the substantive top node. A clause contributes each immediate
/// child under that child's label; anything else contributes itself.
#[derive(Debug, Clone)]
pub struct BankBuilder {
    wrapper_labels: HashSet<String>,
    clause_labels: HashSet<String>,
    bank: SubstitutionBank,
}

impl Default for BankBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WRAPPER_LABELS, DEFAULT_CLAUSE_LABELS)
    }
}

impl BankBuilder {
    pub fn new<W, C>(wrapper_labels: W, clause_labels: C) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            wrapper_labels: wrapper_labels.into_iter().map(Into::into).collect(),
            clause_labels: clause_labels.into_iter().map(Into::into).collect(),
            bank: SubstitutionBank::new(),
        }
    }

    /// Register one parsed sentence.
    pub fn add(&mut self, parse: Tree) -> &mut Self {
        let top = self.strip_wrappers(parse);
        if self.clause_labels.contains(top.label()) {
            for child in top.into_children() {
                self.register(child);
            }
        } else {
            self.register(top);
        }
        self
    }

    pub fn build(self) -> SubstitutionBank {
        self.bank
    }

    fn strip_wrappers(&self, mut tree: Tree) -> Tree {
        while self.wrapper_labels.contains(tree.label()) && !tree.is_leaf() {
            tree = tree.into_children().swap_remove(0);
        }
        tree
    }

    fn register(&mut self, tree: Tree) {
        trace!(key = tree.label(), candidate = %tree, "bank insert");
        let key = tree.label().to_string();
        self.bank.insert(key, tree);
    }
}
