//! Compatibility predicate: may one tree replace another?

use std::collections::HashSet;

use crate::domain::tree::Tree;

/// Decides whether `candidate` may stand in for `slot`.
///
/// Called O(template nodes × bank size) times per template, so
/// implementations must be cheap and free of side effects.
pub trait Compatibility: Send + Sync {
    fn compatible(&self, slot: &Tree, candidate: &Tree) -> bool;
}

impl<F> Compatibility for F
where
    F: Fn(&Tree, &Tree) -> bool + Send + Sync,
{
    fn compatible(&self, slot: &Tree, candidate: &Tree) -> bool {
        self(slot, candidate)
    }
}

pub const DEFAULT_HEAD_CHECKED_LABELS: [&str; 2] = ["NP", "VP"];

pub const DEFAULT_RESTRICTED_WORDS: [&str; 6] = ["You", "you", "Your", "your", "I", "my"];

/// Label, head and restricted-word rules.
///
/// 1. Labels must match exactly.
/// 2. For head-checked labels the first children's labels must match too.
/// 3. Neither yield may contain a restricted word.
///
/// Inner shape beyond the head is not compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityPolicy {
    head_checked_labels: HashSet<String>,
    restricted_words: HashSet<String>,
}

impl Default for CompatibilityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_HEAD_CHECKED_LABELS, DEFAULT_RESTRICTED_WORDS)
    }
}

impl CompatibilityPolicy {
    pub fn new<H, R>(head_checked_labels: H, restricted_words: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            head_checked_labels: head_checked_labels.into_iter().map(Into::into).collect(),
            restricted_words: restricted_words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_head_checked(&self, label: &str) -> bool {
        self.head_checked_labels.contains(label)
    }

    /// True if any leaf word of `tree` is restricted.
    pub fn uses_restricted(&self, tree: &Tree) -> bool {
        tree.pre_order()
            .filter_map(Tree::word)
            .any(|word| self.restricted_words.contains(word))
    }
}

impl Compatibility for CompatibilityPolicy {
    fn compatible(&self, slot: &Tree, candidate: &Tree) -> bool {
        if slot.label() != candidate.label() {
            return false;
        }
        if self.is_head_checked(slot.label())
            && slot.first_child().map(Tree::label) != candidate.first_child().map(Tree::label)
        {
            return false;
        }
        !self.uses_restricted(slot) && !self.uses_restricted(candidate)
    }
}
