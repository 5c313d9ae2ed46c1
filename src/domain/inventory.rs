//! Per-position candidate sets for one template.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::bank::SubstitutionBank;
use crate::domain::compat::Compatibility;
use crate::domain::template::Template;
use crate::domain::tree::{Position, Tree};

/// `slots[p]` holds every bank candidate admissible at position `p`.
///
/// Candidates are borrowed from the bank, deduplicated structurally and kept
/// in a deterministic order. An empty slot is legitimate: that position is
/// never substituted.
#[derive(Debug, Clone, Default)]
pub struct LimbInventory<'b> {
    slots: Vec<Vec<&'b Tree>>,
}

impl<'b> LimbInventory<'b> {
    /// Filter every bank candidate against every template node.
    pub fn build<C>(template: &Template, bank: &'b SubstitutionBank, predicate: &C) -> Self
    where
        C: Compatibility + ?Sized,
    {
        let slots: Vec<Vec<&'b Tree>> = template
            .nodes()
            .map(|(_, node)| {
                bank.candidates()
                    .filter(|candidate| predicate.compatible(node, candidate))
                    .collect::<BTreeSet<&'b Tree>>()
                    .into_iter()
                    .collect()
            })
            .collect();

        let inventory = Self { slots };
        debug!(
            positions = inventory.len(),
            substitutable = inventory.substitutable_positions().count(),
            candidates = inventory.total(),
            "limb inventory built"
        );
        inventory
    }

    /// Inventory from explicit per-position candidate lists.
    pub fn from_slots(slots: Vec<Vec<&'b Tree>>) -> Self {
        let slots = slots
            .into_iter()
            .map(|slot| slot.into_iter().collect::<BTreeSet<_>>().into_iter().collect())
            .collect();
        Self { slots }
    }

    /// Candidates at `position`; empty if none or out of range.
    pub fn candidates(&self, position: Position) -> &[&'b Tree] {
        self.slots
            .get(position.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Positions with at least one candidate.
    pub fn substitutable_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_empty())
            .map(|(i, _)| Position(i))
    }

    /// Sum of candidate counts over all positions.
    pub fn total(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compat::CompatibilityPolicy;

    #[test]
    fn given_bank_when_building_inventory_then_only_compatible_positions_get_candidates() {
        let template = Template::new(
            "(S (NP (PRP he)) (VP (VBZ is) (NP (DT a) (NN fool))))"
                .parse()
                .unwrap(),
        );
        let mut bank = SubstitutionBank::new();
        bank.insert("NP", "(NP (DT a) (NN genius))".parse().unwrap());
        bank.insert("NP", "(NP (NNS cats))".parse().unwrap());
        bank.insert("VP", "(VP (VBZ sings))".parse().unwrap());

        let inventory = LimbInventory::build(&template, &bank, &CompatibilityPolicy::default());

        assert_eq!(inventory.len(), template.len());
        // VP head VBZ matches, NP at 7 matches by head DT; NP at 1 has head PRP
        let substitutable: Vec<Position> = inventory.substitutable_positions().collect();
        assert_eq!(substitutable, vec![Position(4), Position(7)]);
        assert_eq!(inventory.candidates(Position(7)).len(), 1);
        assert_eq!(
            inventory.candidates(Position(7))[0].to_string(),
            "(NP (DT a) (NN genius))"
        );
        assert!(inventory.candidates(Position(1)).is_empty());
        assert!(inventory.candidates(Position(99)).is_empty());
    }

    #[test]
    fn given_duplicate_slot_entries_when_building_from_slots_then_deduplicates() {
        let a: Tree = "(NP (NNS cats))".parse().unwrap();
        let b: Tree = "(NP (NNS cats))".parse().unwrap();
        let inventory = LimbInventory::from_slots(vec![vec![&a, &b], vec![]]);
        assert_eq!(inventory.candidates(Position(0)).len(), 1);
        assert_eq!(inventory.total(), 1);
    }
}
