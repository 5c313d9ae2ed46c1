//! Cartesian combination of per-position choices for one antichain.

use tracing::trace;

use crate::domain::antichain::Antichain;
use crate::domain::combinatorics::CartesianProduct;
use crate::domain::error::{CeilingKind, DomainError, DomainResult, Magnitude};
use crate::domain::inventory::LimbInventory;
use crate::domain::tree::{Position, Tree};

/// Maps each position of an antichain to a replacement, or `None` to leave it
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment<'b> {
    entries: Vec<(Position, Option<&'b Tree>)>,
}

impl<'b> Assignment<'b> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, position: Position, replacement: Option<&'b Tree>) -> Self {
        self.entries.push((position, replacement));
        self
    }

    pub fn entries(&self) -> &[(Position, Option<&'b Tree>)] {
        &self.entries
    }

    /// Positions that actually receive a replacement.
    pub fn replacements(&self) -> impl Iterator<Item = (Position, &'b Tree)> + '_ {
        self.entries
            .iter()
            .filter_map(|&(position, replacement)| replacement.map(|tree| (position, tree)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'b> FromIterator<(Position, &'b Tree)> for Assignment<'b> {
    fn from_iter<I: IntoIterator<Item = (Position, &'b Tree)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(position, tree)| (position, Some(tree)))
                .collect(),
        }
    }
}

pub struct Combiner<'i, 'b> {
    inventory: &'i LimbInventory<'b>,
}

impl<'i, 'b> Combiner<'i, 'b> {
    pub fn new(inventory: &'i LimbInventory<'b>) -> Self {
        Self { inventory }
    }

    /// Every way to pick one candidate per antichain position.
    ///
    /// A position without candidates empties the product; the empty antichain
    /// yields one empty assignment. Refuses if the product exceeds `ceiling`.
    pub fn combinations(
        &self,
        antichain: &Antichain,
        ceiling: u64,
    ) -> DomainResult<Combinations<'i, 'b>> {
        let positions = antichain.positions().to_vec();
        let axes = positions
            .iter()
            .map(|&position| self.inventory.candidates(position))
            .collect();
        let product = CartesianProduct::new(axes);

        let size = product.size();
        match size {
            Some(n) if n <= ceiling => {
                trace!(?positions, combinations = n, "antichain accepted");
                Ok(Combinations {
                    positions,
                    product,
                    size: n,
                })
            }
            _ => Err(DomainError::CeilingExceeded {
                kind: CeilingKind::Combination,
                required: Magnitude::from(size),
                ceiling,
            }),
        }
    }
}

/// Lazy sequence of assignments for one antichain.
pub struct Combinations<'i, 'b> {
    positions: Vec<Position>,
    product: CartesianProduct<'i, &'b Tree>,
    size: u64,
}

impl Combinations<'_, '_> {
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl<'i, 'b> Iterator for Combinations<'i, 'b> {
    type Item = Assignment<'b>;

    fn next(&mut self) -> Option<Self::Item> {
        let choice = self.product.next()?;
        Some(
            self.positions
                .iter()
                .copied()
                .zip(choice.into_iter().copied())
                .collect(),
        )
    }
}
