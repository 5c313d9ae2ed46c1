//! Antichain enumeration over template positions.
//!
//! An antichain is a set of positions none of which is an ancestor of
//! another, so all of them can be replaced at once without one replacement
//! erasing another's target.

use itertools::Itertools;
use tracing::debug;

use crate::domain::arena::TemplateArena;
use crate::domain::combinatorics::PowerSet;
use crate::domain::error::{CeilingKind, DomainError, DomainResult, Magnitude};
use crate::domain::tree::Position;

/// Positions in ascending pre-order with no ancestor/descendant pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Antichain(Vec<Position>);

impl Antichain {
    pub fn positions(&self) -> &[Position] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unchecked: the caller guarantees that no two positions are related.
impl From<Vec<Position>> for Antichain {
    fn from(positions: Vec<Position>) -> Self {
        Self(positions)
    }
}

pub struct AntichainFilter<'t> {
    arena: &'t TemplateArena,
    positions: Vec<Position>,
}

impl<'t> AntichainFilter<'t> {
    pub fn new(arena: &'t TemplateArena) -> Self {
        Self {
            arena,
            positions: arena.positions().collect(),
        }
    }

    /// Number of candidate subsets, 2^N.
    pub fn size(&self) -> Option<u64> {
        PowerSet::new(&self.positions).size()
    }

    /// Stops at the first related pair.
    pub fn is_antichain(&self, positions: &[Position]) -> bool {
        !positions
            .iter()
            .tuple_combinations()
            .any(|(&a, &b)| self.arena.are_related(a, b))
    }

    /// Lazily enumerate every antichain, or refuse if 2^N exceeds `ceiling`.
    pub fn enumerate(&self, ceiling: u64) -> DomainResult<Antichains<'_>> {
        let size = self.size();
        if size.map_or(true, |n| n > ceiling) {
            return Err(DomainError::CeilingExceeded {
                kind: CeilingKind::PowerSet,
                required: Magnitude::from(size),
                ceiling,
            });
        }
        debug!(positions = self.positions.len(), subsets = ?size, "enumerating antichains");
        Ok(Antichains {
            filter: self,
            subsets: PowerSet::new(&self.positions),
        })
    }
}

/// Iterator over the antichains of one template.
pub struct Antichains<'f> {
    filter: &'f AntichainFilter<'f>,
    subsets: PowerSet<'f, Position>,
}

impl Iterator for Antichains<'_> {
    type Item = Antichain;

    fn next(&mut self) -> Option<Self::Item> {
        for subset in self.subsets.by_ref() {
            let positions: Vec<Position> = subset.into_iter().copied().collect();
            if self.filter.is_antichain(&positions) {
                return Some(Antichain(positions));
            }
        }
        None
    }
}
