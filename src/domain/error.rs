//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

use crate::domain::tree::Position;

/// Which combinatorial guard tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeilingKind {
    /// 2^N subsets of the template positions
    PowerSet,
    /// Product of the per-position candidate counts of one antichain
    Combination,
}

impl fmt::Display for CeilingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CeilingKind::PowerSet => write!(f, "power-set"),
            CeilingKind::Combination => write!(f, "combination"),
        }
    }
}

/// Size of a combinatorial space, which may not fit in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Exactly(u64),
    Overflow,
}

impl From<Option<u64>> for Magnitude {
    fn from(size: Option<u64>) -> Self {
        size.map_or(Magnitude::Overflow, Magnitude::Exactly)
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Magnitude::Exactly(n) => write!(f, "{n}"),
            Magnitude::Overflow => write!(f, "more than {}", u64::MAX),
        }
    }
}

/// Domain errors represent violations of the engine's contracts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed tree {input:?}: {reason}")]
    MalformedTree { input: String, reason: String },

    #[error("{kind} ceiling exceeded: {required} > {ceiling}")]
    CeilingExceeded {
        kind: CeilingKind,
        required: Magnitude,
        ceiling: u64,
    },

    #[error("position {position} out of range for template with {len} nodes")]
    PositionOutOfRange { position: Position, len: usize },
}

impl DomainError {
    pub fn is_ceiling(&self) -> bool {
        matches!(self, DomainError::CeilingExceeded { .. })
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
