//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod antichain;
pub mod arena;
pub mod assembler;
pub mod bank;
pub mod combinatorics;
pub mod combiner;
pub mod compat;
pub mod error;
pub mod inventory;
pub mod template;
pub mod tree;
pub mod variants;

pub use antichain::{Antichain, AntichainFilter, Antichains};
pub use arena::{TemplateArena, TemplateNode};
pub use assembler::assemble;
pub use bank::{BankBuilder, SubstitutionBank};
pub use combinatorics::{CartesianProduct, PaddedProduct, PowerSet};
pub use combiner::{Assignment, Combinations, Combiner};
pub use compat::{Compatibility, CompatibilityPolicy};
pub use error::{CeilingKind, DomainError, DomainResult, Magnitude};
pub use inventory::LimbInventory;
pub use template::Template;
pub use tree::{Position, Tree};
pub use variants::VariantSet;
