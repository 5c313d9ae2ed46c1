//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, SentenceParser)
//! but are themselves concrete structs, not traits.

mod bank;
mod batch;
mod generator;

pub use bank::{BankLoad, BankService};
pub use batch::{BatchService, FileReport};
pub use generator::{
    EngineLimits, GenerationReport, GenerationStats, GeneratorService, Outcome,
    DEFAULT_COMBINATION_CEILING, DEFAULT_POWERSET_CEILING,
};
