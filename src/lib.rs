//! Sentence recombination by constituent substitution.
//!
//! Given a parsed template sentence and a bank of phrases from a corpus, the
//! engine produces every variant obtained by simultaneously replacing
//! compatible, non-overlapping constituents of the template.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
