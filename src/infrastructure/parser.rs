//! Penn Treebank bracket parser

use tracing::trace;

use crate::domain::{DomainResult, Tree};
use crate::infrastructure::traits::SentenceParser;

/// Reads pre-parsed utterances in bracket notation, one tree per call.
///
/// `(ROOT (S (NP (PRP he)) (VP (VBZ is) (NP (DT a) (NN fool)))))`
#[derive(Debug, Default, Clone, Copy)]
pub struct BracketParser;

impl SentenceParser for BracketParser {
    fn parse(&self, text: &str) -> DomainResult<Tree> {
        let tree: Tree = text.parse()?;
        trace!(nodes = tree.size(), "parsed: {}", tree.sentence());
        Ok(tree)
    }
}
