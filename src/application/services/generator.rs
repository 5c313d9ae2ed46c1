//! Variant generation service
//!
//! Runs the per-template pipeline: inventory, antichains, combinations,
//! assembly and deduplication, under the two explosion ceilings.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::ApplicationResult;
use crate::domain::{
    assemble, AntichainFilter, Combiner, Compatibility, CompatibilityPolicy, DomainError,
    LimbInventory, SubstitutionBank, Template, Tree, VariantSet,
};

pub const DEFAULT_POWERSET_CEILING: u64 = 10_000_000;
pub const DEFAULT_COMBINATION_CEILING: u64 = 60_000;

/// Upper bounds on the combinatorial search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    /// Largest power set (2^N over template positions) that is enumerated
    pub powerset_ceiling: u64,
    /// Largest number of combinations tried for one antichain
    pub combination_ceiling: u64,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            powerset_ceiling: DEFAULT_POWERSET_CEILING,
            combination_ceiling: DEFAULT_COMBINATION_CEILING,
        }
    }
}

/// How one template's generation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The power-set ceiling tripped; nothing was enumerated
    Aborted(DomainError),
}

/// Counters collected while generating for one template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub positions: usize,
    pub substitutable: usize,
    pub antichains: u64,
    /// Antichains containing a position without candidates
    pub pruned: u64,
    /// Antichains skipped by the combination ceiling
    pub skipped: u64,
    pub assemblies: u64,
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub template: Tree,
    pub variants: VariantSet,
    pub outcome: Outcome,
    pub stats: GenerationStats,
}

impl GenerationReport {
    pub fn is_aborted(&self) -> bool {
        matches!(self.outcome, Outcome::Aborted(_))
    }
}

/// Generates every admissible variant of a template against a shared bank.
///
/// The bank and predicate are read-only, so one service can be used from
/// many threads at once.
pub struct GeneratorService {
    bank: Arc<SubstitutionBank>,
    predicate: Arc<dyn Compatibility>,
    limits: EngineLimits,
}

impl GeneratorService {
    pub fn new(
        bank: Arc<SubstitutionBank>,
        predicate: Arc<dyn Compatibility>,
        limits: EngineLimits,
    ) -> Self {
        Self {
            bank,
            predicate,
            limits,
        }
    }

    /// Service with the default policy and limits.
    pub fn with_bank(bank: SubstitutionBank) -> Self {
        Self::new(
            Arc::new(bank),
            Arc::new(CompatibilityPolicy::default()),
            EngineLimits::default(),
        )
    }

    pub fn bank(&self) -> &SubstitutionBank {
        &self.bank
    }

    pub fn limits(&self) -> EngineLimits {
        self.limits
    }

    /// Generate the deduplicated variant set of `tree`.
    ///
    /// Ceiling hits are not errors: the power-set ceiling yields an empty,
    /// aborted report and the combination ceiling skips single antichains.
    #[instrument(level = "debug", skip_all, fields(template = %tree.sentence()))]
    pub fn generate(&self, tree: &Tree) -> ApplicationResult<GenerationReport> {
        let template = Template::new(tree.clone());
        let inventory = LimbInventory::build(&template, &self.bank, self.predicate.as_ref());
        let mut stats = GenerationStats {
            positions: template.len(),
            substitutable: inventory.substitutable_positions().count(),
            ..GenerationStats::default()
        };

        let filter = AntichainFilter::new(template.arena());
        let antichains = match filter.enumerate(self.limits.powerset_ceiling) {
            Ok(antichains) => antichains,
            Err(e) if e.is_ceiling() => {
                warn!("template skipped: {}: {}", e, tree.sentence());
                return Ok(GenerationReport {
                    template: tree.clone(),
                    variants: VariantSet::new(),
                    outcome: Outcome::Aborted(e),
                    stats,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let combiner = Combiner::new(&inventory);
        let mut variants = VariantSet::new();
        for antichain in antichains {
            stats.antichains += 1;
            let combinations =
                match combiner.combinations(&antichain, self.limits.combination_ceiling) {
                    Ok(combinations) => combinations,
                    Err(e) if e.is_ceiling() => {
                        warn!(positions = ?antichain.positions(), "antichain skipped: {}", e);
                        stats.skipped += 1;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
            if combinations.size() == 0 {
                stats.pruned += 1;
                continue;
            }
            for assignment in combinations {
                variants.insert(assemble(&template, &assignment)?);
                stats.assemblies += 1;
            }
        }

        debug!(?stats, "generation finished");
        info!(
            "{} variants generated for \"{}\"",
            variants.len(),
            tree.sentence()
        );
        Ok(GenerationReport {
            template: tree.clone(),
            variants,
            outcome: Outcome::Completed,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CeilingKind, Magnitude};

    fn tree(text: &str) -> Tree {
        text.parse().unwrap()
    }

    #[test]
    fn given_empty_bank_when_generating_then_only_template_is_returned() {
        let service = GeneratorService::with_bank(SubstitutionBank::new());
        let template = tree("(S (NP (NNS cats)) (VP (VBP purr)))");

        let report = service.generate(&template).unwrap();

        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.variants.len(), 1);
        assert!(report.variants.contains(&template));
        assert_eq!(report.stats.assemblies, 1);
    }

    #[test]
    fn given_low_powerset_ceiling_when_generating_then_report_is_aborted_and_empty() {
        let service = GeneratorService::new(
            Arc::new(SubstitutionBank::new()),
            Arc::new(CompatibilityPolicy::default()),
            EngineLimits {
                powerset_ceiling: 8,
                combination_ceiling: DEFAULT_COMBINATION_CEILING,
            },
        );
        // 5 positions, 32 subsets
        let report = service.generate(&tree("(S (NP cats) (VBP purr))")).unwrap();

        assert!(report.is_aborted());
        assert!(report.variants.is_empty());
        assert_eq!(
            report.outcome,
            Outcome::Aborted(DomainError::CeilingExceeded {
                kind: CeilingKind::PowerSet,
                required: Magnitude::Exactly(32),
                ceiling: 8,
            })
        );
    }
}
