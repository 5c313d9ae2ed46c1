//! Tests for GeneratorService and the combination step

use std::collections::BTreeSet;
use std::sync::Arc;

use rstest::rstest;

use comeback::application::services::{EngineLimits, GeneratorService, Outcome};
use comeback::domain::{
    Antichain, AntichainFilter, CeilingKind, Combiner, Compatibility, CompatibilityPolicy,
    DomainError, LimbInventory, Position, SubstitutionBank, Template, Tree,
};
use comeback::util::testing::{init_test_setup, tree, HE_IS_A_FOOL};

fn bank(entries: &[(&str, &str)]) -> SubstitutionBank {
    entries
        .iter()
        .map(|(key, text)| (key.to_string(), tree(text)))
        .collect()
}

fn service(bank: SubstitutionBank, limits: EngineLimits) -> GeneratorService {
    GeneratorService::new(
        Arc::new(bank),
        Arc::new(CompatibilityPolicy::default()),
        limits,
    )
}

#[rstest]
#[case("(NP (NNS cats))", "(NP (NNS dogs))", true)]
#[case("(NP (NNS cats))", "(NP (NNS you))", false)]
#[case("(VP (VBZ is) (ADJP nice))", "(NP (NNS dogs))", false)]
fn given_documented_pairs_when_checking_compatibility_then_matches_expectation(
    #[case] slot: &str,
    #[case] candidate: &str,
    #[case] expected: bool,
) {
    let policy = CompatibilityPolicy::default();
    assert_eq!(policy.compatible(&tree(slot), &tree(candidate)), expected);
}

#[test]
fn given_inventories_of_three_and_four_when_combining_then_yields_twelve_distinct_assignments() {
    let trees: Vec<Tree> = (0..7).map(|i| Tree::tagged("NN", format!("w{i}"))).collect();
    let inventory = LimbInventory::from_slots(vec![
        trees[..3].iter().collect(),
        Vec::new(),
        trees[3..].iter().collect(),
    ]);
    let combiner = Combiner::new(&inventory);
    let antichain = Antichain::from(vec![Position(0), Position(2)]);

    let combinations = combiner.combinations(&antichain, 60_000).unwrap();
    assert_eq!(combinations.size(), 12);

    let assignments: Vec<_> = combinations.collect();
    assert_eq!(assignments.len(), 12);
    let distinct: BTreeSet<Vec<(Position, Option<&Tree>)>> = assignments
        .iter()
        .map(|a| a.entries().to_vec())
        .collect();
    assert_eq!(distinct.len(), 12);
}

#[test]
fn given_genius_bank_when_generating_for_fool_then_yields_he_is_a_genius() {
    init_test_setup();
    let bank = bank(&[("NP", "(NP (DT a) (NN genius))")]);
    let template = tree(HE_IS_A_FOOL);

    // Only the final NP qualifies
    let wrapped = Template::new(template.clone());
    let inventory = LimbInventory::build(&wrapped, &bank, &CompatibilityPolicy::default());
    assert_eq!(
        inventory.substitutable_positions().collect::<Vec<_>>(),
        vec![Position(7)]
    );

    // Exactly one non-trivial antichain with a combination
    let combiner = Combiner::new(&inventory);
    let productive: Vec<Antichain> = AntichainFilter::new(wrapped.arena())
        .enumerate(1 << 20)
        .unwrap()
        .filter(|a| !a.is_empty())
        .filter(|a| combiner.combinations(a, 60_000).map_or(false, |c| c.size() > 0))
        .collect();
    assert_eq!(productive.len(), 1);
    assert_eq!(productive[0].positions(), [Position(7)]);
    assert_eq!(combiner.combinations(&productive[0], 60_000).unwrap().size(), 1);

    let report = service(bank.clone(), EngineLimits::default())
        .generate(&template)
        .unwrap();

    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.variants.sentences(), vec!["he is a fool", "he is a genius"]);
    assert!(report.variants.contains(&template));
    assert_eq!(report.stats.substitutable, 1);
}

#[test]
fn given_two_paths_to_the_same_tree_when_generating_then_result_holds_it_once() {
    init_test_setup();
    // Replacing the VP or only its object NP both give "he is a genius"
    let bank = bank(&[
        ("NP", "(NP (DT a) (NN genius))"),
        ("VP", "(VP (VBZ is) (NP (DT a) (NN genius)))"),
    ]);

    let report = service(bank, EngineLimits::default())
        .generate(&tree(HE_IS_A_FOOL))
        .unwrap();

    assert_eq!(report.stats.assemblies, 3);
    assert_eq!(report.variants.len(), 2);
    assert_eq!(
        report
            .variants
            .iter()
            .filter(|v| v.sentence() == "he is a genius")
            .count(),
        1
    );
}

#[test]
fn given_candidate_equal_to_slot_when_generating_then_collapses_with_template() {
    let bank = bank(&[("NP", "(NP (DT a) (NN fool))")]);

    let report = service(bank, EngineLimits::default())
        .generate(&tree(HE_IS_A_FOOL))
        .unwrap();

    assert_eq!(report.variants.len(), 1);
    assert_eq!(report.stats.assemblies, 2);
}

#[test]
fn given_low_combination_ceiling_when_generating_then_only_oversized_antichain_is_skipped() {
    init_test_setup();
    let bank = bank(&[
        ("NP", "(NP (NNS dogs))"),
        ("NP", "(NP (NNS birds))"),
        ("NP", "(NP (NNS mice))"),
        ("VP", "(VP (VBP sleep))"),
        ("VP", "(VP (VBP run))"),
        ("VP", "(VP (VBP eat))"),
    ]);
    let template = tree("(S (NP (NNS cats)) (VP (VBP purr)))");

    let unlimited = service(bank.clone(), EngineLimits::default())
        .generate(&template)
        .unwrap();
    assert_eq!(unlimited.variants.len(), 1 + 3 + 3 + 9);
    assert_eq!(unlimited.stats.skipped, 0);

    let limited = service(
        bank,
        EngineLimits {
            combination_ceiling: 5,
            ..EngineLimits::default()
        },
    )
    .generate(&template)
    .unwrap();

    assert_eq!(limited.outcome, Outcome::Completed);
    assert_eq!(limited.stats.skipped, 1);
    assert_eq!(limited.variants.len(), 1 + 3 + 3);
    assert!(limited.variants.sentences().contains(&"dogs purr".to_string()));
    assert!(!limited.variants.sentences().contains(&"dogs sleep".to_string()));
}

#[test]
fn given_product_above_ceiling_when_combining_then_reports_combination_ceiling() {
    let trees: Vec<Tree> = (0..5).map(|i| Tree::tagged("NN", format!("w{i}"))).collect();
    let inventory = LimbInventory::from_slots(vec![
        trees.iter().collect(),
        trees.iter().collect(),
    ]);
    let antichain = Antichain::from(vec![Position(0), Position(1)]);

    let err = Combiner::new(&inventory)
        .combinations(&antichain, 24)
        .err()
        .unwrap();

    assert!(matches!(
        err,
        DomainError::CeilingExceeded {
            kind: CeilingKind::Combination,
            ceiling: 24,
            ..
        }
    ));
}

#[test]
fn given_restricted_word_in_template_when_generating_then_slot_is_never_substituted() {
    let bank = bank(&[("NP", "(NP (PRP she))")]);
    let template = tree("(S (NP (PRP I)) (VP (VBP sing)))");

    let report = service(bank, EngineLimits::default())
        .generate(&template)
        .unwrap();

    assert_eq!(report.variants.len(), 1);
    assert_eq!(report.stats.substitutable, 0);
}

#[test]
fn given_custom_predicate_when_generating_then_service_uses_it() {
    let bank = bank(&[("NP", "(NP (DT the) (NN fool))"), ("NP", "(NP (PRP you))")]);
    let any_np = |slot: &Tree, candidate: &Tree| slot.label() == candidate.label();
    let service = GeneratorService::new(Arc::new(bank), Arc::new(any_np), EngineLimits::default());

    let report = service.generate(&tree(HE_IS_A_FOOL)).unwrap();

    // Both NPs accept both candidates: 1 + 2 + 2 + 4
    assert_eq!(report.stats.substitutable, 2);
    assert_eq!(report.variants.len(), 9);
    assert!(report.variants.sentences().contains(&"you is you".to_string()));
}
