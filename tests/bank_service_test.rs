//! Tests for BankService

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use comeback::application::services::BankService;
use comeback::application::ApplicationError;
use comeback::domain::bank::{DEFAULT_CLAUSE_LABELS, DEFAULT_WRAPPER_LABELS};
use comeback::infrastructure::parser::BracketParser;
use comeback::infrastructure::traits::RealFileSystem;
use comeback::util::testing::{init_test_setup, tree, write_lines};

fn service() -> BankService {
    BankService::new(
        Arc::new(RealFileSystem),
        Arc::new(BracketParser),
        DEFAULT_WRAPPER_LABELS.map(String::from).to_vec(),
        DEFAULT_CLAUSE_LABELS.map(String::from).to_vec(),
    )
}

#[test]
fn given_corpus_file_when_loading_then_banks_clause_children_and_fragments() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let corpus = write_lines(
        temp.path(),
        "corpus.mrg",
        &[
            "# insults",
            "(ROOT (S (NP (PRP she)) (VP (VBZ is) (NP (DT a) (NN genius)))))",
            "",
            "(ROOT (FRAG (NP (DT a) (JJ total) (NN genius))))",
        ],
    );

    let loaded = service().load(&corpus).unwrap();

    assert_eq!(loaded.sentences, 2);
    assert_eq!(loaded.skipped, 0);
    let bank = &loaded.bank;
    assert_eq!(bank.keys().collect::<Vec<_>>(), vec!["NP", "VP"]);
    assert_eq!(bank.get("NP").unwrap().len(), 2);
    assert!(bank
        .get("VP")
        .unwrap()
        .contains(&tree("(VP (VBZ is) (NP (DT a) (NN genius)))")));
}

#[test]
fn given_malformed_line_when_loading_then_skips_it_and_continues() {
    let temp = TempDir::new().unwrap();
    let corpus = write_lines(
        temp.path(),
        "corpus.mrg",
        &[
            "(ROOT (S (NP (PRP she)) (VP (VBZ sings)))",
            "she sings",
            "(ROOT (S (NP (NNS cats)) (VP (VBP purr))))",
        ],
    );

    let loaded = service().load(&corpus).unwrap();

    assert_eq!(loaded.skipped, 2);
    assert_eq!(loaded.sentences, 1);
    assert!(loaded.bank.get("NP").unwrap().contains(&tree("(NP (NNS cats))")));
}

#[test]
fn given_missing_corpus_when_loading_then_fails_as_unreadable() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.mrg");

    let err = service().load(&missing).unwrap_err();

    match err {
        ApplicationError::CorpusUnreadable { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_corpus_directory_when_loading_then_merges_all_files_in_order() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("b");
    std::fs::create_dir(&nested).unwrap();
    write_lines(temp.path(), "a.mrg", &["(ROOT (S (NP (NNS cats)) (VP (VBP purr))))"]);
    write_lines(&nested, "c.mrg", &["(ROOT (S (NP (NNS dogs)) (VP (VBP bark))))"]);

    let loaded = service().load(temp.path()).unwrap();

    let names: Vec<&str> = loaded
        .files
        .iter()
        .filter_map(|f| f.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["a.mrg", "c.mrg"]);
    assert_eq!(loaded.bank.get("NP").unwrap().len(), 2);
    assert_eq!(loaded.bank.get("VP").unwrap().len(), 2);
}

#[test]
fn given_custom_labels_when_loading_then_uses_them() {
    let temp = TempDir::new().unwrap();
    let corpus = write_lines(
        temp.path(),
        "corpus.mrg",
        &["(ROOT (SINV (VP (VBZ says)) (NP (NNP Bob))))"],
    );
    let service = BankService::new(
        Arc::new(RealFileSystem),
        Arc::new(BracketParser),
        vec!["ROOT".to_string()],
        vec!["SINV".to_string()],
    );

    let loaded = service.load(Path::new(&corpus)).unwrap();

    assert!(loaded.bank.get("SINV").is_none());
    assert_eq!(loaded.bank.key_count(), 2);
}
