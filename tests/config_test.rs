//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE (global defines the real baseline)
//! - Global → Local: UNION with negation support
//! - Any → Env vars: REPLACE (explicit user override)

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use comeback::config::{local_config_path, merge_array, Settings};
use comeback::domain::{Compatibility, Tree};
use comeback::util::testing::tree;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn write_local(dir: &TempDir, content: &str) {
    fs::write(local_config_path(dir.path()), content).unwrap();
}

#[test]
fn given_no_config_files_when_load_then_uses_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.engine.powerset_ceiling, 10_000_000);
    assert_eq!(settings.engine.combination_ceiling, 60_000);
    assert!(settings.bank.corpus.is_none());
}

#[test]
fn given_local_config_with_words_when_load_then_unions_with_defaults() {
    let dir = TempDir::new().unwrap();
    write_local(
        &dir,
        r#"
[policy]
restricted_words = ["me"]
"#,
    );

    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    let words = &settings.policy.restricted_words;
    assert!(words.contains(&"me".to_string()));
    assert!(words.contains(&"you".to_string()));
    assert!(words.contains(&"I".to_string()));
    // Untouched arrays inherit
    assert_eq!(settings.policy.head_checked_labels, strings(&["NP", "VP"]));
}

#[test]
fn given_local_negation_when_load_then_removes_inherited_item() {
    let dir = TempDir::new().unwrap();
    write_local(
        &dir,
        r#"
[policy]
restricted_words = ["!I", "!my"]

[bank]
wrapper_labels = ["!FRAG"]
"#,
    );

    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    assert_eq!(
        settings.policy.restricted_words,
        strings(&["You", "Your", "you", "your"])
    );
    assert_eq!(settings.bank.wrapper_labels, strings(&["ROOT"]));
}

#[test]
fn given_local_scalars_when_load_then_overlay_wins() {
    let dir = TempDir::new().unwrap();
    write_local(
        &dir,
        r#"
[engine]
combination_ceiling = 500

[bank]
corpus = "/data/insults.mrg"

[output]
dir = "/tmp/comebacks"
"#,
    );

    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    assert_eq!(settings.engine.combination_ceiling, 500);
    assert_eq!(settings.engine.powerset_ceiling, 10_000_000);
    assert_eq!(settings.bank.corpus, Some(PathBuf::from("/data/insults.mrg")));
    assert_eq!(settings.output.dir, Some(PathBuf::from("/tmp/comebacks")));
    assert_eq!(settings.limits().combination_ceiling, 500);
}

#[test]
fn given_global_and_local_when_load_then_global_replaces_and_local_unions() {
    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("comeback.toml");
    fs::write(
        &global,
        r#"
[policy]
restricted_words = ["thou"]
head_checked_labels = ["NP"]
"#,
    )
    .unwrap();
    let dir = TempDir::new().unwrap();
    write_local(
        &dir,
        r#"
[policy]
restricted_words = ["thee"]
"#,
    );

    let settings =
        Settings::load_from(Some(global.as_path()), Some(dir.path())).expect("load settings");

    assert_eq!(settings.policy.restricted_words, strings(&["thee", "thou"]));
    assert_eq!(settings.policy.head_checked_labels, strings(&["NP"]));
}

#[test]
fn given_zero_ceiling_when_load_then_fails_validation() {
    let dir = TempDir::new().unwrap();
    write_local(
        &dir,
        r#"
[engine]
powerset_ceiling = 0
"#,
    );

    let result = Settings::load_from(None, Some(dir.path()));

    assert!(result.is_err());
}

#[test]
fn given_malformed_local_file_when_load_then_reports_config_error() {
    let dir = TempDir::new().unwrap();
    write_local(&dir, "[engine\npowerset_ceiling = ");

    let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains(".comeback.toml"));
}

#[test]
fn given_configured_policy_when_building_then_predicate_follows_settings() {
    let dir = TempDir::new().unwrap();
    write_local(
        &dir,
        r#"
[policy]
restricted_words = ["!you"]
"#,
    );

    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");
    let policy = settings.policy();

    let slot = tree("(NP (NNS cats))");
    let candidate: Tree = tree("(NP (NNS you))");
    assert!(policy.compatible(&slot, &candidate));
}

#[test]
fn given_overlay_with_duplicates_when_merging_arrays_then_result_is_sorted_set() {
    let merged = merge_array(&strings(&["b", "a"]), &strings(&["a", "c", "!b"]));
    assert_eq!(merged, strings(&["a", "c"]));
}

#[test]
fn given_settings_when_rendering_toml_then_contains_every_section() {
    let rendered = Settings::default().to_toml().unwrap();
    for section in ["[engine]", "[policy]", "[bank]"] {
        assert!(rendered.contains(section), "missing {section}");
    }
    assert!(Settings::template().contains("powerset_ceiling"));
}
