//! End-to-end tests for the blueprint binary.

use assert_cmd::Command;
use blueprint_core::{Definition, Document};
use blueprint_test_utils::sample_instance;
use indexmap::IndexMap;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn blueprint() -> Command {
    Command::cargo_bin("blueprint").expect("blueprint binary should build")
}

fn write_sample_state(dir: &TempDir) -> std::path::PathBuf {
    let state = dir.path().join("state.yml");
    std::fs::write(&state, serde_yaml::to_string(&sample_instance()).unwrap()).unwrap();
    state
}

#[test]
fn types_lists_the_known_data_types_in_order() {
    blueprint()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("sites"))
        .stdout(predicate::str::contains("sections"));
}

#[test]
fn export_then_import_reproduces_the_document_on_a_fresh_instance() {
    let dir = TempDir::new().unwrap();
    let state = write_sample_state(&dir);
    let schema = dir.path().join("schema.yml");

    blueprint()
        .args(["export", "--state"])
        .arg(&state)
        .arg("--file")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported schema"));

    let fresh_state = dir.path().join("fresh.yml");
    blueprint()
        .args(["import", "--force", "--state"])
        .arg(&fresh_state)
        .arg("--file")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded schema"));

    let re_exported = dir.path().join("schema2.yml");
    blueprint()
        .args(["export", "--state"])
        .arg(&fresh_state)
        .arg("--file")
        .arg(&re_exported)
        .assert()
        .success();

    let original: Document =
        serde_yaml::from_str(&std::fs::read_to_string(&schema).unwrap()).unwrap();
    let round_tripped: Document =
        serde_yaml::from_str(&std::fs::read_to_string(&re_exported).unwrap()).unwrap();
    assert_eq!(round_tripped, original);
}

#[test]
fn import_aborts_when_the_document_is_missing() {
    let dir = TempDir::new().unwrap();
    let state = write_sample_state(&dir);

    blueprint()
        .args(["import", "--state"])
        .arg(&state)
        .arg("--file")
        .arg(dir.path().join("missing.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Document not found"));

    // No mutation happened: the state file is untouched.
    let untouched: blueprint_core::MemoryHost =
        serde_yaml::from_str(&std::fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(
        serde_yaml::to_string(&untouched).unwrap(),
        serde_yaml::to_string(&sample_instance()).unwrap()
    );
}

#[test]
fn a_rejected_record_fails_the_command_but_the_rest_is_committed() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.yml");
    let schema = dir.path().join("schema.yml");

    let mut fields = IndexMap::new();
    let mut broken = Definition::new("field");
    broken.attributes.insert("name".to_string(), json!(""));
    fields.insert("broken".to_string(), broken);
    let mut valid = Definition::new("field");
    valid.attributes.insert("name".to_string(), json!("Title"));
    fields.insert("title".to_string(), valid);
    let mut document = Document::new();
    document.insert("fields".to_string(), fields);
    std::fs::write(&schema, serde_yaml::to_string(&document).unwrap()).unwrap();

    blueprint()
        .args(["import", "--state"])
        .arg(&state)
        .arg("--file")
        .arg(&schema)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("1 failed record"));

    let host: blueprint_core::MemoryHost =
        serde_yaml::from_str(&std::fs::read_to_string(&state).unwrap()).unwrap();
    use blueprint_core::Host;
    assert!(host.get_record("fields", "title").is_some());
    assert!(host.get_record("fields", "broken").is_none());
}

#[test]
fn invalid_include_entries_are_warned_about_on_export() {
    let dir = TempDir::new().unwrap();
    let state = write_sample_state(&dir);

    blueprint()
        .args(["export", "--include", "fields,bogus", "--state"])
        .arg(&state)
        .arg("--file")
        .arg(dir.path().join("schema.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("bogus"))
        .stdout(predicate::str::contains("Valid types are"));
}

#[test]
fn override_file_values_win_over_the_schema() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.yml");
    let schema = dir.path().join("schema.yml");
    let override_file = dir.path().join("override.yml");

    let mut fields = IndexMap::new();
    let mut title = Definition::new("field");
    title.attributes.insert("name".to_string(), json!("Title"));
    fields.insert("title".to_string(), title);
    let mut document = Document::new();
    document.insert("fields".to_string(), fields);
    std::fs::write(&schema, serde_yaml::to_string(&document).unwrap()).unwrap();

    let mut override_fields = IndexMap::new();
    let mut renamed = Definition::new("field");
    renamed.attributes.insert("name".to_string(), json!("Headline"));
    override_fields.insert("title".to_string(), renamed);
    let mut override_doc = Document::new();
    override_doc.insert("fields".to_string(), override_fields);
    std::fs::write(&override_file, serde_yaml::to_string(&override_doc).unwrap()).unwrap();

    blueprint()
        .args(["import", "--state"])
        .arg(&state)
        .arg("--file")
        .arg(&schema)
        .arg("--override-file")
        .arg(&override_file)
        .assert()
        .success();

    let host: blueprint_core::MemoryHost =
        serde_yaml::from_str(&std::fs::read_to_string(&state).unwrap()).unwrap();
    use blueprint_core::Host;
    let title = host.get_record("fields", "title").unwrap();
    assert_eq!(title.attribute("name"), Some(&json!("Headline")));
}
