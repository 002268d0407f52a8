//! Integration tests for loading configuration and forests from disk

use ctxfill_core::{EngineConfig, NodeKind, SuggestionForest};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ctxfill.toml");
    fs::write(
        &path,
        indoc! {r#"
            default_trigger = "{{ctx."
            closing_delimiter = "}}"
            whole_word = true
            case_insensitive = true
            spacer = " "
            space_removers = [",", ";"]
        "#},
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();

    assert_eq!(config.default_trigger(), "{{ctx.");
    assert!(config.whole_word());
    assert!(config.case_insensitive());
    assert_eq!(config.spacer(), " ");
    assert_eq!(config.space_removers(), &[",".to_string(), ";".to_string()]);
    // Untouched fields keep their defaults
    assert_eq!(config.max_options(), 4);
}

#[test]
fn test_load_missing_config_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = EngineConfig::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.toml"));
}

#[test]
fn test_load_invalid_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, r#"slug_pattern = "(""#).unwrap();

    let err = EngineConfig::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid slug pattern"));
}

#[test]
fn test_forest_from_host_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.json");
    fs::write(
        &path,
        indoc! {r#"
            [
              { "value": "customer", "type": "object", "options": [
                  { "value": "name", "type": "string" },
                  { "value": "address", "type": "object", "options": [
                      { "value": "zip", "type": "string" }
                  ]}
              ]},
              { "value": "getMobilePhone", "type": "function" }
            ]
        "#},
    )
    .unwrap();

    let forest = SuggestionForest::from_json(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(forest.root_names(), vec!["customer", "getMobilePhone"]);
    assert_eq!(forest.depth(), 3);
    let address = forest.root("customer").unwrap().child("address").unwrap();
    assert_eq!(address.kind(), &NodeKind::Object);
    assert_eq!(address.child_names(), vec!["zip"]);
}
