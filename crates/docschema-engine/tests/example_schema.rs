//! Integration test: the shipped example schema, end to end.
//!
//! Loads `schemas/example-schema.json` from the repository root and runs the
//! get / validate / sanitize scenarios a consuming application relies on.

use docschema_core::Schema;
use docschema_engine::{EngineError, MaterializeOptions, SchemaEngine, ViolationKind};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn engine() -> SchemaEngine {
    let schema = Schema::from_path(repo_root().join("schemas/example-schema.json"))
        .expect("Failed to load example schema");
    SchemaEngine::new(schema)
}

fn violation_messages(err: &EngineError) -> Vec<String> {
    err.violations()
        .unwrap_or_else(|| panic!("Expected Validation error, got: {err}"))
        .iter()
        .map(|v| v.message.clone())
        .collect()
}

#[test]
fn test_example_schema_is_consistent() {
    let engine = engine();
    assert_eq!(engine.type_names(), vec!["ExampleDoc", "SubDoc1", "SubDoc2"]);
    assert!(engine.schema().integrity_report().is_empty());
}

#[test]
fn test_get_with_sub_types_and_list_override() {
    let engine = engine();
    let sub2 = engine.named("SubDoc2").unwrap();
    let example = engine.named("ExampleDoc").unwrap();

    let doc = example
        .get(
            Some(&json!({
                "subdoc_list_multiple": [sub2.get(None, MaterializeOptions::default()).unwrap()]
            })),
            MaterializeOptions::with_sub_types(),
        )
        .unwrap();

    assert!(doc["subdoc_list"].is_array());
    assert!(doc["object"]["subdoc"].is_object());
    assert!(doc["private"].is_string());
    assert!(doc["optional"].is_string());
    assert!(doc["private_optional"].is_string());

    assert!(doc["subdoc"].is_object());
    assert!(doc["subdoc"]["subdoc"].is_object());
    assert!(doc["subdoc"]["name"].is_string());
    assert!(doc["subdoc"]["private"].is_string());

    let first = &doc["subdoc_list_multiple"][0];
    assert!(first.is_object());
    assert!(first["private"].is_string());
    assert!(first["optional"].is_string());
}

#[test]
fn test_missing_properties_are_all_reported() {
    let engine = engine();
    let err = engine
        .validate("example", &json!({"type": "example"}))
        .unwrap_err();
    let messages = violation_messages(&err);
    assert!(messages.contains(&"doc of type 'example' has missing property 'name'".to_string()));
    assert!(messages.contains(&"doc of type 'example' has missing property 'subdoc'".to_string()));
}

#[test]
fn test_missing_subdoc_reported_alongside_present_name() {
    let engine = engine();
    let err = engine
        .validate("example", &json!({"type": "example", "name": ""}))
        .unwrap_err();
    let messages = violation_messages(&err);
    assert!(messages.contains(&"doc of type 'example' has missing property 'subdoc'".to_string()));
    assert!(!messages.iter().any(|m| m.contains("'name'")));
}

#[test]
fn test_disallowed_sub_type_in_single_reference() {
    let engine = engine();
    let mut doc = engine
        .materialize("example", Some(&json!({"name": "x"})), MaterializeOptions::with_sub_types())
        .unwrap();
    doc["subdoc"] = engine
        .materialize("subdoc2", None, MaterializeOptions::default())
        .unwrap();

    let err = engine.validate("example", &doc).unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations.violations()[0].kind, ViolationKind::DisallowedSubType);
    assert!(violations.violations()[0].message.contains("'@subdoc1'"));
}

#[test]
fn test_valid_sub_document_passes() {
    let engine = engine();
    let subdoc = engine
        .materialize("subdoc1", None, MaterializeOptions::with_sub_types())
        .unwrap();
    let doc = engine
        .materialize(
            "example",
            Some(&json!({"name": "test", "subdoc": subdoc})),
            MaterializeOptions::with_sub_types(),
        )
        .unwrap();
    engine.validate("example", &doc).unwrap();
}

#[test]
fn test_list_reference_rejects_only_the_bad_element() {
    let engine = engine();
    let good = engine
        .materialize("subdoc1", None, MaterializeOptions::with_sub_types())
        .unwrap();
    let bad = engine
        .materialize("subdoc2", None, MaterializeOptions::default())
        .unwrap();
    let doc = engine
        .materialize(
            "example",
            Some(&json!({"name": "test", "count": "wrong", "subdoc_list": [good, bad]})),
            MaterializeOptions::with_sub_types(),
        )
        .unwrap();

    let err = engine.validate("example", &doc).unwrap_err();
    let violations = err.violations().unwrap();
    let disallowed: Vec<_> = violations
        .iter()
        .filter(|v| v.kind == ViolationKind::DisallowedSubType)
        .collect();
    assert_eq!(disallowed.len(), 1);
    assert_eq!(disallowed[0].path, "/subdoc_list/1");
    // The sibling field is still checked.
    assert!(violations.iter().any(|v| v.path == "/count"));
    assert_eq!(violations.len(), 2);
}

#[test]
fn test_get_output_validates_directly() {
    let engine = engine();
    for options in [
        MaterializeOptions::default(),
        MaterializeOptions::with_sub_types(),
        MaterializeOptions {
            include_sub_types: true,
            include_optional: false,
        },
    ] {
        let doc = engine.materialize("example", None, options).unwrap();
        engine.validate("example", &doc).unwrap();
        engine.validate_document(&doc).unwrap();
    }
}

#[test]
fn test_optional_fields_may_be_removed() {
    let engine = engine();
    let mut doc = engine
        .materialize("example", None, MaterializeOptions::default())
        .unwrap();
    let obj = doc.as_object_mut().unwrap();
    obj.remove("optional");
    obj.remove("private_optional");
    engine.validate("example", &doc).unwrap();
}

#[test]
fn test_sanitize_removes_private_fields() {
    let engine = engine();
    let doc = engine
        .materialize("example", None, MaterializeOptions::default())
        .unwrap();
    let clean = engine.sanitize("example", &doc).unwrap();
    assert_eq!(clean.get("private"), None);
    assert_eq!(clean.get("private_optional"), None);
    assert_eq!(clean["object"].get("private"), None);
    assert_eq!(clean["optional"], Value::String(String::new()));
}

#[test]
fn test_host_entry_refuses_sub_documents() {
    let engine = engine();
    let sub = engine
        .materialize("subdoc1", None, MaterializeOptions::with_sub_types())
        .unwrap();
    assert!(matches!(
        engine.validate_document(&sub),
        Err(EngineError::SubDocumentInsert { .. })
    ));
}

#[test]
fn test_yaml_schema_matches_json_schema() {
    let dir = tempfile::tempdir().unwrap();
    let json_schema = Schema::from_path(repo_root().join("schemas/example-schema.json")).unwrap();
    let source: Value =
        serde_json::from_str(&std::fs::read_to_string(repo_root().join("schemas/example-schema.json")).unwrap())
            .unwrap();
    let yaml_path = dir.path().join("example-schema.yaml");
    std::fs::write(&yaml_path, serde_yaml::to_string(&source).unwrap()).unwrap();
    let yaml_schema = Schema::from_path(&yaml_path).unwrap();
    assert_eq!(json_schema, yaml_schema);
}
