//! Property tests over generated schemas.
//!
//! Each case builds a random type tree (primitives, embedded nodes, private
//! and optional fields) plus fixed references to a sub-document type, then
//! checks the invariants that must hold for every schema:
//!
//! - materialized defaults validate;
//! - sanitized output never carries a private field;
//! - sanitize is idempotent;
//! - deleting any required top-level field is reported by name.

use std::collections::BTreeSet;

use docschema_core::{FieldDescriptor, FieldSpec, Schema, TypeNode};
use docschema_engine::{MaterializeOptions, SchemaEngine, ViolationKind};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Private fields are always named with this prefix so that leaks show up
/// as a plain substring search on the serialized output.
const SECRET: &str = "secret_";

#[derive(Debug, Clone)]
struct GenField {
    name: String,
    private: bool,
    optional: bool,
    spec: GenSpec,
}

#[derive(Debug, Clone)]
enum GenSpec {
    Primitive(Value),
    Embedded(Vec<GenField>),
}

fn exemplar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z ]{0,8}".prop_map(Value::String),
    ]
}

fn field_strategy() -> impl Strategy<Value = GenField> {
    let leaf = ("[a-z]{1,5}", any::<bool>(), any::<bool>(), exemplar()).prop_map(
        |(name, private, optional, value)| GenField {
            name,
            private,
            optional,
            spec: GenSpec::Primitive(value),
        },
    );
    leaf.prop_recursive(3, 32, 4, |inner| {
        (
            "[a-z]{1,5}",
            any::<bool>(),
            any::<bool>(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, private, optional, children)| GenField {
                name,
                private,
                optional,
                spec: GenSpec::Embedded(children),
            })
    })
}

/// Turn generated fields into a node. Names are deduplicated per level and
/// prefixed so they never collide with `type` or with each other across
/// visibility.
fn build_node(fields: &[GenField]) -> TypeNode {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for f in fields {
        let name = if f.private {
            format!("{SECRET}{}", f.name)
        } else {
            format!("f_{}", f.name)
        };
        if !seen.insert(name.clone()) {
            continue;
        }
        let spec = match &f.spec {
            GenSpec::Primitive(v) => FieldSpec::primitive(v.clone()),
            GenSpec::Embedded(children) => FieldSpec::embedded(build_node(children)),
        };
        let mut field = FieldDescriptor::new(name, spec);
        if f.private {
            field = field.private();
        }
        if f.optional {
            field = field.optional();
        }
        out.push(field);
    }
    TypeNode::new(out)
}

fn build_engine(fields: &[GenField]) -> SchemaEngine {
    let mut root = build_node(fields)
        .with_field(FieldDescriptor::new("type", FieldSpec::primitive("generated")))
        .with_field(FieldDescriptor::new("child", FieldSpec::single_ref(["leaf"])))
        .with_field(FieldDescriptor::new("children", FieldSpec::list_ref(["leaf"])));
    root = root.with_field(
        FieldDescriptor::new("either", FieldSpec::single_ref(["leaf", "generated"])).optional(),
    );

    let leaf = TypeNode::new(vec![
        FieldDescriptor::new("type", FieldSpec::primitive("leaf")),
        FieldDescriptor::new("label", FieldSpec::primitive("")),
        FieldDescriptor::new(format!("{SECRET}leaf"), FieldSpec::primitive(0)).private(),
    ]);

    let schema = Schema::new()
        .with_type("DocSchemas", "Generated", root)
        .with_type("SubDocSchemas", "Leaf", leaf);
    SchemaEngine::new(schema)
}

proptest! {
    #[test]
    fn materialized_defaults_validate(fields in prop::collection::vec(field_strategy(), 0..6)) {
        let engine = build_engine(&fields);
        for options in [MaterializeOptions::default(), MaterializeOptions::with_sub_types()] {
            let doc = engine.materialize("generated", None, options).unwrap();
            prop_assert!(engine.validate("generated", &doc).is_ok());
        }
    }

    #[test]
    fn sanitized_output_has_no_private_fields(fields in prop::collection::vec(field_strategy(), 0..6)) {
        let engine = build_engine(&fields);
        let mut doc = engine
            .materialize("generated", None, MaterializeOptions::with_sub_types())
            .unwrap();
        let leaf = engine.materialize("leaf", None, MaterializeOptions::default()).unwrap();
        doc["child"] = leaf.clone();
        doc["children"] = json!([leaf.clone(), leaf]);

        let clean = engine.sanitize("generated", &doc).unwrap();
        let text = serde_json::to_string(&clean).unwrap();
        prop_assert!(!text.contains(SECRET), "private field leaked: {}", text);
    }

    #[test]
    fn sanitize_is_idempotent(fields in prop::collection::vec(field_strategy(), 0..6)) {
        let engine = build_engine(&fields);
        let doc = engine
            .materialize("generated", None, MaterializeOptions::with_sub_types())
            .unwrap();
        let once = engine.sanitize("generated", &doc).unwrap();
        let twice = engine.sanitize("generated", &once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn deleted_required_field_is_reported(
        fields in prop::collection::vec(field_strategy(), 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let engine = build_engine(&fields);
        let node = engine.resolve_by_type("generated").unwrap();
        let required: Vec<&str> = node
            .fields()
            .iter()
            .filter(|f| f.is_required() && f.name() != "type")
            .map(|f| f.name())
            .collect();
        prop_assume!(!required.is_empty());
        let target = required[pick.index(required.len())];

        let mut doc = engine
            .materialize("generated", None, MaterializeOptions::with_sub_types())
            .unwrap();
        doc.as_object_mut().unwrap().remove(target);

        let err = engine.validate("generated", &doc).unwrap_err();
        let violations = err.violations().unwrap();
        prop_assert_eq!(violations.len(), 1);
        let v = &violations.violations()[0];
        prop_assert_eq!(v.kind, ViolationKind::MissingProperty);
        let expected = format!("'{}'", target);
        prop_assert!(v.message.contains(&expected));
    }
}
