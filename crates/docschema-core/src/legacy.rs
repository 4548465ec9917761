//! # Marker-Annotated Schema Source
//!
//! Schema files are written in a compact marker convention:
//!
//! | Source | Meaning |
//! |---|---|
//! | `"$name": ...` | private field |
//! | `"~name": ...` | optional field |
//! | `"$~name"` / `"~$name"` | private and optional |
//! | `"@subdoc1"` | single reference to type `subdoc1` |
//! | `"@subdoc1,@subdoc2"` | single reference, either type |
//! | `["@subdoc1", "@subdoc2"]` | list of references, each either type |
//! | `{ ... }` | embedded structure |
//! | any other value | primitive exemplar |
//!
//! Decoding happens once, when the schema is loaded. Everything downstream
//! works on [`FieldDescriptor`]s.
//!
//! A reference marker must *start* with `@`; strings that merely contain
//! one (e-mail exemplars, for instance) stay primitive.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::field::{FieldDescriptor, FieldSpec};
use crate::node::TypeNode;

pub const PRIVATE_MARKER: char = '$';
pub const OPTIONAL_MARKER: char = '~';
pub const REFERENCE_MARKER: char = '@';

/// Decode one type node from its source object. `path` locates the node
/// within the schema source and is only used for error messages.
pub fn decode_node(source: &Map<String, Value>, path: &str) -> Result<TypeNode, SchemaError> {
    let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(source.len());
    for (key, value) in source {
        let field = decode_field(key, value, path)?;
        if fields.iter().any(|f| f.name() == field.name()) {
            return Err(SchemaError::InvalidSchema(format!(
                "field '{key}' at '{path}' repeats the name '{}' under different modifiers",
                field.name()
            )));
        }
        fields.push(field);
    }
    Ok(TypeNode::new(fields))
}

fn decode_field(key: &str, value: &Value, path: &str) -> Result<FieldDescriptor, SchemaError> {
    let (name, private, optional) = decode_key(key);
    if name.is_empty() {
        return Err(SchemaError::InvalidSchema(format!(
            "field '{key}' at '{path}' has no name after removing modifiers"
        )));
    }
    let field_path = format!("{path}/{name}");
    let mut field = FieldDescriptor::new(name, decode_spec(value, &field_path)?);
    if private {
        field = field.private();
    }
    if optional {
        field = field.optional();
    }
    Ok(field)
}

/// Split a source key into its plain name and modifier flags.
fn decode_key(key: &str) -> (&str, bool, bool) {
    let mut private = false;
    let mut optional = false;
    let mut rest = key;
    loop {
        if let Some(r) = rest.strip_prefix(PRIVATE_MARKER) {
            private = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix(OPTIONAL_MARKER) {
            optional = true;
            rest = r;
        } else {
            break;
        }
    }
    (rest, private, optional)
}

fn is_reference_marker(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.starts_with(REFERENCE_MARKER))
}

fn decode_spec(value: &Value, path: &str) -> Result<FieldSpec, SchemaError> {
    match value {
        Value::String(marker) if marker.starts_with(REFERENCE_MARKER) => {
            Ok(FieldSpec::single_ref(parse_alternatives(marker, path)?))
        }
        Value::Array(items) if items.first().is_some_and(is_reference_marker) => {
            let mut alternatives = Vec::new();
            for item in items {
                match item.as_str() {
                    Some(marker) if marker.starts_with(REFERENCE_MARKER) => {
                        alternatives.extend(parse_alternatives(marker, path)?);
                    }
                    _ => {
                        return Err(SchemaError::MalformedReference {
                            path: path.to_string(),
                            marker: item.to_string(),
                        })
                    }
                }
            }
            Ok(FieldSpec::list_ref(alternatives))
        }
        Value::Object(inner) => Ok(FieldSpec::embedded(decode_node(inner, path)?)),
        other => Ok(FieldSpec::primitive(other.clone())),
    }
}

/// Parse `@a,@b` (or `@a,b`) into `["a", "b"]`.
fn parse_alternatives(marker: &str, path: &str) -> Result<Vec<String>, SchemaError> {
    let mut out = Vec::new();
    for part in marker.split(',') {
        let part = part.trim();
        let name = part.strip_prefix(REFERENCE_MARKER).unwrap_or(part).trim();
        if name.is_empty() {
            return Err(SchemaError::MalformedReference {
                path: path.to_string(),
                marker: marker.to_string(),
            });
        }
        out.push(name.to_string());
    }
    Ok(out)
}
