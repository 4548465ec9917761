//! # Sanitization
//!
//! Returns a copy of a document holding only its non-private schema fields.
//! Referenced sub-documents are sanitized against the type their *own*
//! discriminator names, not the schema's declared alternatives, so a list
//! holding several sub-types keeps the right fields for each element.
//!
//! Sanitization does not validate. It only needs enough shape to know what
//! to keep; a sub-document it cannot resolve is an error.

use docschema_core::{FieldSpec, TypeDefinition, TypeNode, DISCRIMINATOR_FIELD};
use serde_json::{Map, Value};

use crate::engine::SchemaEngine;
use crate::error::EngineError;
use crate::pointer;

impl SchemaEngine {
    /// Strip private fields from `document`, which is sanitized as the type
    /// whose discriminator is `type_name`.
    ///
    /// Fields the schema does not declare are dropped.
    ///
    /// # Errors
    ///
    /// - `EngineError::UnknownType` if the type, or a sub-document's own
    ///   discriminator, is not in the schema.
    /// - `EngineError::MissingDiscriminator` for a sub-document without `type`.
    /// - `EngineError::NotAnObject` if `document` is not an object.
    pub fn sanitize(&self, type_name: &str, document: &Value) -> Result<Value, EngineError> {
        let definition = self.lookup(type_name)?;
        self.sanitize_definition(definition, document)
    }

    pub(crate) fn sanitize_definition(
        &self,
        definition: &TypeDefinition,
        document: &Value,
    ) -> Result<Value, EngineError> {
        tracing::debug!(type_name = definition.name(), "sanitizing document");

        let fields = document.as_object().ok_or_else(|| EngineError::NotAnObject {
            type_name: definition.name().to_string(),
        })?;
        Ok(Value::Object(self.sanitize_node(fields, definition.node(), "", 0)?))
    }

    fn sanitize_node(
        &self,
        document: &Map<String, Value>,
        node: &TypeNode,
        path: &str,
        depth: usize,
    ) -> Result<Map<String, Value>, EngineError> {
        self.enter(depth, || pointer::display(path).to_string())?;

        let mut out = Map::new();
        for field in node.fields() {
            if field.is_private() {
                continue;
            }
            let value = document.get(field.name());
            if value.is_none() && field.is_optional() {
                continue;
            }
            let field_path = pointer::child(path, field.name());

            let sanitized = match (field.spec(), value) {
                (FieldSpec::Primitive { .. }, None) => continue,
                (FieldSpec::Primitive { .. }, Some(v)) => v.clone(),
                (_, None | Some(Value::Null)) => Value::Null,
                (FieldSpec::Embedded(inner), Some(Value::Object(sub))) => {
                    Value::Object(self.sanitize_node(sub, inner, &field_path, depth + 1)?)
                }
                (FieldSpec::SingleRef(_), Some(Value::Object(sub))) => {
                    self.sanitize_reference(sub, &field_path, depth)?
                }
                (FieldSpec::ListRef(_), Some(Value::Array(items))) => {
                    let mut list = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        list.push(match item {
                            Value::Object(sub) => {
                                self.sanitize_reference(sub, &pointer::index(&field_path, i), depth)?
                            }
                            other => other.clone(),
                        });
                    }
                    Value::Array(list)
                }
                (_, Some(other)) => other.clone(),
            };
            out.insert(field.name().to_string(), sanitized);
        }
        Ok(out)
    }

    fn sanitize_reference(
        &self,
        sub: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> Result<Value, EngineError> {
        let discriminator = sub
            .get(DISCRIMINATOR_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| EngineError::MissingDiscriminator {
                path: path.to_string(),
            })?;
        let target = self.lookup(discriminator)?;
        Ok(Value::Object(self.sanitize_node(sub, target.node(), path, depth + 1)?))
    }
}
