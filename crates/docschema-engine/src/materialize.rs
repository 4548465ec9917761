//! # Materialization
//!
//! Produces a default-populated document for a type: every primitive field
//! takes its exemplar, embedded nodes are materialized recursively, and
//! references become empty placeholders unless sub-types are requested.
//! Caller overrides are then deep-merged on top.
//!
//! A single reference with several alternatives, and any list reference,
//! is always left empty: there is no way to pick which sub-type to build.

use docschema_core::{FieldSpec, TypeDefinition, TypeNode};
use serde_json::{Map, Value};

use crate::engine::SchemaEngine;
use crate::error::EngineError;

/// Options for [`SchemaEngine::materialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Build single-alternative referenced sub-documents in place instead
    /// of leaving `null`.
    pub include_sub_types: bool,
    /// Include optional fields with their exemplar values.
    pub include_optional: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            include_sub_types: false,
            include_optional: true,
        }
    }
}

impl MaterializeOptions {
    /// Defaults plus referenced sub-documents.
    pub fn with_sub_types() -> Self {
        Self {
            include_sub_types: true,
            ..Self::default()
        }
    }
}

impl SchemaEngine {
    /// Materialize a default document of the type whose discriminator is
    /// `type_name`, then merge `overrides` onto it.
    ///
    /// # Errors
    ///
    /// - `EngineError::UnknownType` if the type, or a referenced type being
    ///   built, is not in the schema.
    /// - `EngineError::SchemaCycle` if sub-type expansion recurses past the
    ///   configured depth.
    /// - `EngineError::NotAnObject` if `overrides` is neither an object nor
    ///   `null`.
    pub fn materialize(
        &self,
        type_name: &str,
        overrides: Option<&Value>,
        options: MaterializeOptions,
    ) -> Result<Value, EngineError> {
        let definition = self.lookup(type_name)?;
        self.materialize_definition(definition, overrides, options)
    }

    pub(crate) fn materialize_definition(
        &self,
        definition: &TypeDefinition,
        overrides: Option<&Value>,
        options: MaterializeOptions,
    ) -> Result<Value, EngineError> {
        tracing::debug!(
            type_name = definition.name(),
            include_sub_types = options.include_sub_types,
            "materializing document"
        );

        let overrides = match overrides {
            None | Some(Value::Null) => None,
            Some(o @ Value::Object(_)) => Some(o),
            Some(_) => {
                return Err(EngineError::NotAnObject {
                    type_name: definition.name().to_string(),
                })
            }
        };

        let mut document = self.materialize_node(definition.node(), options, definition.name(), 0)?;
        if let Some(overrides) = overrides {
            deep_merge(&mut document, overrides);
        }
        Ok(document)
    }

    fn materialize_node(
        &self,
        node: &TypeNode,
        options: MaterializeOptions,
        type_name: &str,
        depth: usize,
    ) -> Result<Value, EngineError> {
        self.enter(depth, || type_name.to_string())?;

        let mut out = Map::with_capacity(node.len());
        for field in node.fields() {
            if field.is_optional() && !options.include_optional {
                continue;
            }
            let value = match field.spec() {
                FieldSpec::Primitive { exemplar, .. } => exemplar.clone(),
                FieldSpec::Embedded(inner) => self.materialize_node(inner, options, type_name, depth + 1)?,
                FieldSpec::ListRef(_) => Value::Array(Vec::new()),
                FieldSpec::SingleRef(allowed) => match allowed.single() {
                    Some(target) if options.include_sub_types => {
                        let sub = self.lookup(target)?;
                        self.materialize_node(sub.node(), options, sub.name(), depth + 1)?
                    }
                    _ => Value::Null,
                },
            };
            out.insert(field.name().to_string(), value);
        }
        Ok(Value::Object(out))
    }
}

/// Merge `overrides` into `target`. Objects merge key by key, recursively;
/// any other override value replaces the target wholesale.
pub(crate) fn deep_merge(target: &mut Value, overrides: &Value) {
    if let (Value::Object(base), Value::Object(patch)) = (&mut *target, overrides) {
        for (key, value) in patch {
            match base.get_mut(key) {
                Some(existing) => deep_merge(existing, value),
                None => {
                    base.insert(key.clone(), value.clone());
                }
            }
        }
        return;
    }
    *target = overrides.clone();
}
