//! # Validation
//!
//! Structural validation of a document against a type node. The schema tree
//! and the document tree are walked in lockstep; polymorphic references are
//! resolved by the sub-document's own discriminator and validated against
//! the type they resolve to.
//!
//! ## Error Accumulation
//!
//! Validation never stops at the first problem. Every recursive call
//! returns its own [`ValidationViolations`], which the caller merges into
//! its list, so siblings of a broken field are still checked and a single
//! call reports everything wrong with the document.
//!
//! Structural errors (unknown referenced type, recursion limit) are not
//! violations; they abort the whole call through `?`.

use std::fmt;

use docschema_core::{AllowedTypes, FieldSpec, TypeDefinition, TypeNode, DISCRIMINATOR_FIELD};
use serde_json::{Map, Value};

use crate::engine::SchemaEngine;
use crate::error::EngineError;
use crate::pointer;

/// Category of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A required field is absent.
    MissingProperty,
    /// A sub-document's discriminator is not among the allowed alternatives.
    DisallowedSubType,
    /// A value's kind differs from the declared kind.
    TypeMismatch,
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the document.
    pub path: String,
    /// What went wrong.
    pub kind: ViolationKind,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    fn missing_property(path: String, doc_type: Option<&str>, field: &str) -> Self {
        let of_type = doc_type
            .map(|t| format!(" of type '{t}'"))
            .unwrap_or_default();
        Self {
            path,
            kind: ViolationKind::MissingProperty,
            message: format!("doc{of_type} has missing property '{field}'"),
        }
    }

    fn disallowed_sub_type(path: &str, field: &str, allowed: &AllowedTypes, found: Option<&str>) -> Self {
        let found = match found {
            Some(t) => format!("found '{t}'"),
            None => "found no discriminator".to_string(),
        };
        Self {
            path: path.to_string(),
            kind: ViolationKind::DisallowedSubType,
            message: format!(
                "invalid subdocument, only type '{allowed}' documents are permitted in the field '{field}' ({found})"
            ),
        }
    }

    fn type_mismatch(path: &str, field: Option<&str>, expected: &str, actual: &Value) -> Self {
        let subject = match field {
            Some(f) => format!("doc field '{f}'"),
            None => "doc".to_string(),
        };
        Self {
            path: path.to_string(),
            kind: ViolationKind::TypeMismatch,
            message: format!(
                "{subject} has differing type to schema: expected {expected}, found {}",
                json_type_name(actual)
            ),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", pointer::display(&self.path), self.message)
    }
}

/// Ordered collection of violations. Exact repeats are recorded once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// Messages in order, for callers that only report text.
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    pub(crate) fn push(&mut self, violation: Violation) {
        if !self.violations.contains(&violation) {
            self.violations.push(violation);
        }
    }

    pub(crate) fn merge(&mut self, other: ValidationViolations) {
        for v in other.violations {
            self.push(v);
        }
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// JSON type name of a document value, for messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The discriminator a document claims for itself, if any. An empty
/// string or `null` counts as no claim.
fn claimed_type(document: &Value) -> Option<String> {
    match document.get(DISCRIMINATOR_FIELD)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl SchemaEngine {
    /// Validate `document` against the type whose discriminator is
    /// `type_name`.
    ///
    /// # Errors
    ///
    /// - `EngineError::UnknownType` if no type carries `type_name`, or a
    ///   reference resolves to a missing type.
    /// - `EngineError::TypeIdentityMismatch` if the document declares a
    ///   different `type`. No field is checked in that case.
    /// - `EngineError::Validation` with every violation found.
    /// - `EngineError::SchemaCycle` if recursion exceeds the configured depth.
    pub fn validate(&self, type_name: &str, document: &Value) -> Result<(), EngineError> {
        let definition = self.lookup(type_name)?;
        self.validate_definition(definition, document)
    }

    pub(crate) fn validate_definition(
        &self,
        definition: &TypeDefinition,
        document: &Value,
    ) -> Result<(), EngineError> {
        let label = definition.discriminator().unwrap_or(definition.name());
        tracing::debug!(type_name = label, "validating document");

        if let (Some(expected), Some(actual)) = (definition.discriminator(), claimed_type(document)) {
            if actual != expected {
                return Err(EngineError::TypeIdentityMismatch {
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        let violations = match document.as_object() {
            Some(fields) => self.validate_node(fields, definition.node(), "", 0)?,
            None => {
                let mut v = ValidationViolations::default();
                v.push(Violation::type_mismatch("", None, "object", document));
                v
            }
        };

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(type_name = label, violations = violations.len(), "document rejected");
            Err(EngineError::Validation {
                type_name: label.to_string(),
                violations,
            })
        }
    }

    fn validate_node(
        &self,
        document: &Map<String, Value>,
        node: &TypeNode,
        path: &str,
        depth: usize,
    ) -> Result<ValidationViolations, EngineError> {
        self.enter(depth, || pointer::display(path).to_string())?;

        let doc_type = document.get(DISCRIMINATOR_FIELD).and_then(Value::as_str);
        let mut violations = ValidationViolations::default();

        for field in node.fields() {
            let field_path = pointer::child(path, field.name());

            let Some(value) = document.get(field.name()) else {
                if field.is_required() {
                    violations.push(Violation::missing_property(field_path, doc_type, field.name()));
                }
                continue;
            };

            match field.spec() {
                FieldSpec::Primitive { kind, .. } => {
                    if !kind.matches(value) {
                        violations.push(Violation::type_mismatch(
                            &field_path,
                            Some(field.name()),
                            kind.as_str(),
                            value,
                        ));
                    }
                }
                FieldSpec::Embedded(inner) => match value.as_object() {
                    Some(sub) => violations.merge(self.validate_node(sub, inner, &field_path, depth + 1)?),
                    None => violations.push(Violation::type_mismatch(
                        &field_path,
                        Some(field.name()),
                        "object",
                        value,
                    )),
                },
                FieldSpec::SingleRef(allowed) => {
                    // An empty reference is always acceptable.
                    if !value.is_null() {
                        violations.merge(self.validate_reference(
                            value,
                            allowed,
                            field.name(),
                            &field_path,
                            depth,
                        )?);
                    }
                }
                FieldSpec::ListRef(allowed) => match value.as_array() {
                    Some(items) => {
                        for (i, item) in items.iter().enumerate() {
                            violations.merge(self.validate_reference(
                                item,
                                allowed,
                                field.name(),
                                &pointer::index(&field_path, i),
                                depth,
                            )?);
                        }
                    }
                    None => violations.push(Violation::type_mismatch(
                        &field_path,
                        Some(field.name()),
                        "array",
                        value,
                    )),
                },
            }
        }

        Ok(violations)
    }

    /// Check one referenced sub-document: its discriminator must be allowed,
    /// then its contents are validated against the type it names.
    fn validate_reference(
        &self,
        value: &Value,
        allowed: &AllowedTypes,
        field: &str,
        path: &str,
        depth: usize,
    ) -> Result<ValidationViolations, EngineError> {
        let mut violations = ValidationViolations::default();

        let Some(sub) = value.as_object() else {
            violations.push(Violation::type_mismatch(path, Some(field), "sub-document", value));
            return Ok(violations);
        };

        let discriminator = sub.get(DISCRIMINATOR_FIELD).and_then(Value::as_str);
        match discriminator {
            Some(d) if allowed.contains(d) => {
                let target = self.lookup(d)?;
                violations.merge(self.validate_node(sub, target.node(), path, depth + 1)?);
            }
            _ => violations.push(Violation::disallowed_sub_type(path, field, allowed, discriminator)),
        }

        Ok(violations)
    }
}
