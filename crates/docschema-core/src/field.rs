//! # Field Descriptors
//!
//! A [`FieldDescriptor`] is one entry of a [`TypeNode`]: the plain document
//! field name, its visibility, whether it is required, and a [`FieldSpec`]
//! describing what the field holds.

use std::fmt;

use chrono::DateTime;
use serde_json::Value;

use crate::node::TypeNode;

/// Whether a field survives sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Exposed in sanitized output.
    #[default]
    Public,
    /// Stripped from sanitized output. Still required and validated.
    Private,
}

/// Primitive kind declared by an exemplar value.
///
/// Validation compares kinds, never values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Array,
    /// An RFC 3339 timestamp carried as a JSON string.
    Date,
    /// Untyped slot: a `null` or object exemplar. Accepts `null`, objects
    /// and arrays.
    Null,
}

impl PrimitiveKind {
    /// Infer the declared kind from an exemplar value.
    pub fn of(exemplar: &Value) -> Self {
        match exemplar {
            Value::String(s) if is_timestamp(s) => Self::Date,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Array(_) => Self::Array,
            Value::Null | Value::Object(_) => Self::Null,
        }
    }

    /// Returns true if `value` has this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Date => value.as_str().is_some_and(is_timestamp),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Null => value.is_null() || value.is_object() || value.is_array(),
        }
    }

    /// Lowercase name used in violation messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Date => "date",
            Self::Null => "object",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_timestamp(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
}

/// The set of type discriminators a polymorphic reference accepts.
///
/// Order is declaration order; duplicates are dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllowedTypes(Vec<String>);

impl AllowedTypes {
    /// Build an allowed set from discriminators, dropping repeats.
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for t in types {
            let t = t.into();
            if !out.contains(&t) {
                out.push(t);
            }
        }
        Self(out)
    }

    pub fn contains(&self, discriminator: &str) -> bool {
        self.0.iter().any(|t| t == discriminator)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sole alternative, if exactly one type is allowed.
    pub fn single(&self) -> Option<&str> {
        match self.0.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

/// Renders in marker notation, e.g. `@subdoc1,@subdoc2`.
impl fmt::Display for AllowedTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "@{t}")?;
        }
        Ok(())
    }
}

/// What a field holds.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    /// A literal exemplar whose kind is the declared type.
    Primitive { kind: PrimitiveKind, exemplar: Value },
    /// A nested structure with no type name of its own.
    Embedded(TypeNode),
    /// One sub-document whose discriminator is one of the alternatives.
    SingleRef(AllowedTypes),
    /// A sequence of sub-documents, each matched independently.
    ListRef(AllowedTypes),
}

impl FieldSpec {
    /// Primitive field with the kind inferred from `exemplar`.
    pub fn primitive(exemplar: impl Into<Value>) -> Self {
        let exemplar = exemplar.into();
        Self::Primitive {
            kind: PrimitiveKind::of(&exemplar),
            exemplar,
        }
    }

    pub fn embedded(node: TypeNode) -> Self {
        Self::Embedded(node)
    }

    pub fn single_ref<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::SingleRef(AllowedTypes::new(types))
    }

    pub fn list_ref<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ListRef(AllowedTypes::new(types))
    }

    /// The allowed set, for either reference variant.
    pub fn allowed_types(&self) -> Option<&AllowedTypes> {
        match self {
            Self::SingleRef(allowed) | Self::ListRef(allowed) => Some(allowed),
            _ => None,
        }
    }
}

/// One declared field of a type node.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    visibility: Visibility,
    required: bool,
    spec: FieldSpec,
}

impl FieldDescriptor {
    /// A public, required field.
    pub fn new(name: impl Into<String>, spec: FieldSpec) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            required: true,
            spec,
        }
    }

    /// Mark the field private.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// The plain document field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_optional(&self) -> bool {
        !self.required
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }
}
