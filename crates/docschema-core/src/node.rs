//! # Type Nodes
//!
//! A [`TypeNode`] is an ordered list of field descriptors. Declaration order
//! is preserved so that materialized documents and violation lists follow
//! the order the schema author wrote.

use crate::field::{AllowedTypes, FieldDescriptor, FieldSpec, PrimitiveKind};

/// Name of the field carrying a document's type discriminator.
pub const DISCRIMINATOR_FIELD: &str = "type";

/// The declarative structure of one document type, or of an embedded
/// sub-structure within one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeNode {
    fields: Vec<FieldDescriptor>,
}

impl TypeNode {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// Append a field, returning the node for chaining.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The literal of this node's own `type` field, when it is a string
    /// primitive. This is the cross-reference key used for resolution.
    pub fn discriminator(&self) -> Option<&str> {
        match self.field(DISCRIMINATOR_FIELD)?.spec() {
            FieldSpec::Primitive {
                kind: PrimitiveKind::String,
                exemplar,
            } => exemplar.as_str(),
            _ => None,
        }
    }

    /// Every polymorphic reference in this node and its embedded nodes,
    /// paired with its slash-separated field path.
    pub fn references(&self) -> Vec<(String, &AllowedTypes)> {
        let mut out = Vec::new();
        self.collect_references("", &mut out);
        out
    }

    fn collect_references<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a AllowedTypes)>) {
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name().to_string()
            } else {
                format!("{prefix}/{}", field.name())
            };
            match field.spec() {
                FieldSpec::Embedded(inner) => inner.collect_references(&path, out),
                FieldSpec::SingleRef(allowed) | FieldSpec::ListRef(allowed) => {
                    out.push((path, allowed));
                }
                FieldSpec::Primitive { .. } => {}
            }
        }
    }
}
