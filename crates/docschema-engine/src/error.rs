//! # Engine Errors
//!
//! Two families of failure:
//!
//! - **Violations**: the document is well-formed input but does not conform.
//!   All of them are collected and returned together in
//!   [`EngineError::Validation`].
//! - **Structural errors**: the operation cannot proceed at all (unknown
//!   type, wrong top-level type, runaway recursion). These abort the call
//!   immediately.

use docschema_core::SchemaError;
use thiserror::Error;

use crate::pointer;
use crate::validate::ValidationViolations;

/// Error returned by engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A lookup or polymorphic reference names a type absent from the schema.
    #[error("no document of type '{0}' is contained in the schema")]
    UnknownType(String),

    /// The document does not conform. Carries every violation found.
    #[error("validation failed for type '{type_name}':\n{violations}")]
    Validation {
        /// Discriminator or name of the type validated against.
        type_name: String,
        /// Ordered list of violations.
        violations: ValidationViolations,
    },

    /// A type-specific validator was handed a document of another type.
    #[error("this document is of type '{actual}', however this validate method is for the type '{expected}'")]
    TypeIdentityMismatch {
        /// The validator's type.
        expected: String,
        /// The document's own discriminator.
        actual: String,
    },

    /// Recursion exceeded the configured depth, which means the schema
    /// references itself.
    #[error("recursion depth {depth} exceeded at '{at}'; the schema likely contains a reference cycle")]
    SchemaCycle {
        /// The configured limit.
        depth: usize,
        /// Type or document path where the limit was hit.
        at: String,
    },

    /// A sub-document or top-level document has no `type` discriminator
    /// where one is needed to pick its shape.
    #[error("document at '{}' has no 'type' discriminator", pointer::display(.path))]
    MissingDiscriminator {
        /// JSON Pointer to the document.
        path: String,
    },

    /// A document whose type belongs to the sub-document category was
    /// submitted as a top-level document.
    #[error("sub-documents may not be directly inserted (type '{type_name}')")]
    SubDocumentInsert {
        /// The sub-document type.
        type_name: String,
    },

    /// The top-level document, or the overrides merged onto one, is not a
    /// JSON object.
    #[error("document for type '{type_name}' is not an object")]
    NotAnObject {
        /// The type the document was submitted as.
        type_name: String,
    },

    /// Schema model error other than an unknown type.
    #[error("schema error: {0}")]
    Schema(SchemaError),
}

impl From<SchemaError> for EngineError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::UnknownType(name) => Self::UnknownType(name),
            other => Self::Schema(other),
        }
    }
}

impl EngineError {
    /// The violations of a [`EngineError::Validation`], if this is one.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::Validation { violations, .. } => Some(violations),
            _ => None,
        }
    }
}
