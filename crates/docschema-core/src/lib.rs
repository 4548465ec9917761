//! # docschema-core: Schema Model
//!
//! The leaf of the workspace. Holds the in-memory representation of a
//! document schema: an ordered mapping of *category* → *type name* →
//! [`TypeNode`], where every node is a list of typed [`FieldDescriptor`]s.
//!
//! ## Field Model
//!
//! Field modifiers and polymorphic references are explicit metadata, not
//! string sigils:
//!
//! - [`Visibility`]: `Public` or `Private` (stripped by sanitization).
//! - `required`: optional fields may be absent from a document.
//! - [`FieldSpec`]: `Primitive`, `Embedded`, `SingleRef` or `ListRef`.
//!
//! The schema *source* format still uses the marker convention (`$private`,
//! `~optional`, `"@type"` references). The [`legacy`] module decodes it once
//! at load time so no marker parsing happens on the validation path.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `docschema-*` crates.
//! - Construction does not validate well-formedness beyond what lookups
//!   need. Use [`Schema::integrity_report`] to audit a loaded schema.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod field;
pub mod legacy;
pub mod node;
pub mod schema;

// Re-export primary types for ergonomic imports.
pub use error::SchemaError;
pub use field::{AllowedTypes, FieldDescriptor, FieldSpec, PrimitiveKind, Visibility};
pub use node::{TypeNode, DISCRIMINATOR_FIELD};
pub use schema::{IntegrityIssue, Schema, TypeDefinition, SUB_DOCUMENT_CATEGORY};
