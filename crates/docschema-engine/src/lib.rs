//! # docschema-engine: Schema Engine
//!
//! Derives three operations for every type declared in a
//! [`docschema_core::Schema`]:
//!
//! - [`SchemaEngine::materialize`]: a default-populated document, with
//!   optional deep-merged overrides and optional sub-document expansion.
//! - [`SchemaEngine::validate`]: structural conformance, reporting *every*
//!   violation in one [`EngineError::Validation`].
//! - [`SchemaEngine::sanitize`]: a copy with private fields removed.
//!
//! All three walk the schema tree and the document tree in lockstep and
//! resolve polymorphic references through [`SchemaEngine::resolve_by_type`]
//! semantics: a sub-document is interpreted by the type its `type`
//! discriminator names.
//!
//! ## Host Integration
//!
//! An embedding host (e.g. a database write hook) authorizes the write
//! itself and then calls [`SchemaEngine::validate_document`], which picks the
//! type from the document's own discriminator and refuses types from the
//! sub-document category.
//!
//! ## Crate Policy
//!
//! - Pure, synchronous, in-memory. No IO.
//! - Never mutates the schema; every result is a fresh allocation.
//! - Recursion is bounded by [`EngineConfig::max_depth`].

pub mod config;
pub mod engine;
pub mod error;
pub mod materialize;
mod pointer;
pub mod sanitize;
pub mod typed;
pub mod validate;

pub use config::{EngineConfig, DEFAULT_MAX_DEPTH};
pub use engine::SchemaEngine;
pub use error::EngineError;
pub use materialize::MaterializeOptions;
pub use typed::TypedOps;
pub use validate::{ValidationViolations, Violation, ViolationKind};
