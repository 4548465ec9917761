//! # Named Access
//!
//! [`TypedOps`] binds the three derived operations to one declared type so
//! application code can write `engine.named("ExampleDoc")?.validate(&doc)`
//! instead of threading discriminators around.

use docschema_core::TypeDefinition;
use serde_json::Value;

use crate::engine::SchemaEngine;
use crate::error::EngineError;
use crate::materialize::MaterializeOptions;

/// Operations bound to a single declared type.
#[derive(Debug, Clone, Copy)]
pub struct TypedOps<'a> {
    engine: &'a SchemaEngine,
    definition: &'a TypeDefinition,
}

impl<'a> TypedOps<'a> {
    pub(crate) fn new(engine: &'a SchemaEngine, definition: &'a TypeDefinition) -> Self {
        Self { engine, definition }
    }

    /// Declared type name.
    pub fn name(&self) -> &'a str {
        self.definition.name()
    }

    pub fn discriminator(&self) -> Option<&'a str> {
        self.definition.discriminator()
    }

    pub fn definition(&self) -> &'a TypeDefinition {
        self.definition
    }

    /// Default document, with `overrides` merged on top.
    pub fn get(&self, overrides: Option<&Value>, options: MaterializeOptions) -> Result<Value, EngineError> {
        self.engine
            .materialize_definition(self.definition, overrides, options)
    }

    pub fn validate(&self, document: &Value) -> Result<(), EngineError> {
        self.engine.validate_definition(self.definition, document)
    }

    pub fn sanitize(&self, document: &Value) -> Result<Value, EngineError> {
        self.engine.sanitize_definition(self.definition, document)
    }
}
