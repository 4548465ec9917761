//! # Schema Engine
//!
//! [`SchemaEngine`] owns a loaded [`Schema`] and exposes the derived
//! operations. The operations themselves live in their own modules
//! ([`crate::materialize`], [`crate::validate`], [`crate::sanitize`]) as
//! `impl SchemaEngine` blocks; this module holds construction, lookups and
//! the host-facing entry point.
//!
//! ## Thread Safety
//!
//! `SchemaEngine` is `Send + Sync` and immutable after construction. Every
//! operation borrows it and allocates fresh result trees, so one instance
//! can be shared freely.

use std::collections::HashMap;

use docschema_core::{Schema, TypeDefinition, TypeNode, DISCRIMINATOR_FIELD};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::typed::TypedOps;

/// The schema interpretation engine.
#[derive(Debug, Clone)]
pub struct SchemaEngine {
    schema: Schema,
    config: EngineConfig,
    /// Discriminator → index into `schema.definitions()`. First declaration
    /// wins on collision.
    by_discriminator: HashMap<String, usize>,
}

impl SchemaEngine {
    /// Build an engine with default configuration.
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, EngineConfig::default())
    }

    /// Build an engine. Integrity problems in the schema are logged, not
    /// rejected; operations touching the affected types fail when called.
    pub fn with_config(schema: Schema, config: EngineConfig) -> Self {
        let mut by_discriminator = HashMap::new();
        for (i, def) in schema.definitions().iter().enumerate() {
            if let Some(disc) = def.discriminator() {
                by_discriminator.entry(disc.to_string()).or_insert(i);
            }
        }

        for issue in schema.integrity_report() {
            tracing::warn!(%issue, "schema integrity issue");
        }

        tracing::debug!(
            types = schema.len(),
            categories = schema.categories().len(),
            max_depth = config.max_depth,
            "schema engine constructed"
        );

        Self {
            schema,
            config,
            by_discriminator,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Declared type names (`ExampleDoc`, ...) in schema order.
    pub fn type_names(&self) -> Vec<&str> {
        self.schema.definitions().iter().map(|d| d.name()).collect()
    }

    /// Look up a definition by discriminator.
    pub(crate) fn lookup(&self, discriminator: &str) -> Result<&TypeDefinition, EngineError> {
        self.by_discriminator
            .get(discriminator)
            .and_then(|&i| self.schema.definitions().get(i))
            .ok_or_else(|| EngineError::UnknownType(discriminator.to_string()))
    }

    /// Return a deep copy of the node whose discriminator is
    /// `discriminator`. Mutating the copy never touches the schema.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownType` if no type carries it.
    pub fn resolve_by_type(&self, discriminator: &str) -> Result<TypeNode, EngineError> {
        Ok(self.lookup(discriminator)?.node().clone())
    }

    /// Bind the operations to one declared type name.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownType` if no type is declared under `name`.
    pub fn named(&self, name: &str) -> Result<TypedOps<'_>, EngineError> {
        let definition = self
            .schema
            .get(name)
            .ok_or_else(|| EngineError::UnknownType(name.to_string()))?;
        Ok(TypedOps::new(self, definition))
    }

    /// True if the definition sits in the sub-document category.
    pub fn is_sub_document(&self, definition: &TypeDefinition) -> bool {
        definition.category() == self.config.sub_document_category
    }

    /// Validate a top-level document against the type its own discriminator
    /// names. This is the entry point an embedding host calls after it has
    /// authorized the write.
    ///
    /// # Errors
    ///
    /// - `EngineError::MissingDiscriminator` if the document has no `type`.
    /// - `EngineError::UnknownType` if no type carries the discriminator.
    /// - `EngineError::SubDocumentInsert` if the type may only appear as a
    ///   referenced sub-document.
    /// - Any error of [`SchemaEngine::validate`].
    pub fn validate_document(&self, document: &Value) -> Result<(), EngineError> {
        let discriminator = document
            .get(DISCRIMINATOR_FIELD)
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| EngineError::MissingDiscriminator {
                path: String::new(),
            })?;

        let definition = self.lookup(discriminator)?;
        if self.is_sub_document(definition) {
            return Err(EngineError::SubDocumentInsert {
                type_name: discriminator.to_string(),
            });
        }

        self.validate_definition(definition, document)
    }

    /// Guard every recursive step against schemas that reference themselves.
    pub(crate) fn enter(&self, depth: usize, at: impl FnOnce() -> String) -> Result<(), EngineError> {
        if depth > self.config.max_depth {
            return Err(EngineError::SchemaCycle {
                depth: self.config.max_depth,
                at: at(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{example_engine, valid_example, valid_subdoc1};
    use serde_json::json;

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaEngine>();
    }

    #[test]
    fn type_names_in_schema_order() {
        let engine = example_engine();
        assert_eq!(engine.type_names(), vec!["ExampleDoc", "SubDoc1", "SubDoc2"]);
    }

    #[test]
    fn resolve_by_type_returns_copy() {
        let engine = example_engine();
        let node = engine.resolve_by_type("subdoc1").unwrap();
        assert_eq!(node.discriminator(), Some("subdoc1"));
        let grown = node.with_field(docschema_core::FieldDescriptor::new(
            "extra",
            docschema_core::FieldSpec::primitive(true),
        ));
        assert_ne!(
            grown.len(),
            engine.schema().find_by_discriminator("subdoc1").unwrap().node().len()
        );
    }

    #[test]
    fn resolve_unknown_type() {
        let engine = example_engine();
        assert!(matches!(
            engine.resolve_by_type("nope"),
            Err(EngineError::UnknownType(_))
        ));
    }

    #[test]
    fn named_lookup_uses_declared_name() {
        let engine = example_engine();
        assert!(engine.named("ExampleDoc").is_ok());
        assert!(matches!(
            engine.named("example"),
            Err(EngineError::UnknownType(_))
        ));
    }

    #[test]
    fn host_entry_validates_by_own_discriminator() {
        let engine = example_engine();
        engine.validate_document(&valid_example()).unwrap();

        let mut bad = valid_example();
        bad.as_object_mut().unwrap().remove("name");
        assert!(matches!(
            engine.validate_document(&bad),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn host_entry_rejects_sub_document_insert() {
        let engine = example_engine();
        let err = engine.validate_document(&valid_subdoc1()).unwrap_err();
        assert!(matches!(err, EngineError::SubDocumentInsert { ref type_name } if type_name == "subdoc1"));
    }

    #[test]
    fn host_entry_rejects_unknown_or_missing_discriminator() {
        let engine = example_engine();
        assert!(matches!(
            engine.validate_document(&json!({"type": "ghost"})),
            Err(EngineError::UnknownType(_))
        ));
        let err = engine.validate_document(&json!({"name": "x"})).unwrap_err();
        assert!(matches!(err, EngineError::MissingDiscriminator { .. }));
        assert!(err.to_string().contains("(root)"));
    }

    #[test]
    fn sub_document_category_is_configurable() {
        let engine = SchemaEngine::with_config(
            example_engine().schema().clone(),
            EngineConfig {
                sub_document_category: "Nothing".into(),
                ..EngineConfig::default()
            },
        );
        let mut doc = valid_subdoc1();
        doc["subdoc"] = Value::Null;
        engine.validate_document(&doc).unwrap();
    }
}
