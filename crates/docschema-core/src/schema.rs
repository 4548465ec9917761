//! # Schema Container
//!
//! A [`Schema`] maps category → type name → [`TypeNode`]. It is built once,
//! either programmatically through [`Schema::insert`] or by decoding a
//! marker-annotated source document, and is read-only afterwards.
//!
//! Two keys identify a type:
//!
//! - its declared **name** (`ExampleDoc`), the key under its category, used
//!   for named access;
//! - its **discriminator** (`example`), the literal of its own `type` field,
//!   used to resolve polymorphic references and to match documents.
//!
//! Discriminators are meant to be unique across the whole schema. That is not
//! enforced here: lookups return the first match in declaration order and
//! [`Schema::integrity_report`] lists collisions.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::legacy;
use crate::node::TypeNode;

/// Default name of the category whose types may only appear as referenced
/// sub-documents.
pub const SUB_DOCUMENT_CATEGORY: &str = "SubDocSchemas";

/// One named type of the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    category: String,
    name: String,
    node: TypeNode,
}

impl TypeDefinition {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> &TypeNode {
        &self.node
    }

    pub fn discriminator(&self) -> Option<&str> {
        self.node.discriminator()
    }
}

/// The loaded schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Schema {
    definitions: Vec<TypeDefinition>,
}

impl TryFrom<Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type, or replace the node of an existing `(category, name)`.
    pub fn insert(&mut self, category: impl Into<String>, name: impl Into<String>, node: TypeNode) {
        let category = category.into();
        let name = name.into();
        if let Some(existing) = self
            .definitions
            .iter_mut()
            .find(|d| d.category == category && d.name == name)
        {
            existing.node = node;
            return;
        }
        self.definitions.push(TypeDefinition {
            category,
            name,
            node,
        });
    }

    /// Chaining form of [`Schema::insert`].
    pub fn with_type(mut self, category: impl Into<String>, name: impl Into<String>, node: TypeNode) -> Self {
        self.insert(category, name, node);
        self
    }

    /// Decode a marker-annotated schema source of the shape
    /// `{ category: { TypeName: { field: spec, ... } } }`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidSchema` if any level is not an object and
    /// `SchemaError::MalformedReference` for undecodable reference markers.
    pub fn from_value(source: &Value) -> Result<Self, SchemaError> {
        let categories = source
            .as_object()
            .ok_or_else(|| SchemaError::InvalidSchema("schema root must be an object".into()))?;

        let mut schema = Self::new();
        for (category, types) in categories {
            let types = types.as_object().ok_or_else(|| {
                SchemaError::InvalidSchema(format!("category '{category}' must be an object"))
            })?;
            for (name, node) in types {
                let node = node.as_object().ok_or_else(|| {
                    SchemaError::InvalidSchema(format!("type '{category}/{name}' must be an object"))
                })?;
                let node = legacy::decode_node(node, &format!("{category}/{name}"))?;
                schema.insert(category.as_str(), name.as_str(), node);
            }
        }
        Ok(schema)
    }

    /// Load a schema file. The format is chosen from the extension:
    /// `.yaml`/`.yml` for YAML, anything else is parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Io` if the file cannot be read and
    /// `SchemaError::Load` if it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let source: Value = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| SchemaError::Load {
                path: path.display().to_string(),
                reason: format!("invalid YAML: {e}"),
            })?,
            _ => serde_json::from_str(&content).map_err(|e| SchemaError::Load {
                path: path.display().to_string(),
                reason: format!("invalid JSON: {e}"),
            })?,
        };

        Self::from_value(&source)
    }

    pub fn definitions(&self) -> &[TypeDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Category names in declaration order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for d in &self.definitions {
            if !out.contains(&d.category.as_str()) {
                out.push(&d.category);
            }
        }
        out
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a TypeDefinition> + 'a {
        self.definitions.iter().filter(move |d| d.category == category)
    }

    /// Look up a type by its declared name (`ExampleDoc`).
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Look up a type by its discriminator (`example`).
    pub fn find_by_discriminator(&self, discriminator: &str) -> Option<&TypeDefinition> {
        self.definitions
            .iter()
            .find(|d| d.discriminator() == Some(discriminator))
    }

    /// Return a copy of the node whose discriminator equals `discriminator`.
    ///
    /// The copy is independent of the stored schema; callers may rewrite it
    /// freely.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownType` if no node carries the discriminator.
    pub fn resolve_by_type(&self, discriminator: &str) -> Result<TypeNode, SchemaError> {
        self.find_by_discriminator(discriminator)
            .map(|d| d.node.clone())
            .ok_or_else(|| SchemaError::UnknownType(discriminator.to_string()))
    }

    /// Audit the schema for problems that make some derived operations
    /// unusable: missing or colliding discriminators and references to
    /// types that do not exist.
    pub fn integrity_report(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        let mut seen: HashMap<&str, &str> = HashMap::new();

        for def in &self.definitions {
            match def.discriminator() {
                None => issues.push(IntegrityIssue::MissingDiscriminator {
                    type_name: def.name.clone(),
                }),
                Some(disc) => {
                    if let Some(first) = seen.get(disc) {
                        issues.push(IntegrityIssue::DuplicateDiscriminator {
                            discriminator: disc.to_string(),
                            first: (*first).to_string(),
                            second: def.name.clone(),
                        });
                    } else {
                        seen.insert(disc, &def.name);
                    }
                }
            }
        }

        for def in &self.definitions {
            for (field, allowed) in def.node.references() {
                for target in allowed.iter() {
                    if !seen.contains_key(target) {
                        issues.push(IntegrityIssue::DanglingReference {
                            type_name: def.name.clone(),
                            field: field.clone(),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }

        issues
    }
}

/// A problem found by [`Schema::integrity_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// The type has no string `type` field, so it cannot be referenced or
    /// matched by discriminator.
    MissingDiscriminator { type_name: String },
    /// Two types share a discriminator; the later one is unreachable.
    DuplicateDiscriminator {
        discriminator: String,
        first: String,
        second: String,
    },
    /// A reference names a discriminator no type carries.
    DanglingReference {
        type_name: String,
        field: String,
        target: String,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDiscriminator { type_name } => {
                write!(f, "type '{type_name}' has no string 'type' discriminator")
            }
            Self::DuplicateDiscriminator {
                discriminator,
                first,
                second,
            } => write!(
                f,
                "discriminator '{discriminator}' is declared by both '{first}' and '{second}'"
            ),
            Self::DanglingReference {
                type_name,
                field,
                target,
            } => write!(
                f,
                "field '{field}' of type '{type_name}' references unknown type '{target}'"
            ),
        }
    }
}
