//! # docschema-cli: Command-Line Interface
//!
//! Thin front end over `docschema-engine` for schema authors and CI jobs.
//!
//! ## Subcommands
//!
//! - `docschema types`: list declared types with category and discriminator.
//! - `docschema check`: audit the schema for dangling references and
//!   discriminator collisions.
//! - `docschema get`: print a default document of a type.
//! - `docschema validate`: validate a document, reporting every violation.
//! - `docschema sanitize`: print a document with private fields removed.
//!
//! ```bash
//! docschema --schema schemas/example-schema.json get ExampleDoc --include-sub-types
//! docschema --schema schemas/example-schema.json validate doc.json
//! docschema --schema schemas/example-schema.json sanitize example doc.yaml
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the engine; no schema logic here.
//! - Handlers return a process exit code; `0` success, `1` rejected input.
//!   Load and IO failures surface as errors and exit with `2`.

pub mod get;
pub mod input;
pub mod inspect;
pub mod sanitize;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use docschema_core::Schema;
use docschema_engine::{EngineConfig, SchemaEngine, TypedOps};

/// Load the schema file and build an engine over it.
pub fn build_engine(schema_path: &Path, config: EngineConfig) -> Result<SchemaEngine> {
    let schema = Schema::from_path(schema_path)
        .with_context(|| format!("failed to load schema: {}", schema_path.display()))?;
    tracing::debug!(path = %schema_path.display(), types = schema.len(), "schema loaded");
    Ok(SchemaEngine::with_config(schema, config))
}

/// Read engine settings from a YAML file, or use the defaults when no file
/// is given. Keys absent from the file keep their default values.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config: {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("invalid config: {}", path.display()))
}

/// Resolve a type given either its declared name (`ExampleDoc`) or its
/// discriminator (`example`).
pub fn resolve_type<'a>(engine: &'a SchemaEngine, key: &str) -> Result<TypedOps<'a>> {
    if let Ok(ops) = engine.named(key) {
        return Ok(ops);
    }
    let definition = engine
        .schema()
        .find_by_discriminator(key)
        .with_context(|| {
            format!(
                "unknown type '{key}'. Available: {}",
                engine.type_names().join(", ")
            )
        })?;
    Ok(engine.named(definition.name())?)
}
