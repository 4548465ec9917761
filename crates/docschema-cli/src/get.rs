//! # Get Subcommand
//!
//! Prints a default-populated document of a type, optionally with overrides
//! deep-merged on top.
//!
//! ```bash
//! docschema get ExampleDoc --include-sub-types
//! docschema get example --overrides name.json --omit-optional
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use docschema_engine::{MaterializeOptions, SchemaEngine};
use serde_json::Value;

use crate::input::{read_document, write_json};
use crate::resolve_type;

/// Arguments for the `get` subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Type name or discriminator.
    pub type_name: String,

    /// JSON or YAML file deep-merged onto the defaults.
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// Build referenced sub-documents instead of leaving them null.
    #[arg(long)]
    pub include_sub_types: bool,

    /// Leave optional fields out of the result.
    #[arg(long)]
    pub omit_optional: bool,
}

impl GetArgs {
    fn options(&self) -> MaterializeOptions {
        MaterializeOptions {
            include_sub_types: self.include_sub_types,
            include_optional: !self.omit_optional,
        }
    }
}

/// Build the document `get` would print.
pub fn materialize_for(args: &GetArgs, engine: &SchemaEngine) -> Result<Value> {
    let ops = resolve_type(engine, &args.type_name)?;
    let overrides = args.overrides.as_deref().map(read_document).transpose()?;
    let doc = ops.get(overrides.as_ref(), args.options())?;
    tracing::debug!(type_name = ops.name(), "materialized document");
    Ok(doc)
}

/// Execute the `get` subcommand.
pub fn run_get(args: &GetArgs, engine: &SchemaEngine) -> Result<u8> {
    let doc = materialize_for(args, engine)?;
    write_json(&mut std::io::stdout().lock(), &doc)?;
    Ok(0)
}
