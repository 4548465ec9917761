//! # Sanitize Subcommand
//!
//! Prints a document with every private field removed, at any depth.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use docschema_engine::SchemaEngine;
use serde_json::Value;

use crate::input::{read_document, write_json};
use crate::resolve_type;

/// Arguments for the `sanitize` subcommand.
#[derive(Args, Debug)]
pub struct SanitizeArgs {
    /// Type name or discriminator.
    pub type_name: String,

    /// Document to sanitize (JSON or YAML).
    pub file: PathBuf,
}

/// Build the sanitized document.
pub fn sanitize_file(args: &SanitizeArgs, engine: &SchemaEngine) -> Result<Value> {
    let ops = resolve_type(engine, &args.type_name)?;
    let doc = read_document(&args.file)?;
    Ok(ops.sanitize(&doc)?)
}

/// Execute the `sanitize` subcommand.
pub fn run_sanitize(args: &SanitizeArgs, engine: &SchemaEngine) -> Result<u8> {
    let clean = sanitize_file(args, engine)?;
    write_json(&mut std::io::stdout().lock(), &clean)?;
    Ok(0)
}
