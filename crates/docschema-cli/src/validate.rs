//! # Validate Subcommand
//!
//! Validates a document file and prints every violation found.
//!
//! Without `--type` the document's own `type` discriminator selects the
//! schema, and sub-document types are refused, as a host write hook would.
//! With `--type` the document must be of exactly that type.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use docschema_engine::{EngineError, SchemaEngine};

use crate::input::read_document;
use crate::resolve_type;

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document to validate (JSON or YAML).
    pub file: PathBuf,

    /// Validate as this type (name or discriminator) instead of the
    /// document's own discriminator.
    #[arg(long = "type")]
    pub type_name: Option<String>,
}

/// Validate the file; `Ok(Err(_))` is a rejected document.
pub fn check_file(args: &ValidateArgs, engine: &SchemaEngine) -> Result<Result<(), EngineError>> {
    let doc = read_document(&args.file)?;
    let outcome = match &args.type_name {
        Some(key) => resolve_type(engine, key)?.validate(&doc),
        None => engine.validate_document(&doc),
    };
    Ok(outcome)
}

/// Execute the `validate` subcommand.
pub fn run_validate(args: &ValidateArgs, engine: &SchemaEngine) -> Result<u8> {
    match check_file(args, engine)? {
        Ok(()) => {
            println!("OK: {}", args.file.display());
            Ok(0)
        }
        Err(EngineError::Validation { type_name, violations }) => {
            println!(
                "FAIL: {} ({} violation(s) for type '{type_name}')",
                args.file.display(),
                violations.len()
            );
            println!("{violations}");
            Ok(1)
        }
        Err(e) => {
            println!("FAIL: {}", args.file.display());
            println!("  {e}");
            Ok(1)
        }
    }
}
