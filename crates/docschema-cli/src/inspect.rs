//! # Schema Inspection
//!
//! `types` lists what the schema declares; `check` audits it for problems
//! the engine tolerates at load time but a schema author should fix.

use anyhow::Result;
use clap::Args;
use docschema_engine::SchemaEngine;

/// Arguments for the `types` subcommand.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Only list types in this category.
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Treat an empty schema as a failure.
    #[arg(long)]
    pub require_types: bool,
}

/// One row of the `types` listing: name, category, discriminator.
pub fn type_rows(args: &TypesArgs, engine: &SchemaEngine) -> Vec<(String, String, String)> {
    engine
        .schema()
        .definitions()
        .iter()
        .filter(|d| args.category.as_deref().map_or(true, |c| d.category() == c))
        .map(|d| {
            let kind = if engine.is_sub_document(d) { "sub" } else { "doc" };
            (
                d.name().to_string(),
                format!("{} ({kind})", d.category()),
                d.discriminator().unwrap_or("-").to_string(),
            )
        })
        .collect()
}

/// Execute the `types` subcommand.
pub fn run_types(args: &TypesArgs, engine: &SchemaEngine) -> Result<u8> {
    let rows = type_rows(args, engine);
    if rows.is_empty() {
        println!("No types declared.");
        return Ok(0);
    }
    let width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    for (name, category, discriminator) in rows {
        println!("  {name:<width$}  {discriminator:<12}  {category}");
    }
    Ok(0)
}

/// Execute the `check` subcommand.
pub fn run_check(args: &CheckArgs, engine: &SchemaEngine) -> Result<u8> {
    let schema = engine.schema();
    if args.require_types && schema.is_empty() {
        println!("FAIL: schema declares no types");
        return Ok(1);
    }

    let issues = schema.integrity_report();
    if issues.is_empty() {
        println!(
            "OK: {} type(s) across {} categor{}",
            schema.len(),
            schema.categories().len(),
            if schema.categories().len() == 1 { "y" } else { "ies" }
        );
        return Ok(0);
    }

    println!("FAIL: {} issue(s)", issues.len());
    for issue in &issues {
        println!("  {issue}");
    }
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::example_engine;
    use docschema_core::{FieldDescriptor, FieldSpec, Schema, TypeNode};

    #[test]
    fn lists_all_types_with_discriminators() {
        let engine = example_engine();
        let rows = type_rows(&TypesArgs { category: None }, &engine);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0, "ExampleDoc");
        assert_eq!(rows[0].2, "example");
        assert!(rows[1].1.contains("(sub)"));
        assert_eq!(run_types(&TypesArgs { category: None }, &engine).unwrap(), 0);
    }

    #[test]
    fn category_filter_applies() {
        let engine = example_engine();
        let args = TypesArgs {
            category: Some("SubDocSchemas".to_string()),
        };
        let names: Vec<_> = type_rows(&args, &engine).into_iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["SubDoc1", "SubDoc2"]);
    }

    #[test]
    fn clean_schema_passes_check() {
        let engine = example_engine();
        let args = CheckArgs { require_types: true };
        assert_eq!(run_check(&args, &engine).unwrap(), 0);
    }

    #[test]
    fn dangling_reference_fails_check() {
        let node = TypeNode::new(vec![
            FieldDescriptor::new("type", FieldSpec::primitive("a")),
            FieldDescriptor::new("child", FieldSpec::single_ref(["ghost"])),
        ]);
        let engine = SchemaEngine::new(Schema::new().with_type("DocSchemas", "A", node));
        let args = CheckArgs { require_types: false };
        assert_eq!(run_check(&args, &engine).unwrap(), 1);
    }

    #[test]
    fn empty_schema_fails_only_when_required() {
        let engine = SchemaEngine::new(Schema::new());
        assert_eq!(run_check(&CheckArgs { require_types: false }, &engine).unwrap(), 0);
        assert_eq!(run_check(&CheckArgs { require_types: true }, &engine).unwrap(), 1);
    }
}
