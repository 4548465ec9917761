//! # docschema CLI entry point
//!
//! Parses command-line arguments, loads the schema once and dispatches to
//! the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docschema_cli::get::{run_get, GetArgs};
use docschema_cli::inspect::{run_check, run_types, CheckArgs, TypesArgs};
use docschema_cli::sanitize::{run_sanitize, SanitizeArgs};
use docschema_cli::validate::{run_validate, ValidateArgs};
use docschema_cli::{build_engine, load_config};

/// docschema: schema-driven document defaults, validation and sanitizing.
#[derive(Parser, Debug)]
#[command(name = "docschema", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Schema file (JSON, or YAML by extension).
    #[arg(long, global = true, default_value = "schema.json")]
    schema: PathBuf,

    /// Engine configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the recursion limit from the configuration.
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Override the sub-document category from the configuration.
    #[arg(long, global = true)]
    sub_document_category: Option<String>,

    /// Emit log events as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the types declared by the schema.
    Types(TypesArgs),

    /// Audit the schema for dangling references and discriminator clashes.
    Check(CheckArgs),

    /// Print a default document of a type.
    Get(GetArgs),

    /// Validate a document, reporting every violation.
    Validate(ValidateArgs),

    /// Print a document with private fields removed.
    Sanitize(SanitizeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(schema = %cli.schema.display(), "docschema starting");

    let result = load_config(cli.config.as_deref())
        .map(|mut config| {
            if let Some(depth) = cli.max_depth {
                config.max_depth = depth;
            }
            if let Some(category) = cli.sub_document_category.clone() {
                config.sub_document_category = category;
            }
            config
        })
        .and_then(|config| build_engine(&cli.schema, config))
        .and_then(|engine| match &cli.command {
            Commands::Types(args) => run_types(args, &engine),
            Commands::Check(args) => run_check(args, &engine),
            Commands::Get(args) => run_get(args, &engine),
            Commands::Validate(args) => run_validate(args, &engine),
            Commands::Sanitize(args) => run_sanitize(args, &engine),
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
