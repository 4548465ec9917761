//! # Document Input and Output
//!
//! Documents are read as YAML (`.yaml`/`.yml`) or JSON (anything else) and
//! always written as pretty-printed JSON.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read a JSON or YAML document, choosing the format by extension.
pub fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML: {}", path.display())),
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON: {}", path.display())),
    }
}

/// Pretty-print a value to `out`, followed by a newline.
pub fn write_json(out: &mut impl Write, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}
