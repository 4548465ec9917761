//! # Engine Configuration

use docschema_core::SUB_DOCUMENT_CATEGORY;
use serde::Deserialize;

/// Default recursion limit for materialize, validate and sanitize.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Tunables fixed at engine construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting of embedded nodes and resolved references before an
    /// operation fails with `SchemaCycle`.
    pub max_depth: usize,
    /// Category whose types may only be reached through references.
    pub sub_document_category: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            sub_document_category: SUB_DOCUMENT_CATEGORY.to_string(),
        }
    }
}
