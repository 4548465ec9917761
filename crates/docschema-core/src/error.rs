//! # Error Types
//!
//! Errors raised while decoding, loading or querying a schema. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Error in the schema model.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// No type node carries the requested discriminator.
    #[error("no document of type '{0}' is contained in the schema")]
    UnknownType(String),

    /// A reference marker could not be decoded into a set of type names.
    #[error("malformed reference marker '{marker}' at '{path}'")]
    MalformedReference {
        /// Slash-separated location of the field within the schema source.
        path: String,
        /// The raw marker text.
        marker: String,
    },

    /// The schema source does not have the category → type → node shape.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The schema file could not be parsed.
    #[error("schema load error for '{path}': {reason}")]
    Load {
        /// Path of the schema file.
        path: String,
        /// Reason the file could not be parsed.
        reason: String,
    },

    /// IO error reading a schema file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
