//! Error types for the schema crate
//!
//! Covers (de)serialization of the canonical schema, persisted state I/O and
//! JSON-schema validation.

use std::path::PathBuf;

/// Errors raised while converting, validating or persisting project schemas
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Serialization or deserialization failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading or writing the state file
    #[error("io error at {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Instance does not conform to the project schema
    #[error("schema violation: {}", violations.join("; "))]
    Validation {
        /// One entry per violated constraint, prefixed by its JSON pointer
        violations: Vec<String>,
    },

    /// The generated JSON schema itself failed to compile
    #[error("invalid json schema: {0}")]
    InvalidSchema(String),

    /// Serialized state was not UTF-8
    #[error("state is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// No state file where one was expected
    #[error("no project state found at {0}")]
    MissingState(PathBuf),
}

impl SchemaError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
