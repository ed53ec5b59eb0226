//! Error types for normalization

use alx_schema::SchemaError;
use std::path::PathBuf;

/// Errors raised while loading raw feeds or producing the canonical schema
///
/// Malformed *content* (missing fields, odd markup) is never an error here;
/// only an unreadable or structurally wrong feed is.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// Feed could not be read
    #[error("io error at {path}: {source}")]
    Io {
        /// Feed path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Feed is not valid JSON or does not look like a field bag
    #[error("invalid feed: {0}")]
    Json(#[from] serde_json::Error),

    /// Feed is a JSON array with no items
    #[error("feed contains no project items")]
    EmptyFeed,

    /// Feed top level is neither an object nor an array of objects
    #[error("invalid feed: expected a project object or an array of them, found {found}")]
    UnexpectedFeedShape {
        /// JSON type found at the top level
        found: &'static str,
    },

    /// Canonicalization or validation failed
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl NormalizeError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for normalization
pub type NormalizeResult<T> = Result<T, NormalizeError>;
