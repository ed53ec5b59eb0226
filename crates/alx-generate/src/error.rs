//! Error types for generation

use std::path::PathBuf;

/// Errors that stop a generation run
///
/// Soft problems (unparseable prototype, missing command) never end up here;
/// they fall back to placeholder content.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Nothing was scraped; refuse to generate anything
    #[error("project schema is empty, nothing to generate")]
    EmptyProject,

    /// A declared path would land outside the project root
    #[error("refusing to write outside the project root: {path}")]
    UnsafePath {
        /// Path as declared
        path: PathBuf,
    },

    /// Filesystem error
    #[error("io error at {path}: {source}")]
    Io {
        /// File being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for generation
pub type GenerateResult<T> = Result<T, GenerateError>;
