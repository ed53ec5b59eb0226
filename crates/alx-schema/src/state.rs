//! Persisted project state
//!
//! Every run records the canonical schema at `<root>/.alx/project.json` so a
//! tree can be regenerated (or inspected) without scraping again. The file is
//! pretty-printed with four-space indentation and keeps non-ASCII text as-is.

use crate::error::{SchemaError, SchemaResult};
use crate::project::ProjectSchema;
use crate::validation::validate_project;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Hidden directory holding the state file
pub const STATE_DIR: &str = ".alx";

/// State file name inside [`STATE_DIR`]
pub const STATE_FILE: &str = "project.json";

/// Reader/writer for the `.alx/project.json` record
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectState;

impl ProjectState {
    /// Location of the state file under a project root
    #[inline]
    #[must_use]
    pub fn path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(STATE_FILE)
    }

    /// Serialize a project the way it is persisted
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json_string(project: &ProjectSchema) -> SchemaResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        project.serialize(&mut serializer)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Write the state file, replacing any previous record
    ///
    /// # Errors
    /// - `SchemaError::Io` if the directory or file cannot be written
    /// - `SchemaError::Json` if serialization fails
    pub fn save(root: &Path, project: &ProjectSchema) -> SchemaResult<PathBuf> {
        let path = Self::path(root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SchemaError::io_error(parent, e))?;
        }

        let contents = Self::to_json_string(project)?;
        fs::write(&path, contents).map_err(|e| SchemaError::io_error(&path, e))?;

        tracing::debug!("saved project state to {}", path.display());
        Ok(path)
    }

    /// Load and validate the state file under a project root
    ///
    /// # Errors
    /// - `SchemaError::MissingState` if no state file exists
    /// - `SchemaError::Validation` if the record does not match the schema
    pub fn load(root: &Path) -> SchemaResult<ProjectSchema> {
        Self::load_file(&Self::path(root))
    }

    /// Load and validate a state file at an explicit path
    ///
    /// # Errors
    /// Same as [`ProjectState::load`]
    pub fn load_file(path: &Path) -> SchemaResult<ProjectSchema> {
        if !path.exists() {
            return Err(SchemaError::MissingState(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path).map_err(|e| SchemaError::io_error(path, e))?;
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        validate_project(&value)?;

        let project = serde_json::from_value(value)?;
        tracing::debug!("loaded project state from {}", path.display());
        Ok(project)
    }
}
