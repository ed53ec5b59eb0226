//! Task schema
//!
//! One [`TaskSchema`] per task panel of the project page, in page order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A test fixture embedded in a task description (`$ cat 0-main.c` blocks)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TestFileSpec {
    /// File name as shown after `cat`
    #[serde(default)]
    pub filename: String,
    /// Lines of the file, never trimmed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<String>,
}

impl TestFileSpec {
    /// Create a test file entry
    #[must_use]
    pub fn new(filename: impl Into<String>, content: Vec<String>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

/// Canonical description of one task
///
/// Empty values are never represented: every field that would be empty is
/// omitted from the serialized form, and deserializes back to its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskSchema {
    /// Task kind label (e.g. "mandatory", "advanced")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Task title (e.g. "0. Preprocessor")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Cleaned markdown lines of the task body
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,

    /// Directory declared by the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Repository declared by the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repository: Option<String>,

    /// Relative paths the task asks for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// Raw function signatures, trailing `;` optional
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prototypes: Vec<String>,

    /// Test fixtures extracted from the description
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_files: Vec<TestFileSpec>,

    /// `gcc` invocation(s) from the description, joined with ` && `
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation_command: Option<String>,
}

impl TaskSchema {
    /// Create a task with just a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Declared directory, if non-empty
    #[inline]
    #[must_use]
    pub fn directory(&self) -> Option<&str> {
        self.directory.as_deref().filter(|d| !d.is_empty())
    }

    /// Declared repository, if non-empty
    #[inline]
    #[must_use]
    pub fn github_repository(&self) -> Option<&str> {
        self.github_repository.as_deref().filter(|r| !r.is_empty())
    }

    /// Compilation command, if any
    #[inline]
    #[must_use]
    pub fn compilation_command(&self) -> Option<&str> {
        self.compilation_command.as_deref().filter(|c| !c.is_empty())
    }

    /// Task files with a `.c` extension
    pub fn c_files(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .map(String::as_str)
            .filter(|f| Path::new(f).extension().is_some_and(|e| e == "c"))
    }

    /// Names of the embedded test files
    pub fn test_file_names(&self) -> impl Iterator<Item = &str> {
        self.test_files
            .iter()
            .map(|t| t.filename.as_str())
            .filter(|name| !name.is_empty())
    }
}
