//! Per-language stub generators
//!
//! A closed set of languages dispatched on file extension. Adding one means
//! a new variant, its extensions and a generator module.

use alx_schema::{ProjectSchema, TaskSchema};
use std::path::Path;

mod bash;
mod c;
mod javascript;
mod python;

pub use c::{parse_prototype, PrototypeDoc};

/// Project-wide values the generators may read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectContext<'a> {
    /// Declared header file, if any
    pub header: Option<&'a str>,
}

impl<'a> From<&'a ProjectSchema> for ProjectContext<'a> {
    fn from(project: &'a ProjectSchema) -> Self {
        Self {
            header: project.header(),
        }
    }
}

/// Extensionless names that are never shell scripts
const NON_SCRIPT_NAMES: &[&str] = &["Makefile", "AUTHORS", "README", "LICENSE", "Dockerfile"];

/// Languages with a content generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Shell scripts (`.sh` or no extension)
    Bash,
    /// Python 3
    Python,
    /// C
    C,
    /// JavaScript
    JavaScript,
}

impl Language {
    /// Every supported language
    pub const ALL: [Language; 4] = [Language::Bash, Language::Python, Language::C, Language::JavaScript];

    /// Get file extensions for this language
    #[inline]
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Bash => &["sh"],
            Language::Python => &["py"],
            Language::C => &["c"],
            Language::JavaScript => &["js"],
        }
    }

    /// Get human-readable name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Language::Bash => "bash",
            Language::Python => "python",
            Language::C => "c",
            Language::JavaScript => "javascript",
        }
    }

    /// Pick the generator for a task file
    ///
    /// Extensionless files are shell scripts unless their name is a
    /// well-known non-script (`Makefile`, `README`, ...).
    #[must_use]
    pub fn for_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::ALL
                .into_iter()
                .find(|lang| lang.extensions().contains(&ext)),
            None => {
                let name = path.file_name()?.to_str()?;
                let hidden = name.starts_with('.');
                (!hidden && !NON_SCRIPT_NAMES.contains(&name)).then_some(Language::Bash)
            }
        }
    }

    /// Produce the stub content for one of `task`'s files
    #[must_use]
    pub fn generate(&self, task: &TaskSchema, context: &ProjectContext<'_>) -> Vec<String> {
        match self {
            Language::Bash => bash::generate(),
            Language::Python => python::generate(task),
            Language::C => c::generate(task, context),
            Language::JavaScript => javascript::generate(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Content for one task file; unknown kinds get an empty file
#[must_use]
pub fn generate_file(path: &Path, task: &TaskSchema, context: &ProjectContext<'_>) -> Vec<String> {
    match Language::for_path(path) {
        Some(language) => {
            tracing::debug!("generating {} stub for {}", language, path.display());
            language.generate(task, context)
        }
        None => Vec::new(),
    }
}
