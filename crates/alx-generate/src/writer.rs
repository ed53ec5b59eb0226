//! Project writer
//!
//! Plans every file of a project, then writes the ones that do not exist yet.
//! Existing files are never touched, so running twice is harmless and a
//! student's edits survive a regeneration.

use crate::auxiliary::{self, MAKEFILE, PUTCHAR_SOURCE};
use crate::docs::{self, AUTHORS, README};
use crate::error::{GenerateError, GenerateResult};
use crate::languages::{generate_file, ProjectContext};
use alx_schema::{ProjectSchema, TaskSchema};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

static LOCAL_INCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^#include\s+"(.*)""#).expect("valid regex"));

/// Directory holding test fixtures, relative to the task root
pub const TESTS_DIR: &str = "tests";

/// Extensions of files that may run through their shebang
const SCRIPT_EXTENSIONS: &[&str] = &["py", "sh", "rb", "pl", "php", "js", "java", "cpp", "c", "cs"];

/// One file the writer intends to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Absolute destination
    pub path: PathBuf,
    /// Lines, joined with `\n` on write; empty means a zero-length file
    pub lines: Vec<String>,
}

impl PlannedFile {
    fn new(path: PathBuf, lines: Vec<String>) -> Self {
        Self { path, lines }
    }

    /// File content as written
    #[must_use]
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    /// Shebang script with a script extension (or none)
    #[must_use]
    pub fn is_executable(&self) -> bool {
        let shebang = self.lines.first().is_some_and(|l| l.starts_with("#!"));
        shebang
            && match self.path.extension().and_then(|e| e.to_str()) {
                Some(ext) => SCRIPT_EXTENSIONS.contains(&ext),
                None => true,
            }
    }
}

/// Outcome of a write pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Project root the files were written under
    pub root: PathBuf,
    /// Files created by this pass
    pub created: Vec<PathBuf>,
    /// Files left alone because they already existed
    pub skipped: Vec<PathBuf>,
}

impl WriteReport {
    /// True when nothing was written
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
    }
}

/// Writes a project's file tree under an output directory
#[derive(Debug, Clone)]
pub struct ProjectWriter {
    output_root: PathBuf,
    in_place: bool,
}

impl ProjectWriter {
    /// Create a writer rooted at `output_root`
    #[must_use]
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            in_place: false,
        }
    }

    /// Create a writer for an existing project root, ignoring the schema's directory
    #[must_use]
    pub fn in_place(project_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: project_root.into(),
            in_place: true,
        }
    }

    /// Output directory given at construction
    #[inline]
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Directory the project's files land in
    ///
    /// # Errors
    /// `GenerateError::UnsafePath` if the resolved directory escapes the output root
    pub fn project_root(&self, project: &ProjectSchema) -> GenerateResult<PathBuf> {
        if self.in_place || project.directory.is_empty() {
            Ok(self.output_root.clone())
        } else {
            safe_join(&self.output_root, &project.directory)
        }
    }

    /// Every file the project would produce, in write order
    ///
    /// Project-level files come first so that a task listing `README.md` or
    /// the header among its files does not shadow the generated content.
    ///
    /// # Errors
    /// - `GenerateError::EmptyProject` if nothing was scraped
    /// - `GenerateError::UnsafePath` if a declared path escapes the root
    pub fn plan(&self, project: &ProjectSchema) -> GenerateResult<Vec<PlannedFile>> {
        if project.is_empty() {
            return Err(GenerateError::EmptyProject);
        }

        let root = self.project_root(project)?;
        let mut planned = Vec::new();

        if let Some(lines) = docs::readme(project) {
            planned.push(PlannedFile::new(root.join(README), lines));
        }
        if let Some(lines) = docs::authors(project) {
            planned.push(PlannedFile::new(root.join(AUTHORS), lines));
        }
        if project.is_c_project() {
            planned.extend(self.plan_c_auxiliaries(project, &root)?);
        }

        let context = ProjectContext::from(project);
        for task in &project.tasks {
            let task_root = task_root(&root, project, task)?;

            for file in &task.files {
                let path = safe_join(&task_root, file)?;
                let lines = generate_file(Path::new(file), task, &context);
                planned.push(PlannedFile::new(path, lines));
            }

            let tests_root = task_root.join(TESTS_DIR);
            for test_file in &task.test_files {
                if test_file.filename.is_empty() || test_file.content.is_empty() {
                    continue;
                }
                let path = safe_join(&tests_root, &test_file.filename)?;
                planned.push(PlannedFile::new(path, rewrite_includes(&test_file.content)));
            }
        }

        Ok(planned)
    }

    fn plan_c_auxiliaries(&self, project: &ProjectSchema, root: &Path) -> GenerateResult<Vec<PlannedFile>> {
        let mut planned = Vec::new();

        if let Some(lines) = auxiliary::makefile(project) {
            planned.push(PlannedFile::new(root.join(MAKEFILE), lines));
        }

        if let Some(header) = project.header() {
            let served = directory_label(root, &self.output_root);
            if let Some(lines) = auxiliary::header_file(project, &served) {
                planned.push(PlannedFile::new(safe_join(root, header)?, lines));
            }
            if auxiliary::needs_putchar(project) {
                planned.push(PlannedFile::new(root.join(PUTCHAR_SOURCE), auxiliary::putchar_source()));
            }
        }

        Ok(planned)
    }

    /// Plan and write the project
    ///
    /// # Errors
    /// - any error from [`ProjectWriter::plan`], before anything is written
    /// - `GenerateError::Io` if a directory or file cannot be created
    pub fn write(&self, project: &ProjectSchema) -> GenerateResult<WriteReport> {
        let planned = self.plan(project)?;
        let root = self.project_root(project)?;
        tracing::info!("writing {} planned files under {}", planned.len(), root.display());

        let mut report = WriteReport {
            root,
            ..WriteReport::default()
        };
        for file in &planned {
            if write_if_missing(file)? {
                report.created.push(file.path.clone());
            } else {
                report.skipped.push(file.path.clone());
            }
        }

        tracing::info!(
            "created {} files, skipped {} existing",
            report.created.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

/// Root for one task's files: its own directory when it differs from the project's
fn task_root(root: &Path, project: &ProjectSchema, task: &TaskSchema) -> GenerateResult<PathBuf> {
    match task.directory() {
        Some(dir) if dir != project.directory => safe_join(root, dir),
        _ => Ok(root.to_path_buf()),
    }
}

fn directory_label(root: &Path, output_root: &Path) -> String {
    root.file_name()
        .or_else(|| output_root.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string())
}

/// Join a declared relative path, rejecting absolute paths and `..`
fn safe_join(base: &Path, relative: &str) -> GenerateResult<PathBuf> {
    let rel = Path::new(relative);
    let escapes = rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(GenerateError::UnsafePath {
            path: rel.to_path_buf(),
        });
    }
    Ok(base.join(rel))
}

/// `#include "x.h"` becomes `#include "../x.h"` for files under `tests/`
fn rewrite_includes(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| LOCAL_INCLUDE.replace(line, r#"#include "../$1""#).into_owned())
        .collect()
}

/// Create the file unless anything, even a dangling symlink, holds its name
fn write_if_missing(file: &PlannedFile) -> GenerateResult<bool> {
    if let Some(parent) = file.path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenerateError::io_error(parent, e))?;
    }

    let mut handle = match OpenOptions::new().write(true).create_new(true).open(&file.path) {
        Ok(handle) => handle,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!("exists, skipping {}", file.path.display());
            return Ok(false);
        }
        Err(e) => return Err(GenerateError::io_error(&file.path, e)),
    };
    handle
        .write_all(file.contents().as_bytes())
        .map_err(|e| GenerateError::io_error(&file.path, e))?;

    if file.is_executable() {
        make_executable(&file.path).map_err(|e| GenerateError::io_error(&file.path, e))?;
    }

    tracing::debug!("created {}", file.path.display());
    Ok(true)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
