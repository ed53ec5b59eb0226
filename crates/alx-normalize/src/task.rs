//! Task normalization
//!
//! One raw task bag in, one canonical [`TaskSchema`] out. Every extraction is
//! total: missing or malformed content yields an absent field, never an error.

use crate::bag::RawFieldBag;
use crate::error::NormalizeResult;
use crate::text::{self, unescape_html};
use alx_schema::{canonicalize, TaskSchema, TestFileSpec};
use once_cell::sync::Lazy;
use regex::Regex;

/// Task field names emitted by the field extractor
pub mod fields {
    /// Task kind label
    pub const TYPE: &str = "type";
    /// Panel title
    pub const TITLE: &str = "title";
    /// Body paragraphs (HTML)
    pub const BODY: &str = "body";
    /// Prototype list
    pub const PROTOTYPE: &str = "prototype";
    /// Repository name
    pub const GITHUB_REPOSITORY: &str = "github_repository";
    /// Directory name
    pub const DIRECTORY: &str = "directory";
    /// Comma-separated file list
    pub const FILE: &str = "file";
}

static GCC_COMMAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"gcc .+").expect("valid regex"));

static CAT_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bcat ([^ \n\-][^ \n]*)").expect("valid regex"));

const FILE_SEPARATOR: &str = ", ";
const COMMAND_JOINER: &str = " && ";

/// Normalize one task bag
///
/// # Errors
/// Returns error only if the assembled task cannot be canonicalized
pub fn normalize_task(bag: &RawFieldBag) -> NormalizeResult<TaskSchema> {
    let body = bag.list(fields::BODY);
    let description = text::clean_all(&body);
    let compilation_command = extract_compilation_command(&description);
    let test_files = extract_test_files(&body);

    let task = TaskSchema {
        kind: bag.text(fields::TYPE).map(ToString::to_string),
        title: bag.text(fields::TITLE).unwrap_or_default().to_string(),
        description,
        directory: bag.text(fields::DIRECTORY).map(ToString::to_string),
        github_repository: bag.text(fields::GITHUB_REPOSITORY).map(ToString::to_string),
        files: split_files(bag.text(fields::FILE).unwrap_or_default()),
        prototypes: bag
            .list(fields::PROTOTYPE)
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect(),
        test_files,
        compilation_command,
    };

    let task = canonicalize(&task)?;
    tracing::debug!(
        "normalized task {:?}: {} files, {} test files",
        task.title,
        task.files.len(),
        task.test_files.len()
    );
    Ok(task)
}

/// Split a `a.c, b.c` file field into paths
#[must_use]
pub fn split_files(raw: &str) -> Vec<String> {
    raw.split(FILE_SEPARATOR)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Find `gcc` invocations in cleaned description lines
///
/// Several invocations are chained with ` && ` so the first failure stops
/// the recipe.
#[must_use]
pub fn extract_compilation_command<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    let commands: Vec<String> = lines
        .iter()
        .flat_map(|line| GCC_COMMAND.find_iter(line.as_ref()))
        .map(|m| {
            let command = unescape_html(m.as_str());
            command.trim_end().trim_end_matches('`').trim_end().to_string()
        })
        .collect();

    match commands.len() {
        0 => None,
        1 => commands.into_iter().next(),
        _ => Some(commands.join(COMMAND_JOINER)),
    }
}

/// Extract `cat <file>` blocks from body paragraphs
///
/// A block starts on the line after the `cat` and stops before the first line
/// holding a prompt (`$`), a `</code>` or a code fence. Without such a line
/// the block runs to the end of the paragraph.
#[must_use]
pub fn extract_test_files<S: AsRef<str>>(paragraphs: &[S]) -> Vec<TestFileSpec> {
    let mut test_files = Vec::new();

    for paragraph in paragraphs {
        let lines: Vec<&str> = paragraph.as_ref().split('\n').collect();

        for (index, line) in lines.iter().enumerate() {
            let Some(caps) = CAT_COMMAND.captures(line) else {
                continue;
            };
            let filename = text::strip_tags(&caps[1]).trim().to_string();
            if filename.is_empty() {
                continue;
            }

            let start = index + 1;
            let end = match lines[start..].iter().position(|l| ends_block(l)) {
                Some(offset) => start + offset,
                None => {
                    tracing::warn!(
                        "no end marker after `cat {filename}`, keeping the rest of the paragraph"
                    );
                    lines.len()
                }
            };

            let content = lines[start..end].iter().map(|l| unescape_html(l)).collect();
            test_files.push(TestFileSpec::new(filename, content));
        }
    }

    test_files
}

fn ends_block(line: &str) -> bool {
    line.contains('$') || line.contains("</code>") || line.starts_with("```")
}
