//! Project normalization
//!
//! Normalizes every task, then derives the project-wide values: the single
//! root directory, requirement flags and display names.

use crate::bag::RawProjectBag;
use crate::error::NormalizeResult;
use crate::task::normalize_task;
use crate::text;
use alx_schema::{
    canonicalize, validate_project, ProjectSchema, Requirements, SchemaError, TaskSchema,
    GROUP_PROJECT_TAG,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Project field names emitted by the field extractor
pub mod fields {
    /// Page title
    pub const TITLE: &str = "title";
    /// Tag values
    pub const TAGS: &str = "tags";
    /// Team member names
    pub const MEMBERS: &str = "members";
    /// Requirements section (HTML)
    pub const REQUIREMENTS: &str = "requirements";
}

static HEADER_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d*-?[A-Za-z0-9_]+\.h)\b").expect("valid regex"));

static README_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d*-?README\.md)").expect("valid regex"));

/// Normalize a whole project bag
///
/// # Errors
/// Returns error only if the assembled schema cannot be canonicalized or
/// fails schema validation
pub fn normalize_project(bag: &RawProjectBag) -> NormalizeResult<ProjectSchema> {
    tracing::info!("normalizing project with {} tasks", bag.tasks.len());

    let tasks = bag
        .tasks
        .iter()
        .map(normalize_task)
        .collect::<NormalizeResult<Vec<_>>>()?;

    let tags: BTreeSet<String> = bag
        .fields
        .list(fields::TAGS)
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect();

    let members = bag
        .fields
        .list(fields::MEMBERS)
        .iter()
        .map(|m| title_case(m.trim()))
        .filter(|m| !m.is_empty())
        .collect();

    let directory = resolve_directory(&tasks, tags.contains(GROUP_PROJECT_TAG));
    let requirements = extract_requirements(&bag.fields.list(fields::REQUIREMENTS));

    let project = canonicalize(&ProjectSchema {
        title: bag.fields.text(fields::TITLE).unwrap_or_default().to_string(),
        tags,
        members,
        directory,
        requirements,
        tasks,
    })?;

    let value = serde_json::to_value(&project).map_err(SchemaError::from)?;
    validate_project(&value)?;

    tracing::info!(
        "project {:?} resolved to directory {:?}",
        project.title,
        project.directory
    );
    Ok(project)
}

/// Pick the root directory from the tasks' directory/repository votes
///
/// Each task votes with its directory, or with its repository when it has no
/// directory. Repository identity wins for group projects and whenever it has
/// more votes; the first task's value is used either way.
#[must_use]
pub fn resolve_directory(tasks: &[TaskSchema], group_project: bool) -> String {
    let Some(first) = tasks.first() else {
        return String::new();
    };

    let (directory_votes, repository_votes) =
        tasks.iter().fold((0usize, 0usize), |(dirs, repos), task| {
            if task.directory().is_some() {
                (dirs + 1, repos)
            } else if task.github_repository().is_some() {
                (dirs, repos + 1)
            } else {
                (dirs, repos)
            }
        });
    tracing::debug!("directory votes: {directory_votes}, repository votes: {repository_votes}");

    let resolved = if group_project || repository_votes > directory_votes {
        first.github_repository().or_else(|| first.directory())
    } else {
        first.directory()
    };
    resolved.unwrap_or_default().to_string()
}

/// Scan requirement paragraphs for the header file and the README rule
///
/// Later paragraphs override earlier ones; within a paragraph the first
/// header mention wins.
#[must_use]
pub fn extract_requirements<S: AsRef<str>>(paragraphs: &[S]) -> Requirements {
    let mut requirements = Requirements::default();

    for paragraph in paragraphs {
        let markdown = text::html_to_markdown(paragraph.as_ref());

        if let Some(caps) = HEADER_FILE.captures(&markdown) {
            requirements.header = Some(caps[1].to_string());
        }
        if README_FILE.is_match(&markdown) {
            requirements.readme_required = true;
        }
    }

    requirements
}

/// Title-case a display name
///
/// The first letter of every alphabetic run is upper-cased, the rest
/// lower-cased (`o'NEIL` becomes `O'Neil`).
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::RawFieldBag;
    use pretty_assertions::assert_eq;

    fn task(directory: &str, repository: &str) -> TaskSchema {
        TaskSchema {
            directory: Some(directory.to_string()),
            github_repository: Some(repository.to_string()),
            ..TaskSchema::new("t")
        }
    }

    #[test]
    fn directory_votes_win_by_default() {
        let tasks = vec![task("0x00-x", ""), task("0x00-x", "")];
        assert_eq!(resolve_directory(&tasks, false), "0x00-x");
    }

    #[test]
    fn group_projects_use_the_repository() {
        let tasks = vec![task("0x00-x", "holberton-x"), task("0x00-x", "holberton-x")];
        assert_eq!(resolve_directory(&tasks, true), "holberton-x");
        assert_eq!(resolve_directory(&tasks, false), "0x00-x");
    }

    #[test]
    fn repository_majority_wins() {
        let tasks = vec![task("", "repo-a"), task("", "repo-a"), task("dir", "")];
        assert_eq!(resolve_directory(&tasks, false), "repo-a");
    }

    #[test]
    fn no_tasks_no_directory() {
        assert_eq!(resolve_directory(&[], true), "");
    }

    #[test]
    fn requirements_header_and_readme() {
        let reqs = extract_requirements(&[
            "<ul><li>A <code>README.md</code> file, at the root of the folder of the project, is mandatory</li>\
             <li>Your header file should be called <code>main.h</code></li></ul>",
        ]);
        assert_eq!(reqs.header(), Some("main.h"));
        assert!(reqs.readme_required);

        let none = extract_requirements(&["<ul><li>Allowed editors: vi, vim, emacs</li></ul>"]);
        assert!(none.is_empty());
    }

    #[test]
    fn header_ignores_html_extension() {
        let reqs = extract_requirements(&["<p>see index.html</p>"]);
        assert_eq!(reqs.header(), None);
    }

    #[test]
    fn title_cases_names() {
        assert_eq!(title_case("jane DOE"), "Jane Doe");
        assert_eq!(title_case("o'neil mc-gregor"), "O'Neil Mc-Gregor");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn normalizes_project_bag() {
        let bag = RawProjectBag::new(
            RawFieldBag::new()
                .with(fields::TITLE, " 0x00. Shell ")
                .with(fields::TAGS, vec!["Group project", "C", ""])
                .with(fields::MEMBERS, vec!["ada lovelace", "ALAN TURING"]),
            vec![RawFieldBag::new()
                .with("title", "0. Task")
                .with("directory", "0x00-shell")
                .with("github_repository", "team-repo")],
        );

        let project = normalize_project(&bag).unwrap();
        assert_eq!(project.title, "0x00. Shell");
        assert_eq!(project.directory, "team-repo");
        assert_eq!(project.members, vec!["Ada Lovelace", "Alan Turing"]);
        assert!(project.is_group_project());
        assert_eq!(project.tags.len(), 2);
        assert!(project.requirements.is_empty());
    }

    #[test]
    fn empty_bag_normalizes_to_empty_project() {
        let project = normalize_project(&RawProjectBag::default()).unwrap();
        assert!(project.is_empty());
    }

    #[test]
    fn normalized_projects_always_satisfy_the_schema() {
        let bag = RawProjectBag::new(
            RawFieldBag::new().with(fields::TITLE, "0x01. C"),
            vec![RawFieldBag::new()
                .with("title", "0. Start")
                .with("file", "0-start.c, main.h")],
        );

        let project = normalize_project(&bag).unwrap();
        validate_project(&serde_json::to_value(&project).unwrap()).unwrap();
    }
}
