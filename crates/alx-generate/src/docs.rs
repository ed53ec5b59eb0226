//! README.md and AUTHORS

use alx_schema::ProjectSchema;

/// README file name
pub const README: &str = "README.md";

/// AUTHORS file name
pub const AUTHORS: &str = "AUTHORS";

const README_FOOTER: &[&str] = &[
    "",
    "---",
    "",
    "*Please note that this README is dynamically generated and may not always reflect the most up-to-date information about the project.*",
    "",
    "---",
    "",
];

const AUTHORS_HEADER: &str = "# This file lists all contributors to the repository.";

/// README lines, when the requirements ask for one
#[must_use]
pub fn readme(project: &ProjectSchema) -> Option<Vec<String>> {
    if !project.requirements.readme_required {
        return None;
    }

    let mut lines = vec![format!("# {}", project.title)];
    for task in &project.tasks {
        lines.push(format!("\n## {}\n", task.title));
        lines.extend(task.description.iter().cloned());
    }
    lines.extend(README_FOOTER.iter().map(ToString::to_string));
    Some(lines)
}

/// AUTHORS lines, when the project lists members
#[must_use]
pub fn authors(project: &ProjectSchema) -> Option<Vec<String>> {
    if project.members.is_empty() {
        return None;
    }

    let mut lines = vec![AUTHORS_HEADER.to_string(), String::new()];
    lines.extend(project.members.iter().cloned());
    lines.push(String::new());
    Some(lines)
}
