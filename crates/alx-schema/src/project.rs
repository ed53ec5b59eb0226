//! Project schema
//!
//! The root value object consumed by every generator.

use crate::task::TaskSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tag marking team assignments identified by their shared repository
pub const GROUP_PROJECT_TAG: &str = "Group project";

/// Tag enabling the C auxiliary files (Makefile, header)
pub const C_TAG: &str = "C";

/// Flags extracted from the project's requirements section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Requirements {
    /// Custom header file every C source must include (e.g. `main.h`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Whether a README.md must be shipped
    #[serde(default, skip_serializing_if = "is_false")]
    pub readme_required: bool,
}

impl Requirements {
    /// True when no requirement was found
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header().is_none() && !self.readme_required
    }

    /// Header filename, if non-empty
    #[inline]
    #[must_use]
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref().filter(|h| !h.is_empty())
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Canonical description of one scraped project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectSchema {
    /// Project title
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Page tags; only membership matters
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    /// Team members, title-cased
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    /// Single resolved root directory for every generated file
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub directory: String,

    /// Requirement flags
    #[serde(default, skip_serializing_if = "Requirements::is_empty")]
    pub requirements: Requirements,

    /// Tasks in page order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskSchema>,
}

impl ProjectSchema {
    /// Check tag membership
    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Team assignment identified by repository
    #[inline]
    #[must_use]
    pub fn is_group_project(&self) -> bool {
        self.has_tag(GROUP_PROJECT_TAG)
    }

    /// C project (Makefile/header generation enabled)
    #[inline]
    #[must_use]
    pub fn is_c_project(&self) -> bool {
        self.has_tag(C_TAG)
    }

    /// Declared header filename, if any
    #[inline]
    #[must_use]
    pub fn header(&self) -> Option<&str> {
        self.requirements.header()
    }

    /// True when nothing at all was scraped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.tags.is_empty()
            && self.members.is_empty()
            && self.directory.is_empty()
            && self.requirements.is_empty()
            && self.tasks.is_empty()
    }

    /// Every prototype of every task, in task order
    pub fn prototypes(&self) -> impl Iterator<Item = &str> {
        self.tasks
            .iter()
            .flat_map(|t| t.prototypes.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_project_is_empty() {
        assert!(ProjectSchema::default().is_empty());
        assert_eq!(serde_json::to_value(ProjectSchema::default()).unwrap(), json!({}));
    }

    #[test]
    fn requirements_omitted_when_unset() {
        let project = ProjectSchema {
            title: "T".to_string(),
            ..ProjectSchema::default()
        };
        let value = serde_json::to_value(&project).unwrap();
        assert!(value.get("requirements").is_none());
        assert!(!project.is_empty());
    }

    #[test]
    fn readme_flag_serialized_only_when_set() {
        let req = Requirements {
            header: None,
            readme_required: true,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"readme_required": true}));
        assert!(!req.is_empty());
    }

    #[test]
    fn tag_helpers() {
        let project = ProjectSchema {
            tags: [GROUP_PROJECT_TAG, C_TAG].iter().map(ToString::to_string).collect(),
            ..ProjectSchema::default()
        };
        assert!(project.is_group_project());
        assert!(project.is_c_project());
        assert!(!project.has_tag("Python"));
    }

    #[test]
    fn prototypes_follow_task_order() {
        let mut first = TaskSchema::new("0");
        first.prototypes = vec!["int a(void);".to_string(), "int b(void);".to_string()];
        let mut second = TaskSchema::new("1");
        second.prototypes = vec!["int c(void);".to_string()];

        let project = ProjectSchema {
            tasks: vec![first, second],
            ..ProjectSchema::default()
        };
        let all: Vec<&str> = project.prototypes().collect();
        assert_eq!(all, vec!["int a(void);", "int b(void);", "int c(void);"]);
    }
}
