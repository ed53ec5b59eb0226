//! ALX Normalization
//!
//! Raw field bags from the project page in, canonical [`alx_schema::ProjectSchema`] out.
//!
//! # Pipeline
//!
//! ```text
//! feed file ──FeedSource──▶ RawProjectBag
//!                              │ normalize_task × N
//!                              │ resolve_directory, extract_requirements
//!                              ▼
//!                        strip + prune ──▶ ProjectSchema
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use alx_normalize::{normalize_project, FeedSource};
//!
//! let bag = FeedSource::load(Path::new("alx_project.json"))?;
//! let project = normalize_project(&bag)?;
//! ```

#![warn(unreachable_pub)]

pub mod bag;
pub mod error;
pub mod project;
pub mod task;
pub mod text;

pub use bag::{FeedSource, RawFieldBag, RawProjectBag, RawValue};
pub use error::{NormalizeError, NormalizeResult};
pub use project::{extract_requirements, normalize_project, resolve_directory, title_case};
pub use task::{extract_compilation_command, extract_test_files, normalize_task, split_files};
pub use text::{clean, clean_lines, html_to_markdown, unescape_html};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    const FEED: &str = r#"[{
        "title": "0x02. C - Functions",
        "tags": ["C"],
        "requirements": ["<ul><li>Use the header file <code>main.h</code></li></ul>"],
        "tasks": [{
            "type": "mandatory",
            "title": "0. _putchar",
            "body": ["<pre><code>$ gcc -Wall 0-putchar.c _putchar.c -o 0</code></pre>"],
            "directory": "0x02-functions",
            "file": "0-putchar.c"
        }]
    }]"#;

    #[test]
    fn feed_to_schema() {
        let bag = FeedSource::parse(FEED).unwrap();
        let project = normalize_project(&bag).unwrap();

        assert_eq!(project.directory, "0x02-functions");
        assert_eq!(project.header(), Some("main.h"));
        assert_eq!(
            project.tasks[0].compilation_command(),
            Some("gcc -Wall 0-putchar.c _putchar.c -o 0")
        );
    }

    #[test]
    fn normalization_is_deterministic() {
        let bag = FeedSource::parse(FEED).unwrap();
        assert_eq!(normalize_project(&bag).unwrap(), normalize_project(&bag).unwrap());
    }
}
