//! ALX Project Schema
//!
//! Canonical, pruned value objects describing one scraped project page.
//!
//! # Core Concepts
//!
//! - [`ProjectSchema`]: the whole project (title, tags, members, root directory,
//!   requirements and tasks in page order)
//! - [`TaskSchema`]: one task with its files, prototypes, embedded test files and
//!   compilation command
//! - [`prune`]: the strip/prune pass that keeps "absent" and "empty" identical
//! - [`ProjectState`]: the `.alx/project.json` record of what was scraped
//!
//! # Example
//!
//! ```rust,ignore
//! use alx_schema::{ProjectSchema, ProjectState};
//!
//! let project: ProjectSchema = alx_normalize::normalize_project(&bag)?;
//! ProjectState::save(&root, &project)?;
//!
//! let restored = ProjectState::load(&root)?;
//! assert_eq!(project, restored);
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod project;
pub mod prune;
pub mod state;
pub mod task;
pub mod validation;

// Re-exports
pub use error::{SchemaError, SchemaResult};
pub use project::{ProjectSchema, Requirements, C_TAG, GROUP_PROJECT_TAG};
pub use prune::{canonicalize, prune_empty, strip_strings};
pub use state::{ProjectState, STATE_DIR, STATE_FILE};
pub use task::{TaskSchema, TestFileSpec};
pub use validation::{project_json_schema, validate_project};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
