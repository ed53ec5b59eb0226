//! ALX Project Generation
//!
//! Turns a canonical [`alx_schema::ProjectSchema`] into a ready-to-edit file tree.
//!
//! # What gets written
//!
//! | file | when |
//! |---|---|
//! | task files | always; stub content for `.sh`/extensionless, `.py`, `.c`, `.js`, empty otherwise |
//! | `tests/<name>` | for every embedded test file, local includes pointed up one level |
//! | `Makefile` | `C` tag and at least one rule |
//! | header, `_putchar.c` | `C` tag and a declared header |
//! | `README.md` | the requirements ask for it |
//! | `AUTHORS` | the project lists members |
//!
//! Nothing that already exists is overwritten.
//!
//! # Example
//!
//! ```rust,ignore
//! use alx_generate::ProjectWriter;
//!
//! let report = ProjectWriter::new(".").write(&project)?;
//! println!("{} created, {} skipped", report.created.len(), report.skipped.len());
//! ```

#![warn(unreachable_pub)]

pub mod auxiliary;
pub mod docs;
pub mod error;
pub mod languages;
pub mod writer;

pub use error::{GenerateError, GenerateResult};
pub use languages::{generate_file, parse_prototype, Language, ProjectContext, PrototypeDoc};
pub use writer::{PlannedFile, ProjectWriter, WriteReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
