//! `alx` command tree and handlers
//!
//! Handlers write their output to the given writer and return the process
//! exit status; errors bubble up as [`anyhow::Error`] with context attached.

use crate::config::{ConfigKey, UserConfig};
use alx_generate::{ProjectWriter, WriteReport};
use alx_normalize::{normalize_project, FeedSource};
use alx_schema::{ProjectSchema, ProjectState};
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exit status of a successful command
pub const SUCCESS: u8 = 0;

/// Exit status of a configuration lookup that found nothing
pub const NOT_FOUND: u8 = 1;

/// Exit status of a command line clap could not dispatch
pub const USAGE: u8 = 2;

/// Build the `alx` command line
#[must_use]
pub fn build_cli() -> Command {
    Command::new("alx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scaffold ALX projects from scraped project pages")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise the log level (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("startproject")
                .about("Normalize a scraped feed and generate the project tree")
                .arg(
                    Arg::new("feed")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Scraper feed export (JSON object or array)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory the project directory is created in"),
                ),
        )
        .subcommand(
            Command::new("regenerate")
                .about("Recreate missing files from the saved project state")
                .arg(
                    Arg::new("dir")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Project root holding .alx/project.json"),
                ),
        )
        .subcommand(
            Command::new("normalize")
                .about("Print the canonical project JSON for a feed")
                .arg(
                    Arg::new("feed")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Scraper feed export"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a saved project state file")
                .arg(
                    Arg::new("state")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to a project.json"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Get or set a user configuration value")
                .arg(
                    Arg::new("key")
                        .required(true)
                        .value_parser(|raw: &str| raw.parse::<ConfigKey>())
                        .help("Setting as section.name"),
                )
                .arg(Arg::new("value").help("New value; an empty string removes the setting"))
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_parser(value_parser!(PathBuf))
                        .help("Configuration file (default ~/.alxconfig)"),
                ),
        )
        .subcommand(Command::new("version").about("Print the version"))
}

/// Dispatch parsed arguments to their handler
///
/// # Errors
/// Whatever the selected handler fails with
pub fn run(matches: &ArgMatches, out: &mut impl Write) -> anyhow::Result<u8> {
    match matches.subcommand() {
        Some(("startproject", args)) => {
            let feed = required_path(args, "feed")?;
            let output = required_path(args, "output")?;
            start_project(feed, output, out)
        }
        Some(("regenerate", args)) => regenerate(required_path(args, "dir")?, out),
        Some(("normalize", args)) => normalize(required_path(args, "feed")?, out),
        Some(("check", args)) => check(required_path(args, "state")?, out),
        Some(("config", args)) => {
            let key = args
                .get_one::<ConfigKey>("key")
                .context("missing configuration key")?;
            let mut config = match args.get_one::<PathBuf>("file") {
                Some(path) => UserConfig::load(path.as_path()),
                None => UserConfig::load_default(),
            }
            .context("failed to load user configuration")?;
            let value = args.get_one::<String>("value").map(String::as_str);
            configure(&mut config, key, value, out)
        }
        Some(("version", _)) => {
            writeln!(out, "alx {}", env!("CARGO_PKG_VERSION"))?;
            Ok(SUCCESS)
        }
        _ => Ok(USAGE),
    }
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing argument <{name}>"))
}

fn load_feed(feed: &Path) -> anyhow::Result<ProjectSchema> {
    let bag = FeedSource::load(feed).with_context(|| format!("failed to load feed {}", feed.display()))?;
    normalize_project(&bag).with_context(|| format!("failed to normalize feed {}", feed.display()))
}

/// Normalize a feed, generate its tree under `output` and save the state
///
/// # Errors
/// Feed, normalization, generation or state errors
pub fn start_project(feed: &Path, output: &Path, out: &mut impl Write) -> anyhow::Result<u8> {
    let project = load_feed(feed)?;
    let report = ProjectWriter::new(output)
        .write(&project)
        .with_context(|| format!("failed to generate {:?}", project.title))?;
    let state = ProjectState::save(&report.root, &project).context("failed to save project state")?;
    tracing::info!("saved project state to {}", state.display());

    print_report(&project, &report, out)?;
    Ok(SUCCESS)
}

/// Recreate missing files of an existing project from its saved state
///
/// # Errors
/// State or generation errors
pub fn regenerate(root: &Path, out: &mut impl Write) -> anyhow::Result<u8> {
    let project = ProjectState::load(root).context("failed to load project state")?;
    let report = ProjectWriter::in_place(root)
        .write(&project)
        .with_context(|| format!("failed to regenerate {}", root.display()))?;

    print_report(&project, &report, out)?;
    Ok(SUCCESS)
}

/// Print the canonical JSON of a feed
///
/// # Errors
/// Feed, normalization or serialization errors
pub fn normalize(feed: &Path, out: &mut impl Write) -> anyhow::Result<u8> {
    let project = load_feed(feed)?;
    let json = ProjectState::to_json_string(&project).context("failed to serialize project")?;
    writeln!(out, "{json}")?;
    Ok(SUCCESS)
}

/// Validate a state file
///
/// # Errors
/// The file is missing, unreadable or violates the schema
pub fn check(state: &Path, out: &mut impl Write) -> anyhow::Result<u8> {
    let project = ProjectState::load_file(state)
        .with_context(|| format!("{} is not a valid project state", state.display()))?;
    writeln!(out, "{}: ok ({} tasks)", state.display(), project.tasks.len())?;
    Ok(SUCCESS)
}

/// Get (no value) or set a configuration entry
///
/// Getting an unset entry prints nothing and exits with status 1.
///
/// # Errors
/// The configuration cannot be saved
pub fn configure(
    config: &mut UserConfig,
    key: &ConfigKey,
    value: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    match value {
        Some(value) => {
            config
                .set(&key.section, &key.key, value)
                .with_context(|| format!("failed to update {}", config.path().display()))?;
            Ok(SUCCESS)
        }
        None => match config.get(&key.section, &key.key) {
            Some(value) => {
                writeln!(out, "{value}")?;
                Ok(SUCCESS)
            }
            None => Ok(NOT_FOUND),
        },
    }
}

fn print_report(project: &ProjectSchema, report: &WriteReport, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "{}", project.title)?;
    for path in &report.created {
        let shown = path.strip_prefix(&report.root).unwrap_or(path);
        writeln!(out, "  created  {}", shown.display())?;
    }
    for path in &report.skipped {
        let shown = path.strip_prefix(&report.root).unwrap_or(path);
        writeln!(out, "  exists   {}", shown.display())?;
    }
    writeln!(
        out,
        "{} created, {} skipped in {}",
        report.created.len(),
        report.skipped.len(),
        report.root.display()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn verbosity_is_global() {
        let matches = build_cli()
            .try_get_matches_from(["alx", "normalize", "feed.json", "-vv"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
    }

    #[test]
    fn malformed_config_key_is_a_usage_error() {
        let err = build_cli()
            .try_get_matches_from(["alx", "config", "email"])
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("key does not contain a section: email"));
    }

    #[test]
    fn version_command() {
        let matches = build_cli().try_get_matches_from(["alx", "version"]).unwrap();
        let mut out = Vec::new();
        assert_eq!(run(&matches, &mut out).unwrap(), SUCCESS);
        assert_eq!(String::from_utf8(out).unwrap(), format!("alx {}\n", env!("CARGO_PKG_VERSION")));
    }
}
