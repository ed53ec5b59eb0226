//! End-to-end runs of the `alx` commands

use alx_cli::commands::{NOT_FOUND, SUCCESS};
use alx_cli::{build_cli, run};
use alx_schema::{ProjectSchema, ProjectState};
use alx_test_utils::{temp_dir, tree, write_feed, C_PROJECT_FEED, GROUP_PROJECT_FEED};
use pretty_assertions::assert_eq;
use std::fs;

fn alx(args: &[&str]) -> (u8, String) {
    let matches = build_cli()
        .try_get_matches_from(std::iter::once("alx").chain(args.iter().copied()))
        .unwrap();
    let mut out = Vec::new();
    let status = run(&matches, &mut out).unwrap();
    (status, String::from_utf8(out).unwrap())
}

fn alx_err(args: &[&str]) -> anyhow::Error {
    let matches = build_cli()
        .try_get_matches_from(std::iter::once("alx").chain(args.iter().copied()))
        .unwrap();
    run(&matches, &mut Vec::new()).unwrap_err()
}

#[test]
fn startproject_generates_tree_and_state() {
    let dir = temp_dir();
    let feed = write_feed(dir.path(), C_PROJECT_FEED);
    let output = dir.path().join("out");
    let output_arg = output.to_string_lossy().into_owned();

    let (status, stdout) = alx(&["startproject", feed.to_str().unwrap(), "--output", &output_arg]);
    assert_eq!(status, SUCCESS);
    assert!(stdout.starts_with("0x02. C - Functions, nested loops\n"));
    assert!(stdout.contains("  created  Makefile\n"));
    assert!(stdout.contains("9 created, 0 skipped"));

    let root = output.join("0x02-functions_nested_loops");
    assert!(tree(&root).contains(&".alx/project.json".to_string()));

    let saved = ProjectState::load(&root).unwrap();
    assert_eq!(saved.title, "0x02. C - Functions, nested loops");
    assert_eq!(saved.tasks.len(), 3);
}

#[test]
fn regenerate_restores_only_missing_files() {
    let dir = temp_dir();
    let feed = write_feed(dir.path(), GROUP_PROJECT_FEED);
    let output_arg = dir.path().to_string_lossy().into_owned();
    alx(&["startproject", feed.to_str().unwrap(), "-o", &output_arg]);

    let root = dir.path().join("simple_shell");
    fs::write(root.join("shell.c"), "int main(void) { return 0; }\n").unwrap();
    fs::remove_file(root.join("AUTHORS")).unwrap();

    let (status, stdout) = alx(&["regenerate", root.to_str().unwrap()]);
    assert_eq!(status, SUCCESS);
    assert!(stdout.contains("  created  AUTHORS\n"));
    assert!(stdout.contains("  exists   shell.c\n"));
    assert!(stdout.contains("1 created, 3 skipped"));
    assert_eq!(fs::read_to_string(root.join("shell.c")).unwrap(), "int main(void) { return 0; }\n");
    assert!(!root.join("simple_shell").exists());
}

#[test]
fn regenerate_without_state_fails() {
    let dir = temp_dir();
    let err = alx_err(&["regenerate", dir.path().to_str().unwrap()]);
    assert!(format!("{err:#}").contains("no project state found"));
}

#[test]
fn normalize_prints_canonical_json() {
    let dir = temp_dir();
    let feed = write_feed(dir.path(), GROUP_PROJECT_FEED);

    let (status, stdout) = alx(&["normalize", feed.to_str().unwrap()]);
    assert_eq!(status, SUCCESS);
    assert!(stdout.starts_with("{\n    \"title\": \"0x16. C - Simple Shell\""));

    let parsed: ProjectSchema = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed.directory, "simple_shell");
}

#[test]
fn check_accepts_saved_state_and_rejects_garbage() {
    let dir = temp_dir();
    let feed = write_feed(dir.path(), C_PROJECT_FEED);
    let output_arg = dir.path().to_string_lossy().into_owned();
    alx(&["startproject", feed.to_str().unwrap(), "-o", &output_arg]);

    let state = ProjectState::path(&dir.path().join("0x02-functions_nested_loops"));
    let (status, stdout) = alx(&["check", state.to_str().unwrap()]);
    assert_eq!(status, SUCCESS);
    assert!(stdout.ends_with(": ok (3 tasks)\n"));

    fs::write(&state, r#"{"title": 3}"#).unwrap();
    let err = alx_err(&["check", state.to_str().unwrap()]);
    assert!(format!("{err:#}").contains("schema violation"));
}

#[test]
fn config_get_and_set() {
    let dir = temp_dir();
    let file = dir.path().join(".alxconfig");
    let file_arg = file.to_string_lossy().into_owned();

    let (status, stdout) = alx(&["config", "user.email", "--file", &file_arg]);
    assert_eq!((status, stdout.as_str()), (NOT_FOUND, ""));

    let (status, _) = alx(&["config", "user.email", "me@example.com", "--file", &file_arg]);
    assert_eq!(status, SUCCESS);

    let (status, stdout) = alx(&["config", "user.email", "--file", &file_arg]);
    assert_eq!((status, stdout.as_str()), (SUCCESS, "me@example.com\n"));

    let (status, _) = alx(&["config", "user.email", "", "--file", &file_arg]);
    assert_eq!(status, SUCCESS);
    assert_eq!(alx(&["config", "user.email", "--file", &file_arg]).0, NOT_FOUND);
}

#[test]
fn config_key_without_name_is_rejected() {
    let err = build_cli()
        .try_get_matches_from(["alx", "config", "user."])
        .unwrap_err();
    assert!(err.to_string().contains("key does not contain a variable name: user."));
}
