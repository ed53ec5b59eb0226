//! End-to-end normalization of crawler feeds

use alx_normalize::{normalize_project, FeedSource, NormalizeError};
use alx_schema::{prune_empty, validate_project};
use alx_test_utils::{c_project, temp_dir, write_feed, C_PROJECT_FEED, GROUP_PROJECT_FEED};
use pretty_assertions::assert_eq;

#[test]
fn c_feed_matches_expected_schema() {
    let project = normalize_project(&FeedSource::parse(C_PROJECT_FEED).unwrap()).unwrap();
    let expected = c_project();

    assert_eq!(project.title, expected.title);
    assert_eq!(project.tags, expected.tags);
    assert_eq!(project.directory, expected.directory);
    assert_eq!(project.requirements, expected.requirements);
    assert!(project.members.is_empty());

    assert_eq!(project.tasks.len(), expected.tasks.len());
    for (got, want) in project.tasks.iter().zip(&expected.tasks) {
        assert_eq!(got.title, want.title);
        assert_eq!(got.kind, want.kind);
        assert_eq!(got.files, want.files);
        assert_eq!(got.prototypes, want.prototypes);
        assert_eq!(got.test_files, want.test_files);
        assert_eq!(got.compilation_command, want.compilation_command);
    }
}

#[test]
fn group_feed_resolves_repository() {
    let project = normalize_project(&FeedSource::parse(GROUP_PROJECT_FEED).unwrap()).unwrap();

    assert_eq!(project.directory, "simple_shell");
    assert_eq!(project.members, vec!["Ada Lovelace", "Alan Turing"]);
    assert!(project.is_group_project());
    assert_eq!(project.header(), None);
    assert_eq!(project.tasks[0].files, Vec::<String>::new());
    assert_eq!(project.tasks[1].files, vec!["shell.c", "builtins.c"]);
}

#[test]
fn normalized_output_is_already_pruned() {
    for feed in [C_PROJECT_FEED, GROUP_PROJECT_FEED] {
        let project = normalize_project(&FeedSource::parse(feed).unwrap()).unwrap();
        let value = serde_json::to_value(&project).unwrap();

        assert_eq!(prune_empty(value.clone()), value);
        assert!(validate_project(&value).is_ok());
    }
}

#[test]
fn test_content_keeps_indentation() {
    let project = normalize_project(&FeedSource::parse(C_PROJECT_FEED).unwrap()).unwrap();
    let content = &project.tasks[0].test_files[0].content;

    assert!(content.contains(&"    return (0);".to_string()));
    assert!(content.contains(&String::new()));
}

#[test]
fn feed_file_roundtrip() {
    let dir = temp_dir();
    let path = write_feed(dir.path(), GROUP_PROJECT_FEED);

    let bag = FeedSource::load(&path).unwrap();
    assert_eq!(bag.tasks.len(), 2);

    let empty = write_feed(dir.path(), "[]");
    assert!(matches!(FeedSource::load(&empty), Err(NormalizeError::EmptyFeed)));
}
