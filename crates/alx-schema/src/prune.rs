//! Strip and prune passes over a generic JSON tree
//!
//! Normalization ends with one pass of each over the whole schema:
//! - [`strip_strings`] trims whitespace around every string, except under
//!   [`VERBATIM_KEYS`]
//! - [`prune_empty`] drops every mapping entry whose value is `null`, `""`,
//!   `[]` or `{}`, bottom-up, so a mapping emptied by pruning is dropped too
//!
//! Elements of sequences are never removed; a blank line is still a line.

use crate::error::SchemaResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Keys whose subtree keeps its exact text (test file content, description lines)
pub const VERBATIM_KEYS: &[&str] = &["content", "description"];

/// Trim every string in the tree except under [`VERBATIM_KEYS`]
#[must_use]
pub fn strip_strings(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                Value::String(s)
            } else {
                Value::String(trimmed.to_string())
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(strip_strings).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if VERBATIM_KEYS.contains(&key.as_str()) {
                        (key, value)
                    } else {
                        (key, strip_strings(value))
                    }
                })
                .collect(),
        ),
        other => other,
    }
}

/// Drop empty mapping values at every nesting level
#[must_use]
pub fn prune_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pruned = Map::with_capacity(map.len());
            for (key, value) in map {
                let value = prune_empty(value);
                if !is_empty_value(&value) {
                    pruned.insert(key, value);
                }
            }
            Value::Object(pruned)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(prune_empty).collect()),
        other => other,
    }
}

/// `null`, empty string, empty sequence or empty mapping
#[inline]
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Round-trip a value through strip and prune
///
/// # Errors
/// Returns error if the value cannot be represented as JSON or the pruned
/// tree no longer deserializes into `T`
pub fn canonicalize<T>(value: &T) -> SchemaResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let tree = serde_json::to_value(value)?;
    let tree = prune_empty(strip_strings(tree));
    Ok(serde_json::from_value(tree)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn prunes_empty_task_fields() {
        let task = json!({"directory": "", "files": [], "title": "X"});
        assert_eq!(prune_empty(task), json!({"title": "X"}));
    }

    #[test]
    fn prunes_nested_mappings_left_empty() {
        let project = json!({
            "title": "P",
            "requirements": {"header": null},
            "tasks": [{"title": "0", "test_files": [], "directory": null}]
        });
        assert_eq!(
            prune_empty(project),
            json!({"title": "P", "tasks": [{"title": "0"}]})
        );
    }

    #[test]
    fn keeps_blank_sequence_elements() {
        let task = json!({"description": ["line", "", "```console"]});
        assert_eq!(prune_empty(task.clone()), task);
    }

    #[test]
    fn keeps_false_and_zero() {
        let value = json!({"flag": false, "count": 0});
        assert_eq!(prune_empty(value.clone()), value);
    }

    #[test]
    fn strips_everything_but_verbatim_keys() {
        let task = json!({
            "title": "  0. Task \n",
            "files": [" a.c", "b.c "],
            "description": ["  indented code"],
            "test_files": [{"filename": " 0-main.c ", "content": ["    return (0);", "}  "]}]
        });
        assert_eq!(
            strip_strings(task),
            json!({
                "title": "0. Task",
                "files": ["a.c", "b.c"],
                "description": ["  indented code"],
                "test_files": [{"filename": "0-main.c", "content": ["    return (0);", "}  "]}]
            })
        );
    }

    #[test]
    fn whitespace_only_field_is_pruned_after_strip() {
        let value = json!({"directory": "   ", "title": "X"});
        assert_eq!(prune_empty(strip_strings(value)), json!({"title": "X"}));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            "[ a-z]{0,4}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn no_empty_mapping_values(value: &Value) -> bool {
        match value {
            Value::Object(map) => map
                .values()
                .all(|v| !is_empty_value(v) && no_empty_mapping_values(v)),
            Value::Array(items) => items.iter().all(no_empty_mapping_values),
            _ => true,
        }
    }

    proptest! {
        #[test]
        fn prop_prune_is_idempotent(value in arb_json()) {
            let once = prune_empty(value);
            let twice = prune_empty(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_pruned_tree_has_no_empty_values(value in arb_json()) {
            let pruned = prune_empty(strip_strings(value));
            prop_assert!(no_empty_mapping_values(&pruned));
        }

        #[test]
        fn prop_strip_is_idempotent(value in arb_json()) {
            let once = strip_strings(value);
            let twice = strip_strings(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
