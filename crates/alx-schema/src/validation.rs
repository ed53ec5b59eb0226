//! JSON-schema validation of serialized projects
//!
//! The schema is derived from [`ProjectSchema`] itself, so the persisted
//! state and the in-memory types cannot drift apart.

use crate::error::{SchemaError, SchemaResult};
use crate::project::ProjectSchema;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::Value;

static PROJECT_JSON_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::to_value(schemars::schema_for!(ProjectSchema)).unwrap_or(Value::Bool(true))
});

static COMPILED_SCHEMA: Lazy<Result<JSONSchema, String>> =
    Lazy::new(|| JSONSchema::compile(project_json_schema()).map_err(|e| e.to_string()));

/// JSON schema describing a serialized [`ProjectSchema`]
#[must_use]
pub fn project_json_schema() -> &'static Value {
    &PROJECT_JSON_SCHEMA
}

/// Validate a JSON instance against the project schema
///
/// # Errors
/// - `SchemaError::Validation` listing every violation
/// - `SchemaError::InvalidSchema` if the derived schema does not compile
pub fn validate_project(instance: &Value) -> SchemaResult<()> {
    let compiled = match &*COMPILED_SCHEMA {
        Ok(compiled) => compiled,
        Err(e) => return Err(SchemaError::InvalidSchema(e.clone())),
    };

    if let Err(errors) = compiled.validate(instance) {
        let violations: Vec<String> = errors
            .map(|e| {
                let pointer = e.instance_path.to_string();
                format!("{}: {}", display_pointer(&pointer), e)
            })
            .collect();
        tracing::debug!("project failed validation with {} violations", violations.len());
        return Err(SchemaError::Validation { violations });
    }

    Ok(())
}

fn display_pointer(pointer: &str) -> &str {
    if pointer.is_empty() {
        "/"
    } else {
        pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_describes_top_level_fields() {
        let schema = project_json_schema();
        let properties = &schema["properties"];
        for field in ["title", "tags", "members", "directory", "requirements", "tasks"] {
            assert!(properties.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn accepts_minimal_project() {
        assert!(validate_project(&json!({})).is_ok());
        assert!(validate_project(&json!({"title": "T", "tasks": [{"title": "0"}]})).is_ok());
    }

    #[test]
    fn rejects_wrong_types() {
        let err = validate_project(&json!({"title": 3, "tasks": "nope"})).unwrap_err();
        match err {
            SchemaError::Validation { violations } => {
                assert_eq!(violations.len(), 2);
                assert!(violations.iter().any(|v| v.starts_with("/title")));
                assert!(violations.iter().any(|v| v.starts_with("/tasks")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn compiled_schema_is_reused() {
        validate_project(&json!({"title": "T"})).unwrap();
        let first: *const JSONSchema = (*COMPILED_SCHEMA).as_ref().unwrap();
        validate_project(&json!({"title": "U"})).unwrap();
        let second: *const JSONSchema = (*COMPILED_SCHEMA).as_ref().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_non_string_test_content() {
        let instance = json!({
            "tasks": [{"title": "0", "test_files": [{"filename": "0-main.c", "content": [1]}]}]
        });
        assert!(validate_project(&instance).is_err());
    }
}
