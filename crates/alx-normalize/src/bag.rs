//! Raw field bags
//!
//! The field extractor hands over loosely typed maps: every value is either
//! missing, a single string (`get()`), or a list of strings (`extract()`).
//! Accessors here smooth over which one a given selector produced.

use crate::error::{NormalizeError, NormalizeResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One extracted value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Selector matched nothing
    #[default]
    Null,
    /// Single string
    Text(String),
    /// List of strings
    List(Vec<String>),
    /// Anything the extractor does not normally emit; read as absent
    Other(Value),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(ToString::to_string).collect())
    }
}

/// Ordered, schemaless `field -> value` map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFieldBag {
    fields: IndexMap<String, RawValue>,
}

impl RawFieldBag {
    /// Create an empty bag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Raw access
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Single string value; a list yields its first element
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            RawValue::Text(s) => Some(s),
            RawValue::List(items) => items.first().map(String::as_str),
            RawValue::Null | RawValue::Other(_) => None,
        }
    }

    /// List value; a single string becomes a one-element list
    #[must_use]
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(RawValue::Text(s)) => vec![s.clone()],
            Some(RawValue::List(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    /// Number of fields present
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Project-level bag plus one bag per task panel, in page order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProjectBag {
    /// Task bags
    #[serde(default)]
    pub tasks: Vec<RawFieldBag>,

    /// Project fields (`title`, `tags`, `members`, `requirements`)
    #[serde(flatten)]
    pub fields: RawFieldBag,
}

impl RawProjectBag {
    /// Create a project bag
    #[must_use]
    pub fn new(fields: RawFieldBag, tasks: Vec<RawFieldBag>) -> Self {
        Self { tasks, fields }
    }

    /// True when neither project fields nor tasks were extracted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.tasks.is_empty()
    }
}

/// Loader for crawler feed exports
///
/// A feed is either a single project object or the JSON array the feed
/// exporter writes; only the first item of an array is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedSource;

impl FeedSource {
    /// Load a project bag from a feed file
    ///
    /// # Errors
    /// - `NormalizeError::Io` if the file cannot be read
    /// - any error from [`FeedSource::parse`]
    pub fn load(path: &Path) -> NormalizeResult<RawProjectBag> {
        let contents = fs::read_to_string(path).map_err(|e| NormalizeError::io_error(path, e))?;
        tracing::debug!("loaded feed {} ({} bytes)", path.display(), contents.len());
        Self::parse(&contents)
    }

    /// Parse a project bag from feed text
    ///
    /// # Errors
    /// - `NormalizeError::Json` on malformed JSON
    /// - `NormalizeError::EmptyFeed` for an empty array
    /// - `NormalizeError::UnexpectedFeedShape` for any other top-level value
    pub fn parse(contents: &str) -> NormalizeResult<RawProjectBag> {
        let value: Value = serde_json::from_str(contents)?;
        let item = match value {
            Value::Array(items) => {
                if items.len() > 1 {
                    tracing::warn!("feed holds {} items, using the first", items.len());
                }
                items.into_iter().next().ok_or(NormalizeError::EmptyFeed)?
            }
            other => other,
        };

        match item {
            Value::Object(_) => Ok(serde_json::from_value(item)?),
            other => Err(NormalizeError::UnexpectedFeedShape {
                found: json_type(&other),
            }),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
