//! Per-video metadata records: schema, validation and repair

pub mod repair;
pub mod schema;
pub mod validator;

use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub use repair::{compute_defaults, RepairOutcome, RepairReport};
pub use validator::{DirectoryReport, FileFailure, RecordValidator};

/// A metadata record as written by the scraper. Fields outside the schema
/// are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoRecord(Map<String, Value>);

impl VideoRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Tagged view of one field
    pub fn field(&self, name: &str) -> FieldValue<'_> {
        FieldValue::of(self.0.get(name))
    }

    /// Copy of this record with repair defaults applied
    pub fn with_defaults(&self) -> Self {
        Self(compute_defaults(&self.0))
    }

    /// Set a field, builder style
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }
}

impl TryFrom<Value> for VideoRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RecordError::NotAnObject {
                found: FieldValue::of(Some(&other)).type_name(),
            }),
        }
    }
}

impl From<VideoRecord> for Value {
    fn from(record: VideoRecord) -> Self {
        Value::Object(record.0)
    }
}

/// Borrowed, tagged view of a record field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Null,
    Bool(bool),
    Number(&'a Number),
    Text(&'a str),
    List(&'a [Value]),
    Object(&'a Map<String, Value>),
}

impl<'a> FieldValue<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None => FieldValue::Missing,
            Some(Value::Null) => FieldValue::Null,
            Some(Value::Bool(b)) => FieldValue::Bool(*b),
            Some(Value::Number(n)) => FieldValue::Number(n),
            Some(Value::String(s)) => FieldValue::Text(s),
            Some(Value::Array(items)) => FieldValue::List(items),
            Some(Value::Object(map)) => FieldValue::Object(map),
        }
    }

    /// Type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Missing => "missing",
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "string",
            FieldValue::List(_) => "list",
            FieldValue::Object(_) => "object",
        }
    }

    /// False for missing, null, `false`, zero and empty text/list/object
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Missing | FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Object(map) => !map.is_empty(),
        }
    }

    /// Truthy, and for text also non-blank once trimmed
    pub fn has_content(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            other => other.is_truthy(),
        }
    }

    /// Render the value for an error message
    pub fn describe(&self) -> String {
        match self {
            FieldValue::Missing | FieldValue::Null => "null".to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => Value::String(s.to_string()).to_string(),
            FieldValue::List(items) => Value::Array(items.to_vec()).to_string(),
            FieldValue::Object(map) => Value::Object((*map).clone()).to_string(),
        }
    }
}
