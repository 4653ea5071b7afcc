//! Validated output types
//!
//! A `ValidatedInstance` is only produced by successful validation (or by
//! merging two validated instances). It has no mutating API.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// A typed field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Absent optional field with a null default, or explicit null
    Null,
    String(String),
    Integer(i64),
    Boolean(bool),
    /// A member of an enum field's allowed set
    Enum(String),
    Object(ValidatedInstance),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// String content of string and enum values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ValidatedInstance> {
        match self {
            FieldValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Converts back to the raw JSON representation
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::String(s) | FieldValue::Enum(s) => Value::String(s.clone()),
            FieldValue::Integer(n) => Value::from(*n),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Object(o) => Value::Object(o.to_raw()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::String(s) | FieldValue::Enum(s) => serializer.serialize_str(s),
            FieldValue::Integer(n) => serializer.serialize_i64(*n),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Object(o) => o.serialize(serializer),
        }
    }
}

/// Immutable mapping from field name to typed value, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatedInstance {
    entries: Vec<(String, FieldValue)>,
}

impl ValidatedInstance {
    /// Built by the validator and merge only; field names are unique.
    pub(crate) fn from_entries(entries: Vec<(String, FieldValue)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The raw-input representation; re-validating it against the same schema
    /// yields an equal instance.
    pub fn to_raw(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.to_raw())
    }
}

impl Serialize for ValidatedInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
