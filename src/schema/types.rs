//! Schema type definitions
//!
//! Supported kinds:
//! - string: UTF-8 string, optional inclusive length bounds
//! - integer: 64-bit signed integer, `greater_than` (exclusive) and
//!   `less_or_equal` (inclusive) bounds
//! - boolean
//! - enum: closed set of allowed strings, case-sensitive
//! - object: nested schema (composition)

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::builder::SchemaBuilder;
use super::instance::FieldValue;

/// Field kind with its kind-specific constraints
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
    },
    Integer {
        greater_than: Option<i64>,
        less_or_equal: Option<i64>,
    },
    Boolean,
    Enum {
        allowed_values: Vec<String>,
    },
    Object {
        schema: Arc<Schema>,
    },
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String { .. } => "string",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Object { .. } => "object",
        }
    }
}

/// What to do with input keys the schema does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Drop them silently
    #[default]
    Ignore,
    /// Report each as `unexpected_field`
    Reject,
}

impl fmt::Display for UnknownFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownFieldPolicy::Ignore => write!(f, "ignore"),
            UnknownFieldPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Documentation-only metadata. Never consulted by validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub example: Option<Value>,
}

/// Compiled field of a `Schema`
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) default: FieldValue,
    pub(crate) meta: FieldMeta,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Value substituted when an optional field is absent
    pub fn default(&self) -> &FieldValue {
        &self.default
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }
}

/// Compiled, immutable schema.
///
/// Only obtainable through `SchemaBuilder::build` (directly or via a
/// `SchemaDefinition`), so every instance has passed the authoring checks.
/// Shared read-only across concurrent validation calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) fields: Vec<Field>,
    pub(crate) unknown_fields: UnknownFieldPolicy,
}

impl Schema {
    /// Starts a new schema definition
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn unknown_fields(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }

    /// Returns a copy with a different unknown-field policy. Nested schemas
    /// keep their own policy.
    pub fn with_unknown_fields(&self, policy: UnknownFieldPolicy) -> Schema {
        Schema {
            unknown_fields: policy,
            ..self.clone()
        }
    }
}
