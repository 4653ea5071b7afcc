//! Schema and validation error types
//!
//! Two families live here:
//! - `SchemaError`: authoring and registry failures. `invalid_schema` is FATAL,
//!   a schema carrying it must never reach request handling.
//! - `ValidationError`: one entry per failing field, collected (never fatal)
//!   into `ValidationErrors` so every problem is reported in one round trip.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller input rejected, process continues
    Reject,
    /// Configuration is unusable until fixed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema authoring and registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Self-contradictory or malformed schema definition
    #[error("invalid schema '{schema}': {reason}")]
    InvalidSchema { schema: String, reason: String },

    /// A schema with this name is already registered
    #[error("schema '{0}' is already registered and immutable")]
    AlreadyRegistered(String),

    /// No schema registered under this name
    #[error("schema '{0}' not found")]
    UnknownSchema(String),

    /// Schema file could not be read, parsed or written
    #[error("malformed schema file '{path}': {reason}")]
    MalformedFile { path: String, reason: String },
}

impl SchemaError {
    /// Create an invalid schema error
    pub fn invalid(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidSchema {
            schema: schema.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed file error
    pub fn malformed_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::MalformedFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidSchema { .. } => "invalid_schema",
            SchemaError::AlreadyRegistered(_) => "schema_immutable",
            SchemaError::UnknownSchema(_) => "unknown_schema",
            SchemaError::MalformedFile { .. } => "malformed_schema_file",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaError::InvalidSchema { .. } | SchemaError::MalformedFile { .. } => {
                Severity::Fatal
            }
            SchemaError::AlreadyRegistered(_) | SchemaError::UnknownSchema(_) => Severity::Reject,
        }
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Why a single field failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// Required field absent
    Missing,
    /// Value has the wrong representation for the field kind
    TypeError,
    /// String length outside its inclusive bounds
    LengthError,
    /// Integer outside its (exclusive lower, inclusive upper) bounds
    RangeError,
    /// Value not in the allowed set
    EnumError,
    /// Input key not declared by a schema that rejects unknown fields
    UnexpectedField,
    /// Two sources or instances supplied the same field name
    FieldCollision,
}

impl ErrorReason {
    /// Returns the string code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorReason::Missing => "missing",
            ErrorReason::TypeError => "type_error",
            ErrorReason::LengthError => "length_error",
            ErrorReason::RangeError => "range_error",
            ErrorReason::EnumError => "enum_error",
            ErrorReason::UnexpectedField => "unexpected_field",
            ErrorReason::FieldCollision => "field_collision",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field-level failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Dotted path to the field (e.g. "location.city")
    pub field_path: String,
    /// Failure category
    pub reason: ErrorReason,
    /// Human-readable explanation
    pub message: String,
    /// The raw value that failed, `null` when absent
    pub offending_value: Value,
}

impl ValidationError {
    pub fn new(
        field_path: impl Into<String>,
        reason: ErrorReason,
        message: impl Into<String>,
        offending_value: Value,
    ) -> Self {
        Self {
            field_path: field_path.into(),
            reason,
            message: message.into(),
            offending_value,
        }
    }

    pub fn missing(field_path: impl Into<String>) -> Self {
        Self::new(field_path, ErrorReason::Missing, "field required", Value::Null)
    }

    pub fn type_mismatch(field_path: impl Into<String>, expected: &str, actual: &Value) -> Self {
        Self::new(
            field_path,
            ErrorReason::TypeError,
            format!("expected {}, got {}", expected, json_type_name(actual)),
            actual.clone(),
        )
    }

    pub fn unexpected(field_path: impl Into<String>, actual: &Value) -> Self {
        Self::new(
            field_path,
            ErrorReason::UnexpectedField,
            "field is not declared by the schema",
            actual.clone(),
        )
    }

    pub fn collision(field_path: impl Into<String>, detail: impl Into<String>, value: Value) -> Self {
        Self::new(field_path, ErrorReason::FieldCollision, detail, value)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {} ({})", self.field_path, self.reason, self.message)
    }
}

/// Ordered collection of every field failure from one call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation: {}", .0.len(), summarize(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// All errors addressed at exactly `field_path`
    pub fn for_field<'a>(&'a self, field_path: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.0.iter().filter(move |e| e.field_path == field_path)
    }

    /// Whether any error carries the given reason
    pub fn has_reason(&self, reason: ErrorReason) -> bool {
        self.0.iter().any(|e| e.reason == reason)
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}={}", e.field_path, e.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
pub(crate) fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
