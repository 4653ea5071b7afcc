//! Raw input validation
//!
//! Validation semantics:
//! - Fields are checked in declaration order; errors are reported in that order
//! - Every failing field is reported, validation never stops at the first error
//! - No implicit coercion: numeric strings are not integers, 1 is not `true`
//! - Absent optional fields take their declared default
//! - Nested errors are addressed as `parent.child`
//! - Undeclared keys follow the schema's `UnknownFieldPolicy`
//!
//! The validator is pure: it neither logs nor touches shared state.

use serde_json::{Map, Value};

use super::errors::{make_path, ErrorReason, ValidationError, ValidationErrors};
use super::instance::{FieldValue, ValidatedInstance};
use super::types::{FieldKind, Schema, UnknownFieldPolicy};

/// Path reported when the root input is not a mapping
pub const ROOT_PATH: &str = "$root";

/// Validates a raw mapping against a schema.
///
/// # Errors
///
/// Returns every field-level failure, in schema declaration order followed by
/// undeclared keys (when the schema rejects them).
pub fn validate(
    schema: &Schema,
    raw: &Map<String, Value>,
) -> Result<ValidatedInstance, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    match validate_object(schema, raw, "", &mut errors) {
        Some(instance) if errors.is_empty() => Ok(instance),
        _ => Err(errors),
    }
}

/// Validates an arbitrary JSON value; anything but an object fails at `$root`.
pub fn validate_value(schema: &Schema, raw: &Value) -> Result<ValidatedInstance, ValidationErrors> {
    match raw.as_object() {
        Some(obj) => validate(schema, obj),
        None => Err(ValidationErrors::from(vec![ValidationError::type_mismatch(
            ROOT_PATH, "object", raw,
        )])),
    }
}

/// Validates an object against a schema, appending failures to `errors`.
///
/// Returns the instance only if this object (including nested objects)
/// produced no errors.
fn validate_object(
    schema: &Schema,
    obj: &Map<String, Value>,
    path_prefix: &str,
    errors: &mut ValidationErrors,
) -> Option<ValidatedInstance> {
    let before = errors.len();
    let mut entries = Vec::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let field_path = make_path(path_prefix, &field.name);

        match obj.get(&field.name) {
            None if field.required => errors.push(ValidationError::missing(field_path)),
            None => entries.push((field.name.clone(), field.default.clone())),
            Some(Value::Null) if !field.required => {
                entries.push((field.name.clone(), FieldValue::Null));
            }
            Some(value) => {
                if let Some(checked) = check_value(&field.kind, value, &field_path, errors) {
                    entries.push((field.name.clone(), checked));
                }
            }
        }
    }

    if schema.unknown_fields == UnknownFieldPolicy::Reject {
        for (key, value) in obj {
            if schema.field(key).is_none() {
                errors.push(ValidationError::unexpected(make_path(path_prefix, key), value));
            }
        }
    }

    if errors.len() > before {
        return None;
    }
    Some(ValidatedInstance::from_entries(entries))
}

/// Checks one present value against a field kind.
///
/// Also used by the schema builder to resolve declared defaults.
pub(crate) fn check_value(
    kind: &FieldKind,
    value: &Value,
    field_path: &str,
    errors: &mut ValidationErrors,
) -> Option<FieldValue> {
    match kind {
        FieldKind::String {
            min_length,
            max_length,
        } => {
            let Some(s) = value.as_str() else {
                errors.push(ValidationError::type_mismatch(field_path, "string", value));
                return None;
            };
            let len = s.chars().count();
            let too_short = min_length.is_some_and(|min| len < min);
            let too_long = max_length.is_some_and(|max| len > max);
            if too_short || too_long {
                errors.push(ValidationError::new(
                    field_path,
                    ErrorReason::LengthError,
                    format!(
                        "length {} outside bounds [{}, {}]",
                        len,
                        min_length.map_or("-".to_string(), |n| n.to_string()),
                        max_length.map_or("-".to_string(), |n| n.to_string()),
                    ),
                    value.clone(),
                ));
                return None;
            }
            Some(FieldValue::String(s.to_string()))
        }
        FieldKind::Integer {
            greater_than,
            less_or_equal,
        } => {
            // Floats, booleans and numeric strings are all rejected here
            let Some(n) = value.as_i64() else {
                let expected = if value.is_u64() {
                    "integer within 64-bit signed range"
                } else {
                    "integer"
                };
                errors.push(ValidationError::type_mismatch(field_path, expected, value));
                return None;
            };
            let too_low = greater_than.is_some_and(|gt| n <= gt);
            let too_high = less_or_equal.is_some_and(|le| n > le);
            if too_low || too_high {
                let mut bounds = Vec::new();
                if let Some(gt) = greater_than {
                    bounds.push(format!("> {}", gt));
                }
                if let Some(le) = less_or_equal {
                    bounds.push(format!("<= {}", le));
                }
                errors.push(ValidationError::new(
                    field_path,
                    ErrorReason::RangeError,
                    format!("value {} must be {}", n, bounds.join(" and ")),
                    value.clone(),
                ));
                return None;
            }
            Some(FieldValue::Integer(n))
        }
        FieldKind::Boolean => match value.as_bool() {
            Some(b) => Some(FieldValue::Boolean(b)),
            None => {
                errors.push(ValidationError::type_mismatch(field_path, "boolean", value));
                None
            }
        },
        FieldKind::Enum { allowed_values } => {
            let Some(s) = value.as_str() else {
                errors.push(ValidationError::type_mismatch(field_path, "string", value));
                return None;
            };
            if !allowed_values.iter().any(|allowed| allowed == s) {
                errors.push(ValidationError::new(
                    field_path,
                    ErrorReason::EnumError,
                    format!("value must be one of: {}", allowed_values.join(", ")),
                    value.clone(),
                ));
                return None;
            }
            Some(FieldValue::Enum(s.to_string()))
        }
        FieldKind::Object { schema } => {
            let Some(obj) = value.as_object() else {
                errors.push(ValidationError::type_mismatch(field_path, "object", value));
                return None;
            };
            validate_object(schema, obj, field_path, errors).map(FieldValue::Object)
        }
    }
}
