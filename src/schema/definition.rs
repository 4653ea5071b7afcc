//! Declarative (JSON) schema definitions
//!
//! A schema file looks like:
//!
//! ```json
//! {
//!   "name": "person",
//!   "unknown_fields": "ignore",
//!   "fields": [
//!     {"name": "first_name", "kind": "string", "min_length": 1, "max_length": 50},
//!     {"name": "age", "kind": "integer", "greater_than": 0, "less_or_equal": 115},
//!     {"name": "hair_color", "kind": "enum", "required": false,
//!      "allowed_values": ["white", "brown", "black", "blonde", "red"]}
//!   ]
//! }
//! ```
//!
//! Constraints are flat keys; a constraint that does not belong to the
//! field's kind is an `invalid_schema` error, as is any unrecognized key.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::builder::FieldDef;
use super::errors::{SchemaError, SchemaResult};
use super::instance::FieldValue;
use super::types::{Field, FieldKind, Schema, UnknownFieldPolicy};

/// Field kind tag used in definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindName {
    String,
    Integer,
    Boolean,
    Enum,
    Object,
}

/// Serializable schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
    pub fields: Vec<FieldDefinition>,
}

/// Serializable field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: KindName,
    #[serde(default = "default_required")]
    pub required: bool,
    /// `Some(Value::Null)` when the key is present with an explicit null
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less_or_equal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<SchemaDefinition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

fn default_required() -> bool {
    true
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl SchemaDefinition {
    /// Parses a definition from JSON text
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SchemaError::invalid("<definition>", format!("invalid JSON: {}", e)))
    }

    /// Compiles the definition, running the full schema-authoring pass
    pub fn compile(&self) -> SchemaResult<Schema> {
        let mut builder = Schema::builder(&self.name).unknown_fields(self.unknown_fields);
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        for field in &self.fields {
            builder = builder.field(field.to_field_def());
        }
        builder.build()
    }
}

impl FieldDefinition {
    /// Problems the builder cannot see from a `FieldDef` alone are attached
    /// as issues, so `build` reports them with every other authoring problem.
    fn to_field_def(&self) -> FieldDef {
        let mut def = match self.kind {
            KindName::String => FieldDef::string(&self.name),
            KindName::Integer => FieldDef::integer(&self.name),
            KindName::Boolean => FieldDef::boolean(&self.name),
            // A missing list compiles as an empty enum, which the builder rejects
            KindName::Enum => {
                FieldDef::enumeration(&self.name, self.allowed_values.clone().unwrap_or_default())
            }
            KindName::Object => match self.schema.as_ref().map(|nested| nested.compile()) {
                Some(Ok(nested)) => FieldDef::object(&self.name, nested),
                Some(Err(e)) => FieldDef::object(&self.name, Schema::placeholder())
                    .issue(format!("nested schema of field '{}': {}", self.name, e)),
                None => FieldDef::object(&self.name, Schema::placeholder())
                    .issue(format!("object field '{}' must declare a nested schema", self.name)),
            },
        };

        // Misplaced constraints are recorded by the builder and reported at build
        if let Some(n) = self.min_length {
            def = def.min_length(n);
        }
        if let Some(n) = self.max_length {
            def = def.max_length(n);
        }
        if let Some(n) = self.greater_than {
            def = def.greater_than(n);
        }
        if let Some(n) = self.less_or_equal {
            def = def.less_or_equal(n);
        }
        if self.allowed_values.is_some() && self.kind != KindName::Enum {
            def = def.issue(format!(
                "constraint 'allowed_values' does not apply to field '{}'",
                self.name
            ));
        }
        if self.schema.is_some() && self.kind != KindName::Object {
            def = def.issue(format!("nested 'schema' does not apply to field '{}'", self.name));
        }

        def = match (&self.default, self.required) {
            (Some(value), false) => def.default_value(value.clone()),
            (None, false) => def.optional(),
            (Some(value), true) => def.default_value(value.clone()).required(),
            (None, true) => def,
        };

        if let Some(title) = &self.title {
            def = def.title(title);
        }
        if let Some(description) = &self.description {
            def = def.description(description);
        }
        if let Some(example) = &self.example {
            def = def.example(example.clone());
        }
        def
    }

    fn from_field(field: &Field) -> Self {
        let mut def = FieldDefinition {
            name: field.name.clone(),
            kind: KindName::String,
            required: field.required,
            default: match &field.default {
                FieldValue::Null => None,
                other => Some(other.to_json()),
            },
            min_length: None,
            max_length: None,
            greater_than: None,
            less_or_equal: None,
            allowed_values: None,
            schema: None,
            title: field.meta.title.clone(),
            description: field.meta.description.clone(),
            example: field.meta.example.clone(),
        };
        match &field.kind {
            FieldKind::String {
                min_length,
                max_length,
            } => {
                def.min_length = *min_length;
                def.max_length = *max_length;
            }
            FieldKind::Integer {
                greater_than,
                less_or_equal,
            } => {
                def.kind = KindName::Integer;
                def.greater_than = *greater_than;
                def.less_or_equal = *less_or_equal;
            }
            FieldKind::Boolean => def.kind = KindName::Boolean,
            FieldKind::Enum { allowed_values } => {
                def.kind = KindName::Enum;
                def.allowed_values = Some(allowed_values.clone());
            }
            FieldKind::Object { schema } => {
                def.kind = KindName::Object;
                def.schema = Some(Box::new(schema.to_definition()));
            }
        }
        def
    }
}

impl Schema {
    /// Stand-in nested schema for an object field whose own schema is absent
    /// or invalid; the field carries an issue, so it never reaches a build.
    fn placeholder() -> Schema {
        Schema {
            name: String::new(),
            description: None,
            fields: Vec::new(),
            unknown_fields: UnknownFieldPolicy::default(),
        }
    }

    /// Converts back to the declarative form, documentation metadata included.
    ///
    /// This is what an interface-description generator consumes.
    pub fn to_definition(&self) -> SchemaDefinition {
        SchemaDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            unknown_fields: self.unknown_fields,
            fields: self.fields.iter().map(FieldDefinition::from_field).collect(),
        }
    }
}

impl TryFrom<&SchemaDefinition> for Arc<Schema> {
    type Error = SchemaError;

    fn try_from(definition: &SchemaDefinition) -> SchemaResult<Self> {
        definition.compile().map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PERSON: &str = r#"{
        "name": "person",
        "fields": [
            {"name": "first_name", "kind": "string", "min_length": 1, "max_length": 50,
             "title": "First name", "example": "Rocio"},
            {"name": "age", "kind": "integer", "greater_than": 0, "less_or_equal": 115},
            {"name": "hair_color", "kind": "enum", "required": false,
             "allowed_values": ["white", "brown", "black", "blonde", "red"]},
            {"name": "is_married", "kind": "boolean", "required": false},
            {"name": "location", "kind": "object", "required": false, "schema": {
                "name": "location",
                "unknown_fields": "reject",
                "fields": [{"name": "city", "kind": "string"}]
            }}
        ]
    }"#;

    #[test]
    fn test_compile_definition() {
        let schema = SchemaDefinition::from_json(PERSON).unwrap().compile().unwrap();
        assert_eq!(schema.name(), "person");
        assert_eq!(schema.fields().len(), 5);
        assert_eq!(schema.unknown_fields(), UnknownFieldPolicy::Ignore);
        assert_eq!(
            schema.field("age").unwrap().kind(),
            &FieldKind::Integer {
                greater_than: Some(0),
                less_or_equal: Some(115)
            }
        );
        match schema.field("location").unwrap().kind() {
            FieldKind::Object { schema } => {
                assert_eq!(schema.unknown_fields(), UnknownFieldPolicy::Reject)
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_definition_round_trip_keeps_metadata() {
        let definition = SchemaDefinition::from_json(PERSON).unwrap();
        let schema = definition.compile().unwrap();
        let back = schema.to_definition();
        assert_eq!(back, definition);
        assert_eq!(back.fields[0].title.as_deref(), Some("First name"));
        assert_eq!(back.fields[0].example, Some(json!("Rocio")));
    }

    #[test]
    fn test_numeric_constraint_on_string_rejected() {
        let json = r#"{"name": "s", "fields": [
            {"name": "name", "kind": "string", "greater_than": 0}
        ]}"#;
        let err = SchemaDefinition::from_json(json).unwrap().compile().unwrap_err();
        assert_eq!(err.code(), "invalid_schema");
        assert!(err.to_string().contains("greater_than"));
    }

    #[test]
    fn test_allowed_values_on_integer_rejected() {
        let json = r#"{"name": "s", "fields": [
            {"name": "n", "kind": "integer", "allowed_values": ["1"]}
        ]}"#;
        let err = SchemaDefinition::from_json(json).unwrap().compile().unwrap_err();
        assert!(err.to_string().contains("allowed_values"));
    }

    #[test]
    fn test_enum_requires_allowed_values() {
        let json = r#"{"name": "s", "fields": [{"name": "c", "kind": "enum"}]}"#;
        let err = SchemaDefinition::from_json(json).unwrap().compile().unwrap_err();
        assert!(err.to_string().contains("enum has no allowed values"));
    }

    #[test]
    fn test_every_definition_problem_reported() {
        let json = r#"{"name": "s", "fields": [
            {"name": "c", "kind": "enum"},
            {"name": "code", "kind": "string", "min_length": 5, "max_length": 1},
            {"name": "flag", "kind": "boolean", "schema": {"name": "x", "fields": []}},
            {"name": "home", "kind": "object"},
            {"name": "site", "kind": "object", "schema": {"name": "site", "fields": [
                {"name": "zip", "kind": "integer", "greater_than": 9, "less_or_equal": 1}
            ]}}
        ]}"#;
        let err = SchemaDefinition::from_json(json).unwrap().compile().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("field 'c': enum has no allowed values"), "{}", message);
        assert!(message.contains("min_length 5 exceeds max_length 1"), "{}", message);
        assert!(message.contains("nested 'schema' does not apply to field 'flag'"), "{}", message);
        assert!(message.contains("object field 'home' must declare a nested schema"), "{}", message);
        assert!(message.contains("nested schema of field 'site'"), "{}", message);
    }

    #[test]
    fn test_required_with_explicit_null_default_rejected() {
        let json = r#"{"name": "s", "fields": [
            {"name": "n", "kind": "integer", "default": null}
        ]}"#;
        let definition = SchemaDefinition::from_json(json).unwrap();
        assert_eq!(definition.fields[0].default, Some(Value::Null));
        let err = definition.compile().unwrap_err();
        assert!(err.to_string().contains("cannot declare a default"));
    }

    #[test]
    fn test_optional_with_explicit_null_default() {
        let json = r#"{"name": "s", "fields": [
            {"name": "n", "kind": "integer", "required": false, "default": null}
        ]}"#;
        let schema = SchemaDefinition::from_json(json).unwrap().compile().unwrap();
        assert!(schema.field("n").unwrap().default().is_null());
        assert!(!schema.field("n").unwrap().is_required());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let json = r#"{"name": "s", "fields": [{"name": "c", "kind": "string", "pattern": "x"}]}"#;
        let err = SchemaDefinition::from_json(json).unwrap_err();
        assert_eq!(err.code(), "invalid_schema");
    }

    #[test]
    fn test_required_with_default_rejected() {
        let json = r#"{"name": "s", "fields": [
            {"name": "n", "kind": "integer", "default": 4}
        ]}"#;
        let err = SchemaDefinition::from_json(json).unwrap().compile().unwrap_err();
        assert!(err.to_string().contains("cannot declare a default"));
    }

    #[test]
    fn test_try_from_into_arc() {
        let definition = SchemaDefinition::from_json(PERSON).unwrap();
        let schema: Arc<Schema> = Arc::try_from(&definition).unwrap();
        assert_eq!(schema.name(), "person");
    }
}
