//! Fluent schema construction and the schema-authoring pass
//!
//! `SchemaBuilder::build` is the only way to obtain a `Schema`. Every
//! self-contradictory definition is rejected here with `invalid_schema`, so
//! request-time validation can assume a well-formed schema.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult, ValidationErrors};
use super::instance::FieldValue;
use super::types::{Field, FieldKind, FieldMeta, Schema, UnknownFieldPolicy};
use super::validator::check_value;

/// Authoring-side field descriptor
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
    meta: FieldMeta,
    /// Problems recorded before `build`, such as misplaced constraints
    issues: Vec<String>,
}

impl FieldDef {
    fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            meta: FieldMeta::default(),
            issues: Vec::new(),
        }
    }

    /// Create a required string field
    pub fn string(name: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            FieldKind::String {
                min_length: None,
                max_length: None,
            },
        )
    }

    /// Create a required integer field
    pub fn integer(name: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            FieldKind::Integer {
                greater_than: None,
                less_or_equal: None,
            },
        )
    }

    /// Create a required boolean field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Boolean)
    }

    /// Create a required enum field over the given allowed values
    pub fn enumeration<I, S>(name: impl Into<String>, allowed_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(
            name,
            FieldKind::Enum {
                allowed_values: allowed_values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Create a required nested-object field
    pub fn object(name: impl Into<String>, schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_kind(
            name,
            FieldKind::Object {
                schema: schema.into(),
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inclusive lower length bound (string fields)
    pub fn min_length(mut self, n: usize) -> Self {
        match &mut self.kind {
            FieldKind::String { min_length, .. } => *min_length = Some(n),
            _ => self.misplaced("min_length"),
        }
        self
    }

    /// Inclusive upper length bound (string fields)
    pub fn max_length(mut self, n: usize) -> Self {
        match &mut self.kind {
            FieldKind::String { max_length, .. } => *max_length = Some(n),
            _ => self.misplaced("max_length"),
        }
        self
    }

    /// Exclusive lower bound (integer fields)
    pub fn greater_than(mut self, n: i64) -> Self {
        match &mut self.kind {
            FieldKind::Integer { greater_than, .. } => *greater_than = Some(n),
            _ => self.misplaced("greater_than"),
        }
        self
    }

    /// Inclusive upper bound (integer fields)
    pub fn less_or_equal(mut self, n: i64) -> Self {
        match &mut self.kind {
            FieldKind::Integer { less_or_equal, .. } => *less_or_equal = Some(n),
            _ => self.misplaced("less_or_equal"),
        }
        self
    }

    /// Optional with a null default
    pub fn optional(mut self) -> Self {
        self.required = false;
        self.default = None;
        self
    }

    /// Optional with the given default
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.required = false;
        self.default = Some(value.into());
        self
    }

    /// Mark required. Combined with a default this fails at build time.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.meta.example = Some(example.into());
        self
    }

    /// Records an authoring problem found outside the builder
    pub(crate) fn issue(mut self, problem: String) -> Self {
        self.issues.push(problem);
        self
    }

    fn misplaced(&mut self, constraint: &str) {
        self.issues.push(format!(
            "constraint '{}' does not apply to {} field '{}'",
            constraint,
            self.kind.type_name(),
            self.name
        ));
    }

    /// Runs the authoring checks for this field and compiles it.
    fn compile(self, problems: &mut Vec<String>) -> Option<Field> {
        let before = problems.len();
        problems.extend(self.issues.iter().cloned());

        if self.name.is_empty() {
            problems.push("field name must not be empty".into());
        }

        match &self.kind {
            FieldKind::String {
                min_length: Some(min),
                max_length: Some(max),
            } if min > max => problems.push(format!(
                "field '{}': min_length {} exceeds max_length {}",
                self.name, min, max
            )),
            FieldKind::Integer {
                greater_than: Some(gt),
                less_or_equal: Some(le),
            } if le <= gt => problems.push(format!(
                "field '{}': no integer is greater than {} and at most {}",
                self.name, gt, le
            )),
            FieldKind::Enum { allowed_values } => {
                if allowed_values.is_empty() {
                    problems.push(format!("field '{}': enum has no allowed values", self.name));
                }
                let mut seen = HashSet::new();
                for value in allowed_values {
                    if !seen.insert(value) {
                        problems.push(format!(
                            "field '{}': duplicate allowed value '{}'",
                            self.name, value
                        ));
                    }
                }
            }
            _ => {}
        }

        let default = match (&self.default, self.required) {
            (Some(_), true) => {
                problems.push(format!(
                    "field '{}' is required and cannot declare a default",
                    self.name
                ));
                FieldValue::Null
            }
            (None, _) | (Some(Value::Null), false) => FieldValue::Null,
            (Some(value), false) => {
                let mut errors = ValidationErrors::new();
                match check_value(&self.kind, value, &self.name, &mut errors) {
                    Some(resolved) => resolved,
                    None => {
                        problems.push(format!(
                            "default for field '{}' is invalid: {}",
                            self.name, errors
                        ));
                        FieldValue::Null
                    }
                }
            }
        };

        if problems.len() > before {
            return None;
        }

        Some(Field {
            name: self.name,
            kind: self.kind,
            required: self.required,
            default,
            meta: self.meta,
        })
    }
}

/// Collects field definitions in declaration order
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDef>,
    unknown_fields: UnknownFieldPolicy,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            unknown_fields: UnknownFieldPolicy::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Runs the schema-authoring pass.
    ///
    /// # Errors
    ///
    /// `SchemaError::InvalidSchema` listing every authoring problem found.
    pub fn build(self) -> SchemaResult<Schema> {
        let mut problems = Vec::new();

        if self.name.is_empty() {
            problems.push("schema name must not be empty".to_string());
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                problems.push(format!("duplicate field name '{}'", field.name));
            }
        }

        let compiled: Vec<Field> = self
            .fields
            .into_iter()
            .filter_map(|field| field.compile(&mut problems))
            .collect();

        if !problems.is_empty() {
            return Err(SchemaError::invalid(self.name, problems.join("; ")));
        }

        Ok(Schema {
            name: self.name,
            description: self.description,
            fields: compiled,
            unknown_fields: self.unknown_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expect_invalid(builder: SchemaBuilder, needle: &str) {
        let err = builder.build().unwrap_err();
        assert_eq!(err.code(), "invalid_schema");
        assert!(err.is_fatal());
        assert!(err.to_string().contains(needle), "{} missing '{}'", err, needle);
    }

    #[test]
    fn test_build_valid_schema() {
        let schema = Schema::builder("person")
            .description("A person")
            .field(FieldDef::string("first_name").min_length(1).max_length(50))
            .field(FieldDef::integer("age").greater_than(0).less_or_equal(115))
            .field(FieldDef::enumeration("hair_color", ["white", "brown"]).optional())
            .build()
            .unwrap();
        assert_eq!(schema.description(), Some("A person"));
        let names: Vec<_> = schema.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["first_name", "age", "hair_color"]);
    }

    #[test]
    fn test_min_length_above_max_length() {
        expect_invalid(
            Schema::builder("s").field(FieldDef::string("name").min_length(10).max_length(5)),
            "min_length 10 exceeds max_length 5",
        );
    }

    #[test]
    fn test_empty_integer_range() {
        expect_invalid(
            Schema::builder("s").field(FieldDef::integer("age").greater_than(5).less_or_equal(5)),
            "no integer",
        );
    }

    #[test]
    fn test_numeric_constraint_on_string_field() {
        expect_invalid(
            Schema::builder("s").field(FieldDef::string("name").greater_than(0)),
            "'greater_than' does not apply to string field 'name'",
        );
    }

    #[test]
    fn test_length_constraint_on_boolean_field() {
        expect_invalid(
            Schema::builder("s").field(FieldDef::boolean("flag").max_length(3)),
            "'max_length' does not apply to boolean",
        );
    }

    #[test]
    fn test_duplicate_field_names() {
        expect_invalid(
            Schema::builder("s")
                .field(FieldDef::string("name"))
                .field(FieldDef::integer("name")),
            "duplicate field name 'name'",
        );
    }

    #[test]
    fn test_empty_enum() {
        expect_invalid(
            Schema::builder("s").field(FieldDef::enumeration("color", Vec::<String>::new())),
            "no allowed values",
        );
    }

    #[test]
    fn test_empty_field_name() {
        expect_invalid(
            Schema::builder("s").field(FieldDef::string("")),
            "field name must not be empty",
        );
    }

    #[test]
    fn test_empty_schema_name() {
        expect_invalid(
            Schema::builder("").field(FieldDef::string("name")),
            "schema name must not be empty",
        );
    }

    #[test]
    fn test_duplicate_allowed_value() {
        expect_invalid(
            Schema::builder("s").field(FieldDef::enumeration("color", ["red", "blue", "red"])),
            "field 'color': duplicate allowed value 'red'",
        );
    }

    #[test]
    fn test_required_with_default() {
        expect_invalid(
            Schema::builder("s").field(FieldDef::integer("age").default_value(3).required()),
            "cannot declare a default",
        );
    }

    #[test]
    fn test_default_must_satisfy_constraints() {
        expect_invalid(
            Schema::builder("s").field(
                FieldDef::integer("age")
                    .greater_than(0)
                    .default_value(0),
            ),
            "default for field 'age' is invalid",
        );
        expect_invalid(
            Schema::builder("s").field(FieldDef::enumeration("c", ["a"]).default_value("b")),
            "default for field 'c'",
        );
    }

    #[test]
    fn test_valid_default_is_resolved() {
        let schema = Schema::builder("s")
            .field(FieldDef::enumeration("color", ["red", "blue"]).default_value("red"))
            .field(FieldDef::integer("limit").less_or_equal(100).default_value(10))
            .build()
            .unwrap();
        assert_eq!(
            schema.field("color").unwrap().default(),
            &FieldValue::Enum("red".into())
        );
        assert_eq!(schema.field("limit").unwrap().default(), &FieldValue::Integer(10));
    }

    #[test]
    fn test_metadata_is_kept() {
        let schema = Schema::builder("q")
            .field(
                FieldDef::string("name")
                    .optional()
                    .title("Person Name")
                    .description("Between 1 and 50 chars")
                    .example(json!("Rocio")),
            )
            .build()
            .unwrap();
        let meta = schema.field("name").unwrap().meta();
        assert_eq!(meta.title.as_deref(), Some("Person Name"));
        assert_eq!(meta.example, Some(json!("Rocio")));
    }

    #[test]
    fn test_all_problems_reported() {
        let err = Schema::builder("")
            .field(FieldDef::string("a").min_length(2).max_length(1))
            .field(FieldDef::integer("b").min_length(1))
            .build()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("schema name must not be empty"));
        assert!(message.contains("min_length 2 exceeds"));
        assert!(message.contains("'min_length' does not apply to integer"));
    }
}
