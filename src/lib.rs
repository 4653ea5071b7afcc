//! fieldgate - declarative schema validation for request data
//!
//! Schemas are declared once, checked for self-consistency, and then used to
//! turn untyped raw mappings into typed instances or a complete list of
//! field-level errors.

pub mod api;
pub mod catalog;
pub mod config;
pub mod observability;
pub mod params;
pub mod schema;

pub use config::{ConfigError, ValidatorConfig};
pub use schema::{
    merge, validate, validate_value, FieldDef, FieldValue, Schema, SchemaError, SchemaRegistry,
    ValidatedInstance, ValidationError, ValidationErrors,
};
