//! Declarative schema validation
//!
//! A `Schema` is defined once (builder or JSON definition), checked by the
//! schema-authoring pass, and is immutable thereafter. `validate` turns an
//! untyped raw mapping into either a `ValidatedInstance` or the complete,
//! ordered list of field-level `ValidationError`s.
//!
//! # Design Principles
//!
//! - Strict typing, no implicit coercion
//! - Full error collection, never first-error-only
//! - Self-contradictory schemas are rejected before they can be used (FATAL)
//! - Validation is pure and deterministic
//! - Documentation metadata never affects validation outcome

mod builder;
mod definition;
mod errors;
mod instance;
mod merge;
mod registry;
mod types;
mod validator;

pub use builder::{FieldDef, SchemaBuilder};
pub use definition::{FieldDefinition, KindName, SchemaDefinition};
pub use errors::{
    ErrorReason, SchemaError, SchemaResult, Severity, ValidationError, ValidationErrors,
};
pub use instance::{FieldValue, ValidatedInstance};
pub use merge::merge;
pub use registry::SchemaRegistry;
pub use types::{Field, FieldKind, FieldMeta, Schema, UnknownFieldPolicy};
pub use validator::{validate, validate_value, ROOT_PATH};
