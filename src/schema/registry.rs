//! Schema registry
//!
//! Schemas are registered once at startup, programmatically or from a
//! directory of JSON definitions (`schema_<name>.json`), and are immutable
//! thereafter. Lookups hand out `Arc<Schema>` so any number of concurrent
//! validation calls can share one schema without locking.
//!
//! Any malformed or invalid schema file is fatal: the registry must not be
//! used until it is fixed.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};

use super::definition::SchemaDefinition;
use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Name-keyed registry of compiled schemas
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    /// Directory containing schema definition files, if any
    schema_dir: Option<PathBuf>,
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Creates an empty in-memory registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry backed by a definition directory.
    pub fn with_dir(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: Some(schema_dir.into()),
            schemas: HashMap::new(),
        }
    }

    /// Registers a compiled schema under its name.
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` if the name is taken; registered schemas are
    /// immutable.
    pub fn register(&mut self, schema: impl Into<Arc<Schema>>) -> SchemaResult<Arc<Schema>> {
        let schema = schema.into();
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::AlreadyRegistered(schema.name().to_string()));
        }

        let field_count = schema.fields().len().to_string();
        let policy = schema.unknown_fields().to_string();
        log_event_with_fields(
            Event::SchemaRegistered,
            &[
                ("schema", schema.name()),
                ("fields", field_count.as_str()),
                ("unknown_fields", policy.as_str()),
            ],
        );

        self.schemas
            .insert(schema.name().to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Compiles and registers a declarative definition.
    pub fn register_definition(&mut self, definition: &SchemaDefinition) -> SchemaResult<Arc<Schema>> {
        let schema = compile_definition(definition)?;
        self.register(schema)
    }

    /// Loads every `*.json` definition in the schema directory.
    ///
    /// Returns the number of schemas loaded. A missing directory holds no
    /// schemas; a registry without a directory loads nothing. Every file is
    /// parsed and compiled before any is registered, so a failure leaves the
    /// registry unchanged.
    pub fn load_dir(&mut self) -> SchemaResult<usize> {
        let Some(dir) = self.schema_dir.clone() else {
            return Ok(0);
        };
        if !dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            SchemaError::malformed_file(
                dir.display().to_string(),
                format!("failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_file(
                    dir.display().to_string(),
                    format!("failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // Deterministic registration order
        paths.sort();

        let mut staged: Vec<Arc<Schema>> = Vec::with_capacity(paths.len());
        for path in &paths {
            let schema = compile_definition(&read_definition(path)?)?;
            let taken = self.schemas.contains_key(schema.name())
                || staged.iter().any(|s| s.name() == schema.name());
            if taken {
                return Err(SchemaError::AlreadyRegistered(schema.name().to_string()));
            }
            staged.push(schema);
        }
        for schema in staged {
            self.register(schema)?;
        }

        let count = paths.len().to_string();
        let dir_display = dir.display().to_string();
        log_event_with_fields(
            Event::SchemasLoaded,
            &[("count", count.as_str()), ("dir", dir_display.as_str())],
        );
        Ok(paths.len())
    }

    /// Writes a schema's definition to `schema_<name>.json` in the schema
    /// directory, refusing to overwrite an existing file.
    pub fn save_definition(&self, schema: &Schema) -> SchemaResult<PathBuf> {
        let dir = self.schema_dir.as_ref().ok_or_else(|| {
            SchemaError::malformed_file("<in-memory>", "registry has no schema directory")
        })?;
        let path = dir.join(format!("schema_{}.json", schema.name()));
        let display = path.display().to_string();

        if path.exists() {
            return Err(SchemaError::AlreadyRegistered(schema.name().to_string()));
        }

        fs::create_dir_all(dir).map_err(|e| {
            SchemaError::malformed_file(
                dir.display().to_string(),
                format!("failed to create schema directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(&schema.to_definition())
            .map_err(|e| SchemaError::malformed_file(&display, format!("failed to serialize: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| SchemaError::malformed_file(&display, format!("failed to write file: {}", e)))?;

        Ok(path)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// Like `get`, but a missing schema is an `UnknownSchema` error.
    pub fn require(&self, name: &str) -> SchemaResult<Arc<Schema>> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered schema names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn read_definition(path: &Path) -> SchemaResult<SchemaDefinition> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| {
        SchemaError::malformed_file(&display, format!("failed to read file: {}", e))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| SchemaError::malformed_file(&display, format!("invalid JSON: {}", e)))
}

/// Compiles a definition, logging the rejection if it fails the authoring pass.
fn compile_definition(definition: &SchemaDefinition) -> SchemaResult<Arc<Schema>> {
    Arc::<Schema>::try_from(definition).map_err(|e| {
        let reason = e.to_string();
        log_event_with_fields(
            Event::SchemaRejected,
            &[("schema", definition.name.as_str()), ("reason", reason.as_str())],
        );
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;
    use tempfile::TempDir;

    fn sample_schema() -> Schema {
        Schema::builder("location")
            .field(FieldDef::string("city").min_length(1))
            .field(FieldDef::string("country").min_length(1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register(sample_schema()).unwrap();

        let schema = registry.get("location").unwrap();
        assert_eq!(schema.name(), "location");
        assert!(registry.contains("location"));
        assert_eq!(registry.names(), ["location"]);
    }

    #[test]
    fn test_schema_immutability() {
        let mut registry = SchemaRegistry::new();
        registry.register(sample_schema()).unwrap();

        let err = registry.register(sample_schema()).unwrap_err();
        assert_eq!(err.code(), "schema_immutable");
    }

    #[test]
    fn test_unknown_schema() {
        let registry = SchemaRegistry::new();
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.require("missing").unwrap_err().code(), "unknown_schema");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let registry = SchemaRegistry::with_dir(temp_dir.path().join("schemas"));
        let path = registry.save_definition(&sample_schema()).unwrap();
        assert!(path.ends_with("schema_location.json"));

        let mut reloaded = SchemaRegistry::with_dir(temp_dir.path().join("schemas"));
        assert_eq!(reloaded.load_dir().unwrap(), 1);
        assert_eq!(*reloaded.require("location").unwrap(), sample_schema());
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let registry = SchemaRegistry::with_dir(temp_dir.path());
        registry.save_definition(&sample_schema()).unwrap();
        assert!(registry.save_definition(&sample_schema()).is_err());
    }

    #[test]
    fn test_load_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = SchemaRegistry::with_dir(temp_dir.path().join("absent"));
        assert_eq!(registry.load_dir().unwrap(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_schema_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("schema_bad.json"),
            r#"{"name": "bad", "fields": [
                {"name": "n", "kind": "string", "min_length": 5, "max_length": 1}
            ]}"#,
        )
        .unwrap();

        let mut registry = SchemaRegistry::with_dir(temp_dir.path());
        let err = registry.load_dir().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.code(), "invalid_schema");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_load_registers_nothing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("schema_a.json"),
            r#"{"name": "a", "fields": [{"name": "n", "kind": "string"}]}"#,
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("schema_b.json"),
            r#"{"name": "b", "fields": [{"name": "n", "kind": "enum", "allowed_values": []}]}"#,
        )
        .unwrap();

        let mut registry = SchemaRegistry::with_dir(temp_dir.path());
        let err = registry.load_dir().unwrap_err();
        assert_eq!(err.code(), "invalid_schema");
        assert!(registry.is_empty());
        assert!(!registry.contains("a"));
    }

    #[test]
    fn test_duplicate_names_across_files_register_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let definition = r#"{"name": "tag", "fields": [{"name": "label", "kind": "string"}]}"#;
        fs::write(temp_dir.path().join("schema_tag.json"), definition).unwrap();
        fs::write(temp_dir.path().join("schema_tag_copy.json"), definition).unwrap();

        let mut registry = SchemaRegistry::with_dir(temp_dir.path());
        assert_eq!(registry.load_dir().unwrap_err().code(), "schema_immutable");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("schema_broken.json"), "{ not json").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = SchemaRegistry::with_dir(temp_dir.path());
        let err = registry.load_dir().unwrap_err();
        assert_eq!(err.code(), "malformed_schema_file");
        assert!(err.is_fatal());
    }
}
