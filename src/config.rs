//! Validator configuration
//!
//! Loaded once at startup from a JSON file. Every key is optional:
//!
//! ```json
//! {
//!   "schema_dir": "./schemas",
//!   "unknown_fields": "reject",
//!   "register_catalog": true,
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::schema::{SchemaError, SchemaRegistry, UnknownFieldPolicy};

/// Configuration errors. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {reason}")]
    Parse { path: String, reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "config_io",
            ConfigError::Parse { .. } => "config_invalid",
            ConfigError::Schema(e) => e.code(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Directory of JSON schema definitions loaded at startup (default: none)
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,

    /// Unknown-field policy for the built-in catalog (default: ignore)
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,

    /// Whether the built-in person catalog is registered (default: true)
    #[serde(default = "default_register_catalog")]
    pub register_catalog: bool,

    /// Minimum log severity (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_register_catalog() -> bool {
    true
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            schema_dir: None,
            unknown_fields: UnknownFieldPolicy::default(),
            register_catalog: default_register_catalog(),
            log_level: default_log_level(),
        }
    }
}

impl ValidatorConfig {
    /// Parses configuration from JSON text
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            reason: e.to_string(),
        })
    }

    /// Loads configuration from a file and applies its log level.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: display.clone(),
            reason: e.to_string(),
        })?;

        Logger::set_min_severity(config.log_level);
        let policy = config.unknown_fields.to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", display.as_str()), ("unknown_fields", policy.as_str())],
        );
        Ok(config)
    }

    /// Builds the schema registry this configuration describes: the catalog
    /// (when enabled) followed by every definition in `schema_dir`.
    pub fn build_registry(&self) -> ConfigResult<SchemaRegistry> {
        let mut registry = match &self.schema_dir {
            Some(dir) => SchemaRegistry::with_dir(dir),
            None => SchemaRegistry::new(),
        };
        if self.register_catalog {
            Catalog::new(self.unknown_fields)?.register_into(&mut registry)?;
        }
        registry.load_dir()?;
        Ok(registry)
    }
}

impl SchemaRegistry {
    /// See [`ValidatorConfig::build_registry`].
    pub fn from_config(config: &ValidatorConfig) -> ConfigResult<Self> {
        config.build_registry()
    }
}
