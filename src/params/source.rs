//! Per-source raw input mappings

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{ValidationError, ValidationErrors};

/// Where a request parameter came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSource {
    Path,
    Query,
    Body,
}

impl ParamSource {
    /// Merge order used by `RequestParams::combined`
    pub const ALL: [ParamSource; 3] = [ParamSource::Path, ParamSource::Query, ParamSource::Body];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamSource::Path => "path",
            ParamSource::Query => "query",
            ParamSource::Body => "body",
        }
    }
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw, unvalidated parameters of one request, kept apart by source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    path: Map<String, Value>,
    query: Map<String, Value>,
    body: Map<String, Value>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, source: ParamSource, values: Map<String, Value>) -> Self {
        *self.group_mut(source) = values;
        self
    }

    pub fn insert(&mut self, source: ParamSource, key: impl Into<String>, value: Value) {
        self.group_mut(source).insert(key.into(), value);
    }

    /// One source's mapping, validated on its own by the caller
    pub fn group(&self, source: ParamSource) -> &Map<String, Value> {
        match source {
            ParamSource::Path => &self.path,
            ParamSource::Query => &self.query,
            ParamSource::Body => &self.body,
        }
    }

    fn group_mut(&mut self, source: ParamSource) -> &mut Map<String, Value> {
        match source {
            ParamSource::Path => &mut self.path,
            ParamSource::Query => &mut self.query,
            ParamSource::Body => &mut self.body,
        }
    }

    /// Merges every source into a single raw input.
    ///
    /// # Errors
    ///
    /// One `field_collision` per key supplied by more than one source.
    pub fn combined(&self) -> Result<Map<String, Value>, ValidationErrors> {
        let mut combined = Map::new();
        let mut owners: Vec<(String, ParamSource)> = Vec::new();
        let mut errors = ValidationErrors::new();

        for source in ParamSource::ALL {
            for (key, value) in self.group(source) {
                if let Some((_, first)) = owners.iter().find(|(k, _)| k == key) {
                    errors.push(ValidationError::collision(
                        key.as_str(),
                        format!("supplied by both {} and {}", first, source),
                        value.clone(),
                    ));
                    continue;
                }
                owners.push((key.clone(), source));
                combined.insert(key.clone(), value.clone());
            }
        }

        if errors.is_empty() {
            Ok(combined)
        } else {
            Err(errors)
        }
    }
}
