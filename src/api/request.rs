//! API request types
//!
//! Requests arrive as a JSON envelope:
//!
//! ```json
//! {"op": "update_person", "path": {"person_id": "7"}, "body": {"person": {...}, "location": {...}}}
//! ```
//!
//! `path` and `query` carry text exactly as an HTTP layer extracts it;
//! `body` carries JSON.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::errors::{ApiError, ApiResult};

/// Textual path or query parameters
pub type TextParams = BTreeMap<String, String>;

/// Unified request
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Home,
    CreatePerson { body: Value },
    PersonDetail { query: TextParams },
    PersonById { path: TextParams },
    UpdatePerson { path: TextParams, body: Value },
}

/// Raw request for parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRequest {
    op: String,
    #[serde(default)]
    path: TextParams,
    #[serde(default)]
    query: TextParams,
    #[serde(default)]
    body: Option<Value>,
}

impl Request {
    /// Parse a request from JSON string
    pub fn parse(json: &str) -> ApiResult<Self> {
        let raw: RawRequest = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("invalid JSON: {}", e)))?;

        match raw.op.as_str() {
            "home" => Ok(Request::Home),
            "create_person" => Ok(Request::CreatePerson {
                body: require_body(raw.body)?,
            }),
            "person_detail" => Ok(Request::PersonDetail { query: raw.query }),
            "person_by_id" => Ok(Request::PersonById { path: raw.path }),
            "update_person" => Ok(Request::UpdatePerson {
                path: raw.path,
                body: require_body(raw.body)?,
            }),
            other => Err(ApiError::UnknownOperation(other.to_string())),
        }
    }

    /// Operation name for logging
    pub fn op(&self) -> &'static str {
        match self {
            Request::Home => "home",
            Request::CreatePerson { .. } => "create_person",
            Request::PersonDetail { .. } => "person_detail",
            Request::PersonById { .. } => "person_by_id",
            Request::UpdatePerson { .. } => "update_person",
        }
    }
}

fn require_body(body: Option<Value>) -> ApiResult<Value> {
    body.ok_or_else(|| ApiError::invalid_request("missing body"))
}
