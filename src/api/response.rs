//! API response types

use serde::Serialize;
use serde_json::Value;

use super::errors::{ApiError, SourcedError};

/// Success response
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub status: &'static str,
    pub data: Value,
}

/// Error response carrying every field error
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub code: &'static str,
    pub http_status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SourcedError>,
}

impl ErrorResponse {
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            status: "error",
            code: err.code(),
            http_status: err.status_code(),
            message: err.to_string(),
            errors: err.field_errors().to_vec(),
        }
    }
}

/// Unified response type
#[derive(Debug, Clone)]
pub enum Response {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Success(SuccessResponse { status: "ok", data })
    }

    pub fn error(err: &ApiError) -> Self {
        Response::Error(ErrorResponse::from_error(err))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    pub fn to_value(&self) -> Value {
        let serialized = match self {
            Response::Success(r) => serde_json::to_value(r),
            Response::Error(r) => serde_json::to_value(r),
        };
        // Both bodies are plain string/number/Value trees
        serialized.unwrap_or(Value::Null)
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSource;
    use crate::schema::{ValidationError, ValidationErrors};
    use serde_json::json;

    #[test]
    fn test_success_response() {
        let resp = Response::success(json!({"Hello": "World"}));
        assert!(resp.is_success());
        assert_eq!(resp.to_value(), json!({"status": "ok", "data": {"Hello": "World"}}));
    }

    #[test]
    fn test_error_response_lists_field_errors() {
        let err = ApiError::validation(
            ParamSource::Path,
            ValidationErrors::from(vec![ValidationError::missing("person_id")]),
        );
        let value = Response::error(&err).to_value();
        assert_eq!(value["status"], "error");
        assert_eq!(value["code"], "validation_failed");
        assert_eq!(value["http_status"], 422);
        assert_eq!(value["errors"][0]["in"], "path");
        assert_eq!(value["errors"][0]["field_path"], "person_id");
    }

    #[test]
    fn test_error_response_omits_empty_errors() {
        let value = Response::error(&ApiError::invalid_request("missing body")).to_value();
        assert!(value.get("errors").is_none());
        assert!(value["message"].as_str().unwrap().contains("missing body"));
    }
}
