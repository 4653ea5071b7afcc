//! API error types
//!
//! Validation failures keep every field error together with the parameter
//! source it came from; they are never collapsed into one opaque message.

use serde::Serialize;
use thiserror::Error;

use crate::params::ParamSource;
use crate::schema::{SchemaError, ValidationError, ValidationErrors};

/// A field error tagged with the request part it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcedError {
    #[serde(rename = "in")]
    pub origin: ParamSource,
    #[serde(flatten)]
    pub error: ValidationError,
}

impl SourcedError {
    pub fn tag(origin: ParamSource, errors: ValidationErrors) -> impl Iterator<Item = SourcedError> {
        errors
            .into_iter()
            .map(move |error| SourcedError { origin, error })
    }
}

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Envelope could not be parsed or is missing a part
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// One or more parameters failed validation
    #[error("request failed validation ({} error(s))", .0.len())]
    Validation(Vec<SourcedError>),

    /// Required schema missing from the registry
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ApiError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        ApiError::InvalidRequest(reason.into())
    }

    pub fn validation(origin: ParamSource, errors: ValidationErrors) -> Self {
        ApiError::Validation(SourcedError::tag(origin, errors).collect())
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::UnknownOperation(_) => "unknown_operation",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Schema(e) => e.code(),
        }
    }

    /// HTTP status an HTTP layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::UnknownOperation(_) => 404,
            ApiError::Validation(_) => 422,
            ApiError::Schema(_) => 500,
        }
    }

    /// Field errors, empty for non-validation failures
    pub fn field_errors(&self) -> &[SourcedError] {
        match self {
            ApiError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
