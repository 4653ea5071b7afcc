//! API Handler
//!
//! Text parameters are decoded, placed in `RequestParams` under their source
//! and merged with `RequestParams::combined` before the single `validate`
//! call for their schema. `update_person` validates its path and its body
//! against two different schemas; failures from both are collected before
//! anything is reported. Handlers hold no mutable state, so one `ApiHandler`
//! may serve concurrent callers.

use serde_json::{json, Map, Value};

use crate::catalog;
use crate::observability::{log_event_with_fields, Event};
use crate::params::{decode_text_params, ParamSource, RequestParams};
use crate::schema::{validate, validate_value, FieldValue, Schema, SchemaRegistry, ValidatedInstance};

use super::errors::{ApiError, ApiResult, SourcedError};
use super::request::{Request, TextParams};
use super::response::Response;

/// Dispatches requests against schemas held by a registry
pub struct ApiHandler<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> ApiHandler<'a> {
    /// Create a handler. Fails if any catalog schema is missing.
    pub fn new(registry: &'a SchemaRegistry) -> ApiResult<Self> {
        for name in [
            catalog::PERSON,
            catalog::LOCATION,
            catalog::PERSON_DETAIL_QUERY,
            catalog::PERSON_PATH,
            catalog::PERSON_UPDATE_BODY,
        ] {
            registry.require(name)?;
        }
        Ok(Self { registry })
    }

    /// Handle a raw JSON request string
    pub fn handle(&self, json_request: &str) -> Response {
        let request = match Request::parse(json_request) {
            Ok(r) => r,
            Err(e) => {
                log_rejected("<unparsed>", &e);
                return Response::error(&e);
            }
        };
        let op = request.op();

        match self.dispatch(request) {
            Ok(data) => {
                log_event_with_fields(Event::RequestAccepted, &[("op", op)]);
                Response::success(data)
            }
            Err(e) => {
                log_rejected(op, &e);
                Response::error(&e)
            }
        }
    }

    /// Run a parsed request
    pub fn dispatch(&self, request: Request) -> ApiResult<Value> {
        match request {
            Request::Home => Ok(json!({"Hello": "World"})),
            Request::CreatePerson { body } => self.create_person(&body),
            Request::PersonDetail { query } => self.person_detail(&query),
            Request::PersonById { path } => self.person_by_id(&path),
            Request::UpdatePerson { path, body } => self.update_person(&path, &body),
        }
    }

    /// Echoes the validated person
    fn create_person(&self, body: &Value) -> ApiResult<Value> {
        let schema = self.registry.require(catalog::PERSON)?;
        let person = validate_value(&schema, body)
            .map_err(|errors| ApiError::validation(ParamSource::Body, errors))?;
        Ok(person.to_json())
    }

    /// `{<name or "null">: age}`
    fn person_detail(&self, query: &TextParams) -> ApiResult<Value> {
        let schema = self.registry.require(catalog::PERSON_DETAIL_QUERY)?;
        let detail =
            validate_text(&schema, ParamSource::Query, query).map_err(ApiError::Validation)?;

        let name = detail
            .get("name")
            .and_then(FieldValue::as_str)
            .unwrap_or("null")
            .to_string();
        let age = detail.get("age").map(FieldValue::to_json).unwrap_or(Value::Null);

        let mut data = Map::new();
        data.insert(name, age);
        Ok(Value::Object(data))
    }

    /// `{<person_id>: "it exists!"}`
    fn person_by_id(&self, path: &TextParams) -> ApiResult<Value> {
        let schema = self.registry.require(catalog::PERSON_PATH)?;
        let path = validate_text(&schema, ParamSource::Path, path).map_err(ApiError::Validation)?;
        let person_id = path
            .get("person_id")
            .and_then(FieldValue::as_i64)
            .unwrap_or_default();

        let mut data = Map::new();
        data.insert(person_id.to_string(), json!("it exists!"));
        Ok(Value::Object(data))
    }

    /// Merges the validated person and location from the body
    fn update_person(&self, path: &TextParams, body: &Value) -> ApiResult<Value> {
        let path_schema = self.registry.require(catalog::PERSON_PATH)?;
        let body_schema = self.registry.require(catalog::PERSON_UPDATE_BODY)?;

        // Every group is validated before any failure is reported
        let path_result = validate_text(&path_schema, ParamSource::Path, path);
        let update = match (path_result, validate_value(&body_schema, body)) {
            (Ok(_), Ok(update)) => update,
            (path_result, body_result) => {
                let mut errors = path_result.err().unwrap_or_default();
                if let Err(body_errors) = body_result {
                    errors.extend(SourcedError::tag(ParamSource::Body, body_errors));
                }
                return Err(ApiError::Validation(errors));
            }
        };

        let person = embedded(&update, "person");
        let location = embedded(&update, "location");
        let merged = person
            .merge(&location)
            .map_err(|collisions| ApiError::validation(ParamSource::Body, collisions))?;
        Ok(merged.to_json())
    }
}

/// Decodes one source's text parameters and validates the combined raw input.
fn validate_text(
    schema: &Schema,
    source: ParamSource,
    text: &TextParams,
) -> Result<ValidatedInstance, Vec<SourcedError>> {
    let params = RequestParams::new().with_group(source, decode_text_params(schema, text));
    params
        .combined()
        .and_then(|raw| validate(schema, &raw))
        .map_err(|errors| SourcedError::tag(source, errors).collect())
}

/// Nested instance under `name`; the update body schema guarantees presence.
fn embedded(update: &ValidatedInstance, name: &str) -> ValidatedInstance {
    update
        .get(name)
        .and_then(FieldValue::as_object)
        .cloned()
        .unwrap_or_default()
}

fn log_rejected(op: &str, err: &ApiError) {
    let count = err.field_errors().len().to_string();
    log_event_with_fields(
        Event::RequestRejected,
        &[("op", op), ("code", err.code()), ("errors", count.as_str())],
    );
}
