//! API Flow Tests
//!
//! End-to-end request handling over the person catalog: every parameter
//! group is validated, all field errors are reported together with their
//! source, and successful handlers return the documented payloads.

use fieldgate::api::{ApiHandler, Response};
use fieldgate::{SchemaRegistry, ValidatorConfig};
use serde_json::{json, Value};

fn registry() -> SchemaRegistry {
    ValidatorConfig::default().build_registry().unwrap()
}

fn handle(registry: &SchemaRegistry, request: Value) -> Value {
    let handler = ApiHandler::new(registry).unwrap();
    handler.handle(&request.to_string()).to_value()
}

#[test]
fn test_create_person_echoes_body() {
    let registry = registry();
    let body = json!({
        "first_name": "Rocio",
        "last_name": "Perez",
        "age": 25,
        "hair_color": "blonde",
        "is_married": true
    });

    let value = handle(&registry, json!({"op": "create_person", "body": body}));
    assert_eq!(value["status"], "ok");
    assert_eq!(value["data"], body);
}

#[test]
fn test_create_person_reports_all_errors() {
    let registry = registry();
    let value = handle(
        &registry,
        json!({"op": "create_person", "body": {"first_name": "", "age": 116, "hair_color": "green"}}),
    );

    assert_eq!(value["status"], "error");
    assert_eq!(value["code"], "validation_failed");
    assert_eq!(value["http_status"], 422);

    let errors = value["errors"].as_array().unwrap();
    let summary: Vec<_> = errors
        .iter()
        .map(|e| (e["in"].as_str().unwrap(), e["field_path"].as_str().unwrap(), e["reason"].as_str().unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("body", "first_name", "length_error"),
            ("body", "last_name", "missing"),
            ("body", "age", "range_error"),
            ("body", "hair_color", "enum_error"),
        ]
    );
    assert_eq!(errors[2]["offending_value"], 116);
}

#[test]
fn test_create_person_rejects_non_object_body() {
    let registry = registry();
    let value = handle(&registry, json!({"op": "create_person", "body": [1, 2]}));
    assert_eq!(value["errors"][0]["field_path"], "$root");
    assert_eq!(value["errors"][0]["reason"], "type_error");
}

#[test]
fn test_person_detail_query() {
    let registry = registry();
    let value = handle(
        &registry,
        json!({"op": "person_detail", "query": {"name": "Rocio", "age": "25"}}),
    );
    assert_eq!(value["data"], json!({"Rocio": 25}));
}

#[test]
fn test_person_detail_requires_age() {
    let registry = registry();
    let value = handle(&registry, json!({"op": "person_detail", "query": {"name": "x".repeat(51)}}));

    let errors = value["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["in"], "query");
    assert_eq!(errors[0]["field_path"], "name");
    assert_eq!(errors[0]["reason"], "length_error");
    assert_eq!(errors[1]["field_path"], "age");
    assert_eq!(errors[1]["reason"], "missing");
}

#[test]
fn test_person_by_id_rejects_text() {
    let registry = registry();
    let value = handle(&registry, json!({"op": "person_by_id", "path": {"person_id": "abc"}}));
    assert_eq!(value["errors"][0]["in"], "path");
    assert_eq!(value["errors"][0]["reason"], "type_error");
    assert_eq!(value["errors"][0]["offending_value"], "abc");
}

#[test]
fn test_update_person_merges_entities() {
    let registry = registry();
    let value = handle(
        &registry,
        json!({
            "op": "update_person",
            "path": {"person_id": "7"},
            "body": {
                "person": {"first_name": "Rocio", "last_name": "Perez", "age": 25},
                "location": {"city": "Bogota", "state": "Cundinamarca", "country": "Colombia"}
            }
        }),
    );

    assert_eq!(value["status"], "ok");
    assert_eq!(
        value["data"],
        json!({
            "first_name": "Rocio",
            "last_name": "Perez",
            "age": 25,
            "hair_color": null,
            "is_married": null,
            "city": "Bogota",
            "state": "Cundinamarca",
            "country": "Colombia"
        })
    );
}

#[test]
fn test_update_person_nested_error_path() {
    let registry = registry();
    let value = handle(
        &registry,
        json!({
            "op": "update_person",
            "path": {"person_id": "7"},
            "body": {
                "person": {"first_name": "Rocio", "last_name": "Perez", "age": 25},
                "location": {"state": "Cundinamarca", "country": "Colombia"}
            }
        }),
    );

    let errors = value["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["in"], "body");
    assert_eq!(errors[0]["field_path"], "location.city");
    assert_eq!(errors[0]["reason"], "missing");
}

#[test]
fn test_envelope_errors() {
    let registry = registry();
    let handler = ApiHandler::new(&registry).unwrap();

    let response = handler.handle("not json");
    assert!(!response.is_success());
    assert_eq!(response.to_value()["http_status"], 400);

    let response: Response = handler.handle(r#"{"op": "delete_person"}"#);
    assert_eq!(response.to_value()["code"], "unknown_operation");
    assert_eq!(response.to_value()["http_status"], 404);
}

#[test]
fn test_rejecting_policy_applies_to_requests() {
    let registry = ValidatorConfig::from_json(r#"{"unknown_fields": "reject"}"#)
        .unwrap()
        .build_registry()
        .unwrap();
    let value = handle(
        &registry,
        json!({"op": "person_by_id", "path": {"person_id": "7", "verbose": "true"}}),
    );
    assert_eq!(value["errors"][0]["field_path"], "verbose");
    assert_eq!(value["errors"][0]["reason"], "unexpected_field");
}
