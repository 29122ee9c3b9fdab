//! Request Model Tests
//!
//! Tests for payload parsing and field validation order.

use catalogd::protocol::{Method, Request};
use catalogd::RequestError;

fn parse(json: &str) -> Result<Request, RequestError> {
    Request::parse(json.as_bytes())
}

// =============================================================================
// Well-formed Requests
// =============================================================================

#[test]
fn test_parse_full_request() {
    let request = parse(
        r#"{"method":"create","date":1700000000,"path":"/api/categories","body":"{\"name\":\"Spices\"}"}"#,
    )
    .unwrap();

    assert_eq!(request.method, "create");
    assert_eq!(request.date, 1_700_000_000);
    assert_eq!(request.path, "/api/categories");
    assert_eq!(request.body.as_deref(), Some(r#"{"name":"Spices"}"#));
    assert_eq!(request.method(), Ok(Method::Create));
}

#[test]
fn test_path_defaults_to_empty() {
    let request = parse(r#"{"method":"echo","date":1,"body":"hi"}"#).unwrap();
    assert_eq!(request.path, "");
}

#[test]
fn test_body_absent_or_null() {
    let request = parse(r#"{"method":"read","date":1,"path":"/api/categories"}"#).unwrap();
    assert_eq!(request.body, None);

    let request = parse(r#"{"method":"read","date":1,"body":null}"#).unwrap();
    assert_eq!(request.body, None);
}

#[test]
fn test_non_string_body_kept_as_json_text() {
    let request = parse(r#"{"method":"echo","date":1,"body":{"a":1}}"#).unwrap();
    assert_eq!(request.body.as_deref(), Some(r#"{"a":1}"#));
}

#[test]
fn test_date_as_numeric_string() {
    let request = parse(r#"{"method":"read","date":"1700000000"}"#).unwrap();
    assert_eq!(request.date, 1_700_000_000);
}

#[test]
fn test_negative_date_is_valid() {
    let request = parse(r#"{"method":"read","date":-86400}"#).unwrap();
    assert_eq!(request.date, -86400);
    assert!(request.timestamp().is_some());
}

#[test]
fn test_unknown_method_accepted_at_parse() {
    let request = parse(r#"{"method":"fly","date":1}"#).unwrap();
    assert_eq!(request.method, "fly");
    assert_eq!(request.method(), Err(RequestError::UnknownMethod));
}

#[test]
fn test_method_is_case_sensitive() {
    assert_eq!("READ".parse::<Method>(), Err(RequestError::UnknownMethod));
    assert_eq!("read".parse::<Method>(), Ok(Method::Read));
}

// =============================================================================
// Malformed Payloads (code 6)
// =============================================================================

#[test]
fn test_malformed_json() {
    match parse("{not json") {
        Err(RequestError::MalformedPayload(message)) => assert!(!message.is_empty()),
        other => panic!("Expected MalformedPayload, got {:?}", other),
    }
}

#[test]
fn test_empty_payload_is_malformed() {
    let err = parse("").unwrap_err();
    assert_eq!(err.code(), 6);
}

// =============================================================================
// Missing Fields (code 4)
// =============================================================================

#[test]
fn test_missing_method() {
    assert_eq!(parse(r#"{"date":1}"#), Err(RequestError::MissingField));
}

#[test]
fn test_missing_date() {
    assert_eq!(parse(r#"{"method":"read"}"#), Err(RequestError::MissingField));
}

#[test]
fn test_missing_both() {
    let err = parse("{}").unwrap_err();
    assert_eq!(err, RequestError::MissingField);
    assert_eq!(err.to_string(), "missing method, missing date");
    assert_eq!(err.code(), 4);
}

#[test]
fn test_non_object_top_level() {
    assert_eq!(parse("[1,2]"), Err(RequestError::MissingField));
    assert_eq!(parse("42"), Err(RequestError::MissingField));
}

#[test]
fn test_missing_field_checked_before_date() {
    assert_eq!(parse(r#"{"date":"soon"}"#), Err(RequestError::MissingField));
}

// =============================================================================
// Invalid Dates (code 4)
// =============================================================================

#[test]
fn test_date_not_integer() {
    for date in [r#""tomorrow""#, "1.5", "true", "null", "[]", r#""""#] {
        let payload = format!(r#"{{"method":"read","date":{}}}"#, date);
        let err = parse(&payload).unwrap_err();
        assert_eq!(err, RequestError::InvalidDate, "date {}", date);
        assert_eq!(err.to_string(), "illegal date");
    }
}

#[test]
fn test_date_out_of_range() {
    let payload = format!(r#"{{"method":"read","date":{}}}"#, i64::MAX);
    assert_eq!(parse(&payload), Err(RequestError::InvalidDate));

    let payload = r#"{"method":"read","date":99999999999999999999}"#;
    assert_eq!(parse(payload), Err(RequestError::InvalidDate));
}

// =============================================================================
// Serialization (client side)
// =============================================================================

#[test]
fn test_request_serialization_skips_empty_fields() {
    let request = Request::new("read", 5);
    assert_eq!(
        serde_json::to_string(&request).unwrap(),
        r#"{"method":"read","date":5}"#
    );

    let request = Request::new("echo", 5).with_path("/x").with_body("hi");
    let reparsed = Request::parse(&serde_json::to_vec(&request).unwrap()).unwrap();
    assert_eq!(reparsed, request);
}
