//! Tests for error construction, trace capture and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("login required"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("not yours"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("exists"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("  ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture UUID");
    let error = TraceId::scope(trace_id, async move { Error::not_found("missing") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_absent_fields() {
    let value = serde_json::to_value(Error::conflict("user already exists")).expect("serialise");
    assert_eq!(value, json!({ "code": "conflict", "message": "user already exists" }));
}

#[rstest]
fn round_trips_details_and_trace_id(expected_trace_id: String) {
    let original = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "limit" }));

    let value = serde_json::to_value(&original).expect("serialise");
    assert_eq!(value["traceId"], json!(expected_trace_id));

    let decoded: Error = serde_json::from_value(value).expect("deserialise");
    assert_eq!(decoded, original);
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_the_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture UUID");
    let decoded = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(json!({ "code": "not_found", "message": "missing" }))
            .expect("valid payload")
    })
    .await;

    assert!(decoded.trace_id().is_none());
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({ "code": "not_found", "message": " " }));
    assert!(result.is_err());
}
