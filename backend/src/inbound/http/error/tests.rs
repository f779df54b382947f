//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("missing required field: Shift"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("Invalid credentials!"), StatusCode::UNAUTHORIZED)]
#[case(Error::not_found("User data not found"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("data store unavailable"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn render(error: Error, expected_status: StatusCode, expected_trace_id: Option<&str>) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is ASCII");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("procedure SP_X expects 3 parameters, got 2")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "statement": "SELECT ..." }));

    let payload = render(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), REDACTED_MESSAGE);
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::invalid_request("missing required field: Shift")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "Shift" }));

    let payload = render(error, StatusCode::BAD_REQUEST, Some(expected_trace_id.as_str())).await;
    assert_eq!(payload.message(), "missing required field: Shift");
    assert_eq!(payload.details(), Some(&json!({ "field": "Shift" })));
}

#[rstest]
#[actix_web::test]
async fn body_uses_the_error_field_name() {
    let response = ResponseError::error_response(&Error::unauthorized("Invalid credentials!"));
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(value["error"], json!("Invalid credentials!"));
    assert_eq!(value["code"], json!("unauthorized"));
    assert!(value.get("traceId").is_none());
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), REDACTED_MESSAGE);
    assert_eq!(err.details(), None);
}
