//! Error statuses as seen through a live connection.

use gantry::{ApiRequest, ErrorKind};
use serde_json::json;
use test_case::test_case;

use crate::common::connection;

#[test_case(400, ErrorKind::BadRequest; "bad request")]
#[test_case(401, ErrorKind::Unauthorized; "unauthorized")]
#[test_case(403, ErrorKind::Forbidden; "forbidden")]
#[test_case(404, ErrorKind::NotFound; "not found")]
#[test_case(405, ErrorKind::MethodNotAllowed; "method not allowed")]
#[test_case(409, ErrorKind::Conflict; "conflict")]
#[test_case(422, ErrorKind::Http; "unprocessable")]
#[test_case(429, ErrorKind::Http; "too many requests")]
#[test_case(501, ErrorKind::Http; "not implemented")]
fn test_status_maps_to_kind(status: usize, expected: ErrorKind) {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/resource")
        .with_status(status)
        .with_body(r#"{"error":"e","error_description":"d"}"#)
        .expect(1)
        .create();

    let conn = connection(&server, 3);
    let err = conn.get("/v1/resource").unwrap_err();

    assert_eq!(err.kind(), expected);
    assert!(err.kind().is_api_error());
    assert_eq!(err.status_code(), Some(status as u16));
    mock.assert();
}

#[test]
fn test_error_body_fields_and_display() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v1/models/m1")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error":"not_found","error_description":"model m1 does not exist","error_detail":{"id":"m1"}}"#,
        )
        .create();

    let conn = connection(&server, 0);
    let err = conn.get("/v1/models/m1").unwrap_err();
    let url = format!("{}/v1/models/m1", server.url());

    let api = err.api_body().unwrap();
    assert_eq!(api.status_code, 404);
    assert_eq!(api.error, "not_found");
    assert_eq!(api.error_description, "model m1 does not exist");
    assert_eq!(api.error_detail, Some(json!({"id": "m1"})));
    assert_eq!(api.url, url);

    assert_eq!(
        err.to_string(),
        format!("not found: not_found: model m1 does not exist (status 404, url {url})")
    );
}

#[test]
fn test_plain_text_error_body() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("DELETE", "/v1/models/m1")
        .with_status(403)
        .with_body("you shall not pass")
        .create();

    let conn = connection(&server, 0);
    let err = conn.delete("/v1/models/m1").unwrap_err();

    let api = err.api_body().unwrap();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(api.error, "Forbidden");
    assert_eq!(api.error_description, "you shall not pass");
    assert!(api.error_detail.is_none());
}

#[test]
fn test_json_without_error_fields_uses_reason_phrase() {
    let mut server = mockito::Server::new();
    let body = r#"{"message":"nope"}"#;
    let _mock = server.mock("POST", "/v1/jobs").with_status(409).with_body(body).create();

    let conn = connection(&server, 0);
    let err = conn.post("/v1/jobs", &json!({"name": "j"})).unwrap_err();

    let api = err.api_body().unwrap();
    assert_eq!(api.error, "Conflict");
    assert_eq!(api.error_description, body);
}

#[test]
fn test_error_is_never_returned_as_response() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/v1/gone").with_status(410).create();

    let conn = connection(&server, 0);
    let result = conn.request(ApiRequest::get("/v1/gone"));

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.api_body().unwrap().error, "Gone");
    assert_eq!(err.message(), "Gone");
}
