//! Request assembly, retries and response handling over HTTP.

use std::time::{Duration, Instant};

use gantry::{ApiRequest, Body, Connection, Credential, ErrorKind, FormPart, RetryConfig};
use mockito::Matcher;
use serde_json::{Value, json};

use crate::common::{TEST_TOKEN, builder, closed_port_url, connection, init_tracing};

#[test]
fn test_get_sends_default_headers() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/models")
        .match_header("authorization", format!("Bearer {TEST_TOKEN}").as_str())
        .match_header("user-agent", Matcher::Regex(r"^gantry-rust/\d+\.\d+\.\d+".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"models":[]}"#)
        .expect(1)
        .create();

    let conn = connection(&server, 0);
    let body = conn.get("/v1/models").unwrap();

    assert_eq!(body, json!({"models": []}));
    mock.assert();
}

#[test]
fn test_basic_credential_header() {
    let mut server = mockito::Server::new();
    // base64("user-42:pat")
    let mock = server
        .mock("GET", "/v1/whoami")
        .match_header("authorization", "Basic dXNlci00MjpwYXQ=")
        .with_status(200)
        .with_body("{}")
        .create();

    let conn = builder(&server).credential(Credential::user("42", "pat")).build().unwrap();
    conn.get("/v1/whoami").unwrap();
    mock.assert();
}

#[test]
fn test_anonymous_sends_no_authorization() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/health")
        .match_header("authorization", Matcher::Missing)
        .match_header("user-agent", Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create();

    let conn = builder(&server).no_credential().build().unwrap();
    assert_eq!(conn.get("/health").unwrap()["status"], "ok");
    mock.assert();
}

#[test]
fn test_user_headers_override_defaults() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/models")
        .match_header("authorization", "Bearer other")
        .match_header("x-request-id", "abc")
        .with_status(200)
        .with_body("[]")
        .create();

    let conn = connection(&server, 0);
    let request = ApiRequest::get("/v1/models")
        .header("Authorization", "Bearer other")
        .unwrap()
        .header("X-Request-Id", "abc")
        .unwrap();
    let _: Value = conn.api_request(request).unwrap();
    mock.assert();
}

#[test]
fn test_query_parameters() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/datasets")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("name".into(), "click stream".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create();

    let conn = connection(&server, 0);
    let _: Value = conn
        .api_request(
            ApiRequest::get("/v1/datasets")
                .query("limit", "50")
                .query("name", "click stream"),
        )
        .unwrap();
    mock.assert();
}

#[test]
fn test_json_body_on_every_verb() {
    let mut server = mockito::Server::new();
    let payload = json!({"name": "raw", "tags": ["a", "b"]});

    let mocks: Vec<_> = ["POST", "PUT", "PATCH"]
        .into_iter()
        .map(|method| {
            server
                .mock(method, "/v1/buckets/1")
                .match_header("content-type", "application/json")
                .match_body(Matcher::Json(payload.clone()))
                .with_status(200)
                .with_body(r#"{"id":1}"#)
                .expect(1)
                .create()
        })
        .collect();

    let conn = connection(&server, 0);
    assert_eq!(conn.post("/v1/buckets/1", &payload).unwrap()["id"], 1);
    assert_eq!(conn.put("/v1/buckets/1", &payload).unwrap()["id"], 1);
    assert_eq!(conn.patch("/v1/buckets/1", &payload).unwrap()["id"], 1);

    for mock in mocks {
        mock.assert();
    }
}

#[test]
fn test_delete_with_empty_body_is_null() {
    let mut server = mockito::Server::new();
    let mock = server.mock("DELETE", "/v1/buckets/1").with_status(204).create();

    let conn = connection(&server, 0);
    assert_eq!(conn.delete("/v1/buckets/1").unwrap(), Value::Null);

    let mock2 = server.mock("DELETE", "/v1/buckets/2").with_status(200).create();
    let parsed: Option<Value> = conn.api_request(ApiRequest::delete("/v1/buckets/2")).unwrap();
    assert!(parsed.is_none());

    mock.assert();
    mock2.assert();
}

#[test]
fn test_raw_bytes_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/v1/artifacts/blob")
        .match_header("content-type", "application/octet-stream")
        .match_body("raw-bytes")
        .with_status(200)
        .create();

    let conn = connection(&server, 0);
    let body = Body::Bytes {
        data: b"raw-bytes".to_vec().into(),
        content_type: Some("application/octet-stream".into()),
    };
    let response = conn.request(ApiRequest::put("/v1/artifacts/blob").body(body)).unwrap();
    assert_eq!(response.status(), 200);
    mock.assert();
}

#[test]
fn test_multipart_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/artifacts")
        .match_header("content-type", Matcher::Regex("^multipart/form-data; boundary=".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="kind""#.into()),
            Matcher::Regex(r#"filename="model\.bin""#.into()),
            Matcher::Regex("model-bytes".into()),
        ]))
        .with_status(201)
        .with_body(r#"{"id":"art_1"}"#)
        .create();

    let conn = connection(&server, 0);
    let request = ApiRequest::post("/v1/artifacts").body(Body::Multipart(vec![
        FormPart::text("kind", "model"),
        FormPart::file("file", "model.bin", b"model-bytes".to_vec())
            .with_content_type("application/octet-stream"),
    ]));
    let created: Value = conn.api_request(request).unwrap();

    assert_eq!(created["id"], "art_1");
    mock.assert();
}

#[test]
fn test_response_exposes_status_headers_and_url() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v1/info")
        .with_status(200)
        .with_header("x-trace", "t-1")
        .with_body("plain text")
        .create();

    let conn = connection(&server, 0);
    let response = conn.request(ApiRequest::get("v1/info")).unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers().get("x-trace").unwrap(), "t-1");
    assert_eq!(response.url(), format!("{}/v1/info", server.url()));
    assert_eq!(response.text(), "plain text");
}

#[test]
fn test_base_url_with_prefix_and_trailing_slash() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/api/v1/models").with_status(200).with_body("[]").create();

    let conn = builder(&server)
        .base_url(format!("{}/api/", server.url()))
        .no_credential()
        .build()
        .unwrap();
    conn.get("/v1/models").unwrap();
    mock.assert();
}

#[test]
fn test_retries_exhausted_on_503() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/flaky")
        .with_status(503)
        .with_body(r#"{"error":"unavailable","error_description":"try later"}"#)
        .expect(4)
        .create();

    let conn = connection(&server, 3);
    let err = conn.get("/v1/flaky").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.status_code(), Some(503));
    assert_eq!(err.api_body().unwrap().error_description, "try later");
    mock.assert();
}

#[test]
fn test_retries_exhausted_on_500() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/v1/jobs").with_status(500).expect(3).create();

    let conn = connection(&server, 2);
    let err = conn.post("/v1/jobs", &json!({})).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InternalServerError);
    mock.assert();
}

#[test]
fn test_zero_retries_means_one_attempt() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/v1/flaky").with_status(502).expect(1).create();

    let conn = connection(&server, 0);
    assert_eq!(conn.get("/v1/flaky").unwrap_err().status_code(), Some(502));
    mock.assert();
}

#[test]
fn test_client_errors_are_not_retried() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/bad")
        .with_status(400)
        .with_body(r#"{"error":"bad_request","error_description":"missing name"}"#)
        .expect(1)
        .create();

    let conn = connection(&server, 5);
    let err = conn.get("/v1/bad").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(err.message(), "bad_request: missing name");
    mock.assert();
}

#[test]
fn test_recovers_after_transient_failure() {
    let mut server = mockito::Server::new();
    // Matching mocks are served in creation order until their expected hit
    // count is reached.
    let failing = server
        .mock("GET", "/v1/eventually")
        .with_status(504)
        .expect(2)
        .create();
    let ok = server
        .mock("GET", "/v1/eventually")
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .expect(1)
        .create();

    let conn = connection(&server, 5);
    assert_eq!(conn.get("/v1/eventually").unwrap()["ok"], true);

    failing.assert();
    ok.assert();
}

#[test]
fn test_retry_after_overrides_backoff() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/busy")
        .with_status(503)
        .with_header("retry-after", "0")
        .expect(3)
        .create();

    // Without Retry-After this would sleep for minutes.
    let conn = builder(&server)
        .retry_config(RetryConfig::new().with_backoff_factor(Duration::from_secs(60)))
        .max_retry_count(2)
        .build()
        .unwrap();

    let started = Instant::now();
    let err = conn.get("/v1/busy").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Http);
    assert!(started.elapsed() < Duration::from_secs(10));
    mock.assert();
}

#[test]
fn test_connection_refused_is_not_retried() {
    init_tracing();
    let conn = Connection::builder()
        .settings(gantry::Settings::default())
        .base_url(closed_port_url())
        .retry_config(RetryConfig::new().with_backoff_factor(Duration::from_secs(60)))
        .build()
        .unwrap();

    let started = Instant::now();
    let err = conn.get("/v1/models").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(!err.kind().is_api_error());
    assert!(std::error::Error::source(&err).is_some());
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_invalid_json_success_body() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/v1/broken").with_status(200).with_body("{not json").create();

    let conn = connection(&server, 0);
    let err = conn.get("/v1/broken").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
}

#[test]
fn test_connections_are_independent() {
    let mut a = mockito::Server::new();
    let mut b = mockito::Server::new();
    let mock_a = a.mock("GET", "/who").with_status(200).with_body(r#""a""#).create();
    let mock_b = b.mock("GET", "/who").with_status(200).with_body(r#""b""#).create();

    let conn_a = connection(&a, 0);
    let conn_b = connection(&b, 0);

    std::thread::scope(|s| {
        let ha = s.spawn(|| conn_a.get("/who").unwrap());
        let hb = s.spawn(|| conn_b.get("/who").unwrap());
        assert_eq!(ha.join().unwrap(), "a");
        assert_eq!(hb.join().unwrap(), "b");
    });

    mock_a.assert();
    mock_b.assert();
}

#[test]
fn test_absolute_url_path_stays_on_base_host() {
    let mut base = mockito::Server::new();
    let mut foreign = mockito::Server::new();

    let on_foreign = foreign.mock("PUT", Matcher::Any).expect(0).create();
    let on_base = base
        .mock("PUT", Matcher::Regex("/bucket/obj".into()))
        .match_header("authorization", format!("Bearer {TEST_TOKEN}").as_str())
        .with_status(200)
        .expect(1)
        .create();

    let conn = connection(&base, 0);
    let path = format!("{}/bucket/obj?X-Amz-Signature=abc", foreign.url());
    let response = conn.request(ApiRequest::put(path)).unwrap();

    assert!(response.url().starts_with(&base.url()));
    on_base.assert();
    on_foreign.assert();
}
