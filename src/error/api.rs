//! Translation of HTTP error responses into typed errors.

use std::borrow::Cow;

use serde_json::Value;

use super::{Error, ErrorKind};

/// Phrase used when a status code has no canonical reason.
const UNKNOWN_REASON: &str = "Unknown Status";

/// The error payload carried by every API error.
///
/// Built from the JSON body the Gantry API sends on failure
/// (`{"error": ..., "error_description": ..., "error_detail": ...}`), or
/// synthesized from the status reason phrase and the raw body when the body
/// is not a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorBody {
    /// HTTP status code of the failed response.
    pub status_code: u16,
    /// Short machine-readable error code, or the reason phrase.
    pub error: String,
    /// Human-readable description, or the raw response text.
    pub error_description: String,
    /// Structured detail, when the API supplied one.
    pub error_detail: Option<Value>,
    /// URL of the request that failed.
    pub url: String,
}

/// Returns the canonical reason phrase for a status code.
fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or(UNKNOWN_REASON)
}

/// Builds the typed error for a failed response.
///
/// This is a pure function of its inputs. `reason` falls back to the
/// canonical phrase for `status` when `None`.
pub fn translate(status: u16, reason: Option<&str>, url: &str, body_text: &str) -> Error {
    let reason = reason.unwrap_or_else(|| reason_phrase(status));
    let parsed = serde_json::from_str::<Value>(body_text).ok();

    let (error, error_description, error_detail) = match parsed {
        Some(Value::Object(mut fields)) => {
            let error = fields
                .remove("error")
                .and_then(value_to_text)
                .unwrap_or_else(|| reason.to_string());
            let description = fields
                .remove("error_description")
                .and_then(value_to_text)
                .unwrap_or_else(|| body_text.to_string());
            let detail = fields.remove("error_detail").filter(|v| !v.is_null());
            (error, description, detail)
        }
        _ => (reason.to_string(), body_text.to_string(), None),
    };

    let kind = ErrorKind::from_http_status(status);
    let message: Cow<'static, str> = if error_description.is_empty() {
        Cow::Owned(error.clone())
    } else {
        Cow::Owned(format!("{}: {}", error, error_description))
    };

    Error::new(kind, message).with_api_body(ApiErrorBody {
        status_code: status,
        error,
        error_description,
        error_detail,
        url: url.to_string(),
    })
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl Error {
    /// Consumes a failed blocking response and translates it.
    ///
    /// An unreadable body is logged and treated as empty text.
    pub fn from_response(response: reqwest::blocking::Response) -> Self {
        let status = response.status();
        let url = response.url().to_string();
        let text = match response.text() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    status = status.as_u16(),
                    url = %url,
                    error = %e,
                    "failed to read error response body"
                );
                String::new()
            }
        };
        translate(status.as_u16(), status.canonical_reason(), &url, &text)
    }
}
