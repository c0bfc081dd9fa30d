//! Request description handed to a [`Connection`](crate::Connection).

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use reqwest::blocking::{RequestBuilder, multipart};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::{Error, ErrorKind};

/// A request body.
///
/// The connection forwards the body verbatim and re-sends it on every retry,
/// so each variant owns its data.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A JSON document, sent with `Content-Type: application/json`.
    Json(Value),

    /// Raw bytes, sent with the given content type (if any).
    Bytes {
        /// The payload.
        data: Bytes,
        /// Optional `Content-Type` header value.
        content_type: Option<String>,
    },

    /// A `multipart/form-data` body.
    Multipart(Vec<FormPart>),
}

/// One part of a multipart form body.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    /// Form field name.
    pub name: String,
    /// Part content.
    pub data: Bytes,
    /// File name reported for the part.
    pub file_name: Option<String>,
    /// MIME type of the part.
    pub content_type: Option<String>,
}

impl FormPart {
    /// Creates a text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Bytes::from(value.into()),
            file_name: None,
            content_type: None,
        }
    }

    /// Creates a file field.
    pub fn file(name: impl Into<String>, file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            file_name: Some(file_name.into()),
            content_type: None,
        }
    }

    /// Sets the MIME type of the part.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn to_part(&self) -> Result<multipart::Part, Error> {
        let mut part = multipart::Part::bytes(self.data.to_vec());
        if let Some(ref file_name) = self.file_name {
            part = part.file_name(file_name.clone());
        }
        if let Some(ref content_type) = self.content_type {
            part = part.mime_str(content_type).map_err(|e| {
                Error::invalid_argument(format!("invalid part content type {:?}", content_type))
                    .with_source(e)
            })?;
        }
        Ok(part)
    }
}

impl Body {
    /// Creates a raw byte body.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Body::Bytes {
            data: data.into(),
            content_type: None,
        }
    }

    /// Attaches this body to a request builder.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(match self {
            Body::Json(value) => builder.json(value),
            Body::Bytes { data, content_type } => {
                let builder = match content_type {
                    Some(ct) => builder.header(CONTENT_TYPE, ct.as_str()),
                    None => builder,
                };
                builder.body(data.to_vec())
            }
            Body::Multipart(parts) => {
                let mut form = multipart::Form::new();
                for part in parts {
                    form = form.part(part.name.clone(), part.to_part()?);
                }
                builder.multipart(form)
            }
        })
    }
}

/// A request against the Gantry API.
///
/// ```rust
/// use gantry::ApiRequest;
/// use serde_json::json;
///
/// let request = ApiRequest::post("/v1/channels")
///     .json(&json!({"name": "prod"}))
///     .unwrap()
///     .query("dry_run", "true");
/// assert_eq!(request.path(), "/v1/channels");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Body>,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl ApiRequest {
    /// Creates a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            query: Vec::new(),
            timeout: None,
        }
    }

    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a `PATCH` request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Creates a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(value).map_err(|e| {
            Error::invalid_argument(format!("request body is not valid JSON: {}", e)).with_source(e)
        })?;
        Ok(self.body(Body::Json(value)))
    }

    /// Adds a header, replacing any default header of the same name.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::new(ErrorKind::InvalidArgument, format!("invalid header name {:?}", name))
                .with_source(e)
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            Error::new(ErrorKind::InvalidArgument, format!("invalid value for header {}", name))
                .with_source(e)
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Merges a prepared header map.
    ///
    /// Each name in `headers` replaces any earlier header of that name, and
    /// every value given for it is kept.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        merge_headers(&mut self.headers, &headers);
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Overrides the connection timeout for each attempt of this request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path, relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the body, if any.
    pub fn body_ref(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Returns the caller-supplied headers.
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the query parameters.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the per-attempt timeout override.
    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Replaces every header named in `overrides`, keeping all of its values.
pub(crate) fn merge_headers(target: &mut HeaderMap, overrides: &HeaderMap) {
    for name in overrides.keys() {
        target.remove(name);
    }
    for (name, value) in overrides {
        target.append(name.clone(), value.clone());
    }
}
