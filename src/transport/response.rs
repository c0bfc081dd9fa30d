//! Successful response returned by a [`Connection`](crate::Connection).

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::Error;

/// A successful (non-error status) response with its body fully read.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    url: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Reads a blocking response into memory.
    pub(crate) fn read(response: reqwest::blocking::Response) -> Result<Self, Error> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.bytes()?;
        Ok(Self {
            status,
            url,
            headers,
            body,
        })
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the final request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Consumes the response, returning the raw body.
    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Returns the body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    ///
    /// An empty body parses as JSON `null`, so `serde_json::Value`, `()` and
    /// `Option<_>` targets accept it.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let parsed = if self.body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_slice(&self.body)
        };
        parsed.map_err(|e| {
            Error::invalid_response(format!("failed to parse response from {}: {}", self.url, e))
                .with_source(e)
        })
    }
}

#[cfg(test)]
impl Response {
    pub(crate) fn for_test(status: u16, body: &str) -> Self {
        Self {
            status,
            url: "https://api.gantry.dev/test".into(),
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }
}
