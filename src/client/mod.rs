//! The connection core.
//!
//! [`Connection`] owns a base URL, a credential and a retry policy, and turns
//! an [`ApiRequest`] into either a [`Response`] or a typed [`Error`]. The
//! per-resource API glue (channels, buckets, deployments, ...) is built on
//! top of [`Connection::api_request`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gantry::{ApiRequest, Connection};
//! use serde_json::json;
//!
//! let conn = Connection::from_env()?;
//!
//! let bucket = conn.post("/v1/buckets", &json!({"name": "raw"}))?;
//! let models: serde_json::Value = conn.api_request(
//!     ApiRequest::get("/v1/models").query("limit", "50"),
//! )?;
//! ```

mod builder;

pub use builder::ConnectionBuilder;

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Error, ErrorKind,
    auth::Credential,
    config::ConnectionConfig,
    transport::{ApiRequest, RestTransport, Response, merge_headers},
    user_agent,
};

/// A configured connection to the Gantry API.
///
/// ## Thread Safety
///
/// `Connection` is `Clone`, `Send` and `Sync`. Its configuration is fixed at
/// build time, so clones and separate instances can be used from different
/// threads without affecting each other. Calls block the calling thread,
/// including the backoff sleeps between retries.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    config: ConnectionConfig,
    credential: Option<Credential>,
    transport: RestTransport,
}

impl Connection {
    /// Creates a new connection builder.
    pub fn builder() -> ConnectionBuilder {
        ConnectionBuilder::new()
    }

    /// Builds a connection entirely from the `GANTRY_*` environment.
    pub fn from_env() -> Result<Self, Error> {
        ConnectionBuilder::new().build()
    }

    pub(crate) fn from_parts(
        config: ConnectionConfig,
        credential: Option<Credential>,
        transport: RestTransport,
    ) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                config,
                credential,
                transport,
            }),
        }
    }

    /// Returns the resolved configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.inner.config
    }

    /// Returns the resolved credential, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.inner.credential.as_ref()
    }

    /// Builds the headers attached to every request, before caller headers
    /// are merged in.
    fn default_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(user_agent::user_agent()));

        if let Some(ref credential) = self.inner.credential {
            let mut value =
                HeaderValue::from_str(&credential.authorization_header()).map_err(|_| {
                    Error::new(ErrorKind::Configuration, "credential is not a valid header value")
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Executes a request and returns the raw successful response.
    ///
    /// Retryable statuses are retried according to the connection's retry
    /// policy. Any error status remaining after that is returned as a typed
    /// error.
    ///
    /// # Errors
    ///
    /// - an API kind (`BadRequest`, `NotFound`, ..., `Http`) for error statuses
    /// - `Connection` / `Timeout` / `Transport` for transport failures
    /// - `InvalidArgument` for a body that cannot be encoded
    pub fn request(&self, request: ApiRequest) -> Result<Response, Error> {
        let url = self.inner.config.url_for(request.path());
        let mut headers = self.default_headers()?;
        merge_headers(&mut headers, request.header_map());

        let transport = &self.inner.transport;
        let method = request.method().clone();

        transport.execute_with_retry(&method, &url, || {
            let mut builder = transport
                .request(method.clone(), &url)
                .headers(headers.clone());
            if !request.query_pairs().is_empty() {
                builder = builder.query(request.query_pairs());
            }
            if let Some(timeout) = request.timeout_override() {
                builder = builder.timeout(timeout);
            }
            match request.body_ref() {
                Some(body) => body.apply(builder),
                None => Ok(builder),
            }
        })
    }

    /// Executes a request and parses the response body as JSON.
    ///
    /// An empty body parses as JSON `null`.
    pub fn api_request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, Error> {
        self.request(request)?.json()
    }

    /// Sends a `GET` request.
    pub fn get(&self, path: &str) -> Result<Value, Error> {
        self.api_request(ApiRequest::get(path))
    }

    /// Sends a `POST` request with a JSON body.
    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, Error> {
        self.api_request(ApiRequest::post(path).json(body)?)
    }

    /// Sends a `PUT` request with a JSON body.
    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, Error> {
        self.api_request(ApiRequest::put(path).json(body)?)
    }

    /// Sends a `PATCH` request with a JSON body.
    pub fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, Error> {
        self.api_request(ApiRequest::patch(path).json(body)?)
    }

    /// Sends a `DELETE` request.
    pub fn delete(&self, path: &str) -> Result<Value, Error> {
        self.api_request(ApiRequest::delete(path))
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.inner.config.base_url())
            .field("credential", &self.inner.credential)
            .finish_non_exhaustive()
    }
}
