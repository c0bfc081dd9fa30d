//! Connection builder.

use std::time::Duration;

use super::Connection;
use crate::{
    Error,
    auth::Credential,
    config::{ConnectionConfig, RetryConfig, Settings},
    transport::RestTransport,
};

/// Where the connection's credential comes from.
#[derive(Debug, Clone, Default)]
enum CredentialSource {
    /// Resolve from settings at build time.
    #[default]
    Resolve,
    /// Use the given credential.
    Explicit(Credential),
    /// Send requests unauthenticated.
    Anonymous,
}

/// Builder for creating [`Connection`] instances.
///
/// Every setting is optional. Anything not set explicitly is taken from the
/// `GANTRY_*` environment (or from [`settings`](Self::settings) when given),
/// then from built-in defaults.
///
/// ## Example
///
/// ```rust,ignore
/// use gantry::{Connection, Credential, RetryConfig};
/// use std::time::Duration;
///
/// let conn = Connection::builder()
///     .base_url("https://api.gantry.dev")
///     .credential(Credential::bearer("tok_123"))
///     .timeout(Duration::from_secs(10))
///     .max_retry_count(3)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct ConnectionBuilder {
    base_url: Option<String>,
    credential: CredentialSource,
    timeout: Option<Duration>,
    max_retry_count: Option<u32>,
    retry_config: Option<RetryConfig>,
    settings: Option<Settings>,
}

impl ConnectionBuilder {
    /// Creates a new connection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL prepended to every request path.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the credential, skipping environment resolution.
    #[must_use]
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = CredentialSource::Explicit(credential);
        self
    }

    /// Sends requests without an `Authorization` header, even if the
    /// environment provides a credential.
    #[must_use]
    pub fn no_credential(mut self) -> Self {
        self.credential = CredentialSource::Anonymous;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the maximum number of retries for retryable statuses.
    #[must_use]
    pub fn max_retry_count(mut self, count: u32) -> Self {
        self.max_retry_count = Some(count);
        self
    }

    /// Sets the retry policy.
    ///
    /// Its `max_retries` is used unless [`max_retry_count`](Self::max_retry_count)
    /// is also set.
    #[must_use]
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Uses the given settings instead of reading the process environment.
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Resolves the configuration and builds the connection.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the base URL is invalid or the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<Connection, Error> {
        let settings = self.settings.unwrap_or_else(Settings::from_env);

        let config = ConnectionConfig::resolve(
            self.base_url,
            self.timeout,
            self.max_retry_count,
            self.retry_config,
            &settings,
        )?;

        let credential = match self.credential {
            CredentialSource::Resolve => Credential::resolve(&settings),
            CredentialSource::Explicit(credential) => Some(credential),
            CredentialSource::Anonymous => None,
        };

        let transport = RestTransport::new(config.retry().clone(), config.timeout())?;

        tracing::debug!(
            base_url = config.base_url(),
            timeout_secs = config.timeout().as_secs(),
            max_retry_count = config.max_retry_count(),
            authenticated = credential.is_some(),
            "connection configured"
        );

        Ok(Connection::from_parts(config, credential, transport))
    }
}
