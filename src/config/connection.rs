//! Resolved connection configuration.

use std::time::Duration;

use url::Url;

use super::{RetryConfig, Settings};
use crate::Error;

/// Base URL used when neither the builder nor `GANTRY_API_URL` sets one.
pub const DEFAULT_BASE_URL: &str = "https://api.gantry.dev";

/// Per-attempt timeout used when neither the builder nor `GANTRY_TIMEOUT` sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry count used when neither the builder nor `GANTRY_MAX_RETRY_COUNT` sets one.
pub const DEFAULT_MAX_RETRY_COUNT: u32 = 5;

/// Immutable configuration owned by a [`Connection`](crate::Connection).
///
/// Each value is resolved once with the precedence
/// explicit argument > environment > built-in default.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    base_url: String,
    timeout: Duration,
    retry: RetryConfig,
}

impl ConnectionConfig {
    /// Resolves a configuration from explicit overrides and settings.
    ///
    /// A caller-supplied `retry` policy counts as an explicit retry count,
    /// ranked below `max_retry_count` and above the environment.
    pub(crate) fn resolve(
        base_url: Option<String>,
        timeout: Option<Duration>,
        max_retry_count: Option<u32>,
        retry: Option<RetryConfig>,
        settings: &Settings,
    ) -> Result<Self, Error> {
        let base_url = base_url
            .or_else(|| settings.api_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = normalize_base_url(&base_url)?;

        let timeout = timeout.or(settings.timeout).unwrap_or(DEFAULT_TIMEOUT);

        let explicit_retry_count = retry.as_ref().map(|r| r.max_retries);
        let mut retry = retry.unwrap_or_default();
        retry.max_retries = max_retry_count
            .or(explicit_retry_count)
            .or(settings.max_retry_count)
            .unwrap_or(DEFAULT_MAX_RETRY_COUNT);

        Ok(Self {
            base_url,
            timeout,
            retry,
        })
    }

    /// Returns the base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the maximum number of retries after the first attempt.
    pub fn max_retry_count(&self) -> u32 {
        self.retry.max_retries
    }

    /// Returns the retry policy.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Builds the request URL for a path.
    ///
    /// The path is always appended to the base URL with exactly one `/` at
    /// the junction, so requests (and their credential) never leave the
    /// configured host.
    pub fn url_for(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> Result<String, Error> {
    let parsed = Url::parse(raw)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration(format!(
            "base URL must use http or https: {}",
            raw
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
