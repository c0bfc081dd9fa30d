//! Blocking REST transport using reqwest.
//!
//! Owns the HTTP session and the retry loop. Responses whose status is in the
//! retry set are re-sent with exponential backoff; anything else is returned
//! after the first attempt. Error statuses left over at the end are
//! translated into typed errors here, so callers only ever see `Ok` for
//! successful responses.

use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::RequestBuilder;
use reqwest::header::RETRY_AFTER;

use super::Response;
use crate::Error;
use crate::config::RetryConfig;

/// Blocking HTTP transport with status-based retries.
#[derive(Clone)]
pub(crate) struct RestTransport {
    client: reqwest::blocking::Client,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("retry_config", &self.retry_config)
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    /// Creates a transport with the given default per-attempt timeout.
    pub(crate) fn new(retry_config: RetryConfig, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::configuration(format!("failed to create HTTP client: {}", e)).with_source(e)
            })?;

        Ok(Self {
            client,
            retry_config,
        })
    }

    /// Returns a request builder on the underlying session.
    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Executes a request with retry logic.
    ///
    /// `make_request` is called once per attempt. At most
    /// `max_retries + 1` attempts are made. Connection and timeout errors are
    /// returned immediately.
    pub(crate) fn execute_with_retry<F>(
        &self,
        method: &Method,
        url: &str,
        make_request: F,
    ) -> Result<Response, Error>
    where
        F: Fn() -> Result<RequestBuilder, Error>,
    {
        let max_attempts = self.retry_config.max_retries.saturating_add(1);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            tracing::debug!(%method, url, attempt, "sending request");

            let response = make_request()?.send().map_err(|e| {
                tracing::debug!(%method, url, attempt, error = %e, "request failed");
                Error::from(e)
            })?;
            let status = response.status();

            if self.retry_config.should_retry_status(status.as_u16()) && attempt < max_attempts {
                let delay = self.retry_delay(&response, attempt);
                tracing::warn!(
                    %method,
                    url,
                    status = status.as_u16(),
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying after server error"
                );
                drop(response);
                std::thread::sleep(delay);
                continue;
            }

            if status.is_client_error() || status.is_server_error() {
                tracing::debug!(%method, url, status = status.as_u16(), attempt, "request failed");
                return Err(Error::from_response(response));
            }

            tracing::debug!(%method, url, status = status.as_u16(), attempt, "request succeeded");
            return Response::read(response);
        }
    }

    /// Delay before the retry following `attempt`.
    fn retry_delay(&self, response: &reqwest::blocking::Response, attempt: u32) -> Duration {
        let retry_after = if self.retry_config.respect_retry_after {
            response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        } else {
            None
        };

        match retry_after {
            Some(delay) => self.retry_config.clamp_retry_after(delay),
            None => self.retry_config.delay_for_attempt(attempt),
        }
    }
}
