//! Retry configuration for transient server failures.

use std::time::Duration;

/// Status codes retried by default.
pub const DEFAULT_RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Configuration for retry behavior on transient server failures.
///
/// Only responses whose status is in [`retry_statuses`](Self::retry_statuses)
/// are retried. Connection errors and every other status are returned to the
/// caller on the first attempt.
///
/// ## Default Values
///
/// - `max_retries`: 5
/// - `backoff_factor`: 1s
/// - `multiplier`: 2.0
/// - `max_delay`: 120s
/// - `jitter`: 0.0
/// - `retry_statuses`: 500, 502, 503, 504
/// - `respect_retry_after`: true
///
/// ## Example
///
/// ```rust
/// use gantry::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///     .with_max_retries(2)
///     .with_backoff_factor(Duration::from_millis(200));
/// assert_eq!(config.delay_for_attempt(2), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub backoff_factor: Duration,

    /// Multiplier for exponential backoff.
    pub multiplier: f64,

    /// Maximum delay between retries.
    pub max_delay: Duration,

    /// Jitter factor (0.0 to 1.0) to add randomness to delays.
    pub jitter: f64,

    /// Response statuses that trigger a retry.
    pub retry_statuses: Vec<u16>,

    /// Whether a `Retry-After` header replaces the computed delay.
    pub respect_retry_after: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(120),
            jitter: 0.0,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            respect_retry_after: true,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that disables retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn with_backoff_factor(mut self, factor: Duration) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Sets the exponential backoff multiplier.
    ///
    /// Negative values are clamped to zero. Non-finite values are ignored.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        if multiplier.is_finite() {
            self.multiplier = multiplier.max(0.0);
        }
        self
    }

    /// Sets the maximum delay between retries.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the jitter factor.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Replaces the set of retried statuses.
    #[must_use]
    pub fn with_retry_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retry_statuses = statuses.into_iter().collect();
        self
    }

    /// Sets whether a `Retry-After` header replaces the computed delay.
    #[must_use]
    pub fn with_respect_retry_after(mut self, respect: bool) -> Self {
        self.respect_retry_after = respect;
        self
    }

    /// Returns `true` if a response with this status should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Calculates the delay before a given retry.
    ///
    /// Uses exponential backoff: `backoff_factor * multiplier^(attempt - 1)`
    /// capped at `max_delay`, with optional jitter. Attempt `0` is the
    /// initial request and has no delay.
    ///
    /// Never panics: a negative product yields zero, NaN yields `max_delay`,
    /// and a delay too large for `Duration` yields `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base_delay = self.backoff_factor.as_secs_f64() * self.multiplier.powi(exponent);
        // f64::min/max return the non-NaN operand
        let capped_delay = base_delay.min(self.max_delay.as_secs_f64()).max(0.0);

        let jittered = if self.jitter > 0.0 {
            let jitter_range = capped_delay * self.jitter;
            let jitter_offset = (fastrand::f64() - 0.5) * 2.0 * jitter_range;
            (capped_delay + jitter_offset).max(0.0)
        } else {
            capped_delay
        };

        Duration::try_from_secs_f64(jittered).unwrap_or(self.max_delay)
    }

    /// Caps a server-provided `Retry-After` delay at `max_delay`.
    pub fn clamp_retry_after(&self, delay: Duration) -> Duration {
        delay.min(self.max_delay)
    }

    /// Returns `true` if retries are enabled.
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }
}
