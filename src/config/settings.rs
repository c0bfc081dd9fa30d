//! Environment-provided settings.

use std::fmt;
use std::time::Duration;

/// Bearer token secret.
pub const ENV_API_TOKEN: &str = "GANTRY_API_TOKEN";
/// User identifier, paired with [`ENV_USER_PAT`].
pub const ENV_USER_ID: &str = "GANTRY_USER_ID";
/// Personal access token for [`ENV_USER_ID`].
pub const ENV_USER_PAT: &str = "GANTRY_USER_PAT";
/// Datasource identifier, paired with [`ENV_DATASOURCE_SECRET`].
pub const ENV_DATASOURCE_ID: &str = "GANTRY_DATASOURCE_ID";
/// Secret for [`ENV_DATASOURCE_ID`].
pub const ENV_DATASOURCE_SECRET: &str = "GANTRY_DATASOURCE_SECRET";
/// Per-attempt timeout override, in whole seconds.
pub const ENV_TIMEOUT: &str = "GANTRY_TIMEOUT";
/// Maximum retry count override.
pub const ENV_MAX_RETRY_COUNT: &str = "GANTRY_MAX_RETRY_COUNT";
/// Base URL override.
pub const ENV_API_URL: &str = "GANTRY_API_URL";

/// Snapshot of the `GANTRY_*` environment variables.
///
/// This is the only place the SDK reads the process environment. Everything
/// downstream (credential resolution, connection defaults) works from a
/// `Settings` value, so tests can build one from a map instead of mutating
/// global state.
///
/// Empty variables are treated as unset. Numeric variables that fail to
/// parse are ignored with a warning.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Value of `GANTRY_API_TOKEN`.
    pub api_token: Option<String>,
    /// Value of `GANTRY_USER_ID`.
    pub user_id: Option<String>,
    /// Value of `GANTRY_USER_PAT`.
    pub user_pat: Option<String>,
    /// Value of `GANTRY_DATASOURCE_ID`.
    pub datasource_id: Option<String>,
    /// Value of `GANTRY_DATASOURCE_SECRET`.
    pub datasource_secret: Option<String>,
    /// Value of `GANTRY_API_URL`.
    pub api_url: Option<String>,
    /// Parsed value of `GANTRY_TIMEOUT`.
    pub timeout: Option<Duration>,
    /// Parsed value of `GANTRY_MAX_RETRY_COUNT`.
    pub max_retry_count: Option<u32>,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary lookup function.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use gantry::config::Settings;
    ///
    /// let vars = HashMap::from([("GANTRY_MAX_RETRY_COUNT", "2")]);
    /// let settings = Settings::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
    /// assert_eq!(settings.max_retry_count, Some(2));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            api_token: get(ENV_API_TOKEN),
            user_id: get(ENV_USER_ID),
            user_pat: get(ENV_USER_PAT),
            datasource_id: get(ENV_DATASOURCE_ID),
            datasource_secret: get(ENV_DATASOURCE_SECRET),
            api_url: get(ENV_API_URL),
            timeout: get(ENV_TIMEOUT)
                .and_then(|v| parse_number::<u64>(ENV_TIMEOUT, &v))
                .map(Duration::from_secs),
            max_retry_count: get(ENV_MAX_RETRY_COUNT)
                .and_then(|v| parse_number::<u32>(ENV_MAX_RETRY_COUNT, &v)),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse::<T>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(variable = key, value, "ignoring non-numeric setting");
            None
        }
    }
}

fn redact(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "[REDACTED]")
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_token", &redact(&self.api_token))
            .field("user_id", &self.user_id)
            .field("user_pat", &redact(&self.user_pat))
            .field("datasource_id", &self.datasource_id)
            .field("datasource_secret", &redact(&self.datasource_secret))
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("max_retry_count", &self.max_retry_count)
            .finish()
    }
}
