//! Configuration types for the Gantry SDK.
//!
//! This module provides:
//! - [`Settings`]: the `GANTRY_*` environment snapshot
//! - [`RetryConfig`]: retry behavior for transient server failures
//! - [`ConnectionConfig`]: the resolved base URL, timeout and retry policy

mod connection;
mod retry;
mod settings;

pub use connection::{
    ConnectionConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRY_COUNT, DEFAULT_TIMEOUT,
};
pub use retry::{DEFAULT_RETRY_STATUSES, RetryConfig};
pub use settings::{
    ENV_API_TOKEN, ENV_API_URL, ENV_DATASOURCE_ID, ENV_DATASOURCE_SECRET, ENV_MAX_RETRY_COUNT,
    ENV_TIMEOUT, ENV_USER_ID, ENV_USER_PAT, Settings,
};
