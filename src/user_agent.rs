//! User-Agent header generation.
//!
//! Every request identifies the SDK as `<product-name>/<version>` so the
//! platform can attribute traffic and plan deprecations.

/// User-Agent string, `gantry-rust/<crate version>`.
const USER_AGENT: &str = concat!("gantry-rust/", env!("CARGO_PKG_VERSION"));

/// Returns the User-Agent string for SDK requests.
///
/// Format: `gantry-rust/0.1.0`
pub fn user_agent() -> &'static str {
    USER_AGENT
}
