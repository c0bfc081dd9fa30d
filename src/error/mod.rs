//! Error types for the Gantry SDK.
//!
//! Every failure surfaces as an [`Error`] whose [`ErrorKind`] tells the
//! caller what went wrong. HTTP error statuses are always translated into one
//! of the API kinds and returned as `Err`, never as a successful response:
//!
//! ```rust,ignore
//! match conn.get("/v1/channels/c1") {
//!     Ok(channel) => println!("{channel}"),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("no such channel"),
//!     Err(e) => return Err(e),
//! }
//! ```

mod api;
mod core;
mod kind;

pub use api::{ApiErrorBody, translate};
pub use self::core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for Gantry operations.
pub type Result<T> = std::result::Result<T, Error>;
