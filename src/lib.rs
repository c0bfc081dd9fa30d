//! # Gantry Rust SDK
//!
//! Connection core for the Gantry ML platform API.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gantry::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<(), gantry::Error> {
//!     // Credentials, base URL, timeout and retry count come from GANTRY_*
//!     let conn = Connection::from_env()?;
//!
//!     let dataset = conn.post("/v1/datasets", &json!({"name": "clicks"}))?;
//!     println!("created {}", dataset["id"]);
//!
//!     // Walk every page of a listing
//!     let datasets = PageIterator::new(|cursor| {
//!         let mut request = ApiRequest::get("/v1/datasets");
//!         if let Some(cursor) = cursor {
//!             request = request.query("next_token", cursor);
//!         }
//!         conn.api_request::<Page<serde_json::Value>>(request)
//!     });
//!     for dataset in datasets {
//!         println!("{}", dataset?["name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Credentials**: a bearer token, or a user / datasource identity with a
//!   secret sent as Basic auth. Resolved once when a [`Connection`] is built.
//! - **Retries**: only 500/502/503/504 are retried, with exponential backoff.
//!   Every other error status fails immediately.
//! - **Typed errors**: error statuses become an [`Error`] whose
//!   [`ErrorKind`] identifies the status class, with the server's
//!   `error` / `error_description` / `error_detail` attached.
//! - **Blocking**: every call blocks the calling thread.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;

// Transport layer
pub mod transport;

// Helpers for list endpoints and uploads
pub mod digest;
pub mod pagination;

// Prelude for convenient imports
pub mod prelude;

mod user_agent;

// Re-export main types at crate root for convenience
pub use client::{Connection, ConnectionBuilder};
pub use error::{ApiErrorBody, Error, ErrorKind, Result, translate};

pub use auth::{Credential, normalize_principal_id};
pub use config::{ConnectionConfig, RetryConfig, Settings};
pub use digest::{MultipartDigest, multipart_etag, multipart_etag_reader};
pub use pagination::{Page, PageIterator};
pub use transport::{ApiRequest, Body, FormPart, Response};
