//! Prelude module for convenient imports.
//!
//! ```rust
//! use gantry::prelude::*;
//! ```
//!
//! This provides access to:
//! - the connection and its builder
//! - request, response and error types
//! - credentials and retry configuration
//! - pagination

pub use crate::{
    auth::Credential,
    client::{Connection, ConnectionBuilder},
    config::{RetryConfig, Settings},
    error::{Error, ErrorKind, Result},
    pagination::{Page, PageIterator},
    transport::{ApiRequest, Body, FormPart, Response},
};
