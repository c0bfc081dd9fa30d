//! Transport layer for Gantry communication.
//!
//! - [`ApiRequest`] / [`Body`] / [`FormPart`]: what to send
//! - [`Response`]: a successful response with its body read
//! - `RestTransport`: the blocking reqwest session and retry loop (internal)
//!
//! Users interact with these through [`Connection`](crate::Connection).

mod request;
pub(crate) mod rest;
mod response;

pub use request::{ApiRequest, Body, FormPart};
pub use response::Response;

pub(crate) use request::merge_headers;
pub(crate) use rest::RestTransport;
