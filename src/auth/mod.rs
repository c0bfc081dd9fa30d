//! Authentication for the Gantry SDK.
//!
//! - [`Credential`]: the resolved authentication material
//! - [`Credential::resolve`]: picks a credential from the `GANTRY_*` settings
//! - [`normalize_principal_id`]: the user/datasource id prefix rule
//!
//! ## From the environment
//!
//! ```rust,ignore
//! // GANTRY_API_TOKEN wins over GANTRY_USER_ID/GANTRY_USER_PAT, which win over
//! // GANTRY_DATASOURCE_ID/GANTRY_DATASOURCE_SECRET.
//! let conn = gantry::Connection::from_env()?;
//! ```
//!
//! ## Explicit
//!
//! ```rust,ignore
//! use gantry::{Connection, Credential};
//!
//! let conn = Connection::builder()
//!     .credential(Credential::datasource("ds_123", "secret"))
//!     .build()?;
//! ```

mod credentials;
mod resolver;

pub use credentials::{Credential, DATASOURCE_PREFIX, USER_PREFIX, normalize_principal_id};
