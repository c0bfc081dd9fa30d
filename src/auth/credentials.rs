//! Credential types for Gantry authentication.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Prefix required on user principal ids.
pub const USER_PREFIX: &str = "user-";

/// Prefix required on datasource principal ids.
pub const DATASOURCE_PREFIX: &str = "datasource-";

/// Authentication credentials attached to every request.
///
/// - `Bearer`: an API token, sent as `Authorization: Bearer <token>`
/// - `Basic`: a principal id and secret, sent as
///   `Authorization: Basic <base64(principal_id:secret)>`
///
/// Users (id + personal access token) and datasources (id + secret) both
/// authenticate with `Basic`; they differ only in the prefix carried by the
/// principal id, which the constructors apply.
///
/// ## Example
///
/// ```rust
/// use gantry::Credential;
///
/// let creds = Credential::user("42", "pat_abc");
/// assert_eq!(creds.principal_id(), Some("user-42"));
///
/// let creds = Credential::bearer("tok_123");
/// assert_eq!(creds.authorization_header(), "Bearer tok_123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Bearer token authentication.
    Bearer {
        /// The API token.
        token: Arc<str>,
    },

    /// HTTP basic authentication.
    Basic {
        /// Prefixed principal id (`user-...` or `datasource-...`).
        principal_id: String,
        /// The personal access token or datasource secret.
        secret: Arc<str>,
    },
}

impl Credential {
    /// Creates a bearer token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Credential::Bearer {
            token: Arc::from(token.into()),
        }
    }

    /// Creates a user credential from a user id and personal access token.
    ///
    /// The id is prefixed with `user-` unless it already is.
    pub fn user(user_id: impl AsRef<str>, personal_access_token: impl Into<String>) -> Self {
        Credential::Basic {
            principal_id: normalize_principal_id(USER_PREFIX, user_id.as_ref()),
            secret: Arc::from(personal_access_token.into()),
        }
    }

    /// Creates a datasource credential from a datasource id and secret.
    ///
    /// The id is prefixed with `datasource-` unless it already is.
    pub fn datasource(datasource_id: impl AsRef<str>, secret: impl Into<String>) -> Self {
        Credential::Basic {
            principal_id: normalize_principal_id(DATASOURCE_PREFIX, datasource_id.as_ref()),
            secret: Arc::from(secret.into()),
        }
    }

    /// Returns `true` if this is bearer token authentication.
    pub fn is_bearer(&self) -> bool {
        matches!(self, Credential::Bearer { .. })
    }

    /// Returns `true` if this is basic authentication.
    pub fn is_basic(&self) -> bool {
        matches!(self, Credential::Basic { .. })
    }

    /// Returns the principal id for basic credentials.
    pub fn principal_id(&self) -> Option<&str> {
        match self {
            Credential::Bearer { .. } => None,
            Credential::Basic { principal_id, .. } => Some(principal_id),
        }
    }

    /// Returns the variant name, safe for logging.
    pub fn scheme(&self) -> &'static str {
        match self {
            Credential::Bearer { .. } => "Bearer",
            Credential::Basic { .. } => "Basic",
        }
    }

    /// Builds the `Authorization` header value.
    pub fn authorization_header(&self) -> String {
        match self {
            Credential::Bearer { token } => format!("Bearer {}", token),
            Credential::Basic {
                principal_id,
                secret,
            } => {
                let encoded = STANDARD.encode(format!("{}:{}", principal_id, secret));
                format!("Basic {}", encoded)
            }
        }
    }
}

/// Prepends `prefix` to `id` unless it is already there.
///
/// Idempotent: normalizing an already-normalized id returns it unchanged.
///
/// ```rust
/// use gantry::auth::normalize_principal_id;
///
/// let once = normalize_principal_id("user-", "42");
/// assert_eq!(once, "user-42");
/// assert_eq!(normalize_principal_id("user-", &once), once);
/// ```
pub fn normalize_principal_id(prefix: &str, id: &str) -> String {
    if id.starts_with(prefix) {
        id.to_string()
    } else {
        format!("{}{}", prefix, id)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"[REDACTED]")
                .finish(),
            Credential::Basic { principal_id, .. } => f
                .debug_struct("Basic")
                .field("principal_id", principal_id)
                .field("secret", &"[REDACTED]")
                .finish(),
        }
    }
}
