//! Error kind enumeration for categorizing SDK errors.

/// Categorization of SDK errors.
///
/// The first eight kinds mirror the HTTP status the Gantry API answered with.
/// The remaining kinds describe failures that happen on this side of the wire.
///
/// ## Status mapping
///
/// | Status | ErrorKind             |
/// |--------|-----------------------|
/// | 400    | `BadRequest`          |
/// | 401    | `Unauthorized`        |
/// | 403    | `Forbidden`           |
/// | 404    | `NotFound`            |
/// | 405    | `MethodNotAllowed`    |
/// | 409    | `Conflict`            |
/// | 500    | `InternalServerError` |
/// | other  | `Http`                |
///
/// Note that 502, 503 and 504 are retried by the connection but still land on
/// `Http` once retries run out. They are not folded into
/// `InternalServerError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The request was malformed (HTTP 400).
    #[error("bad request")]
    BadRequest,

    /// Authentication failed or was missing (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Valid credentials without the required permission (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// The resource does not exist (HTTP 404).
    #[error("not found")]
    NotFound,

    /// The endpoint does not support the HTTP method (HTTP 405).
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The request conflicts with the current resource state (HTTP 409).
    #[error("conflict")]
    Conflict,

    /// The server failed while handling the request (HTTP 500).
    #[error("internal server error")]
    InternalServerError,

    /// Any other error status.
    #[error("http error")]
    Http,

    /// A resource locator used a scheme the SDK cannot handle.
    ///
    /// Raised by resource glue (for example a `gs://` path handed to an
    /// upload helper that only understands `s3://`), never by the connection.
    #[error("unsupported resource locator")]
    UnsupportedLocator,

    /// The connection could not be established.
    #[error("connection error")]
    Connection,

    /// An attempt exceeded its timeout.
    #[error("timeout")]
    Timeout,

    /// Any other transport failure reported by the HTTP client.
    #[error("transport error")]
    Transport,

    /// A success response whose body could not be decoded.
    #[error("invalid response")]
    InvalidResponse,

    /// A caller-supplied argument was rejected before any request was made.
    #[error("invalid argument")]
    InvalidArgument,

    /// The client could not be configured.
    #[error("configuration error")]
    Configuration,
}

impl ErrorKind {
    /// Maps an HTTP error status to its kind.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            405 => ErrorKind::MethodNotAllowed,
            409 => ErrorKind::Conflict,
            500 => ErrorKind::InternalServerError,
            _ => ErrorKind::Http,
        }
    }

    /// Returns `true` if this kind was produced from an HTTP error response.
    #[inline]
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::BadRequest
                | ErrorKind::Unauthorized
                | ErrorKind::Forbidden
                | ErrorKind::NotFound
                | ErrorKind::MethodNotAllowed
                | ErrorKind::Conflict
                | ErrorKind::InternalServerError
                | ErrorKind::Http
        )
    }
}
