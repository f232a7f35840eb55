//! Unified error type.

use std::fmt;

/// The error type returned by vereda's fallible operations.
///
/// Application-level outcomes (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type covers
/// infrastructure and I/O failures: binding a port, reading a file for
/// [`files::send`](crate::files::send), or rendering a view that was never
/// registered.
///
/// Returning `Result<Response, Error>` from a handler is allowed: an `Err`
/// is logged and answered with a bare `500 Internal Server Error`, never a
/// graceful page. A missing file on a download route is a deployment bug,
/// not a client-facing condition.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    MissingView(String),
    RenderContext(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::MissingView(name) => write!(f, "no view registered under `{name}`"),
            Self::RenderContext(e) => write!(f, "render context: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::MissingView(_) => None,
            Self::RenderContext(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
