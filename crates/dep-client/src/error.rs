//! Error types for the DEP client.
//!
//! Every failure surfaces as a single [`Error`] whose machine-checkable
//! [`ErrorKind`] survives any number of added context layers.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// The unified error type for DEP client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be formed (bad path, URL, or parameter).
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] InvalidRequestError),

    /// A request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encoding(#[source] serde_json::Error),

    /// A response body was not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decoding(#[source] serde_json::Error),

    /// The OAuth1 signature could not be constructed.
    #[error("failed to sign request: {0}")]
    Signing(#[from] SigningError),

    /// The server answered with a non-success status.
    #[error("server error: {0}")]
    Server(#[from] ServerError),

    /// The session handshake failed.
    ///
    /// The cause is shared so that every caller waiting on the same
    /// handshake observes the identical failure.
    #[error("session handshake failed: {0}")]
    Session(#[source] Arc<Error>),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// An error with one added layer of operation context.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// The category of an [`Error`], independent of any context layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    Encoding,
    Decoding,
    Signing,
    Server,
    Session,
    Transport,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidRequest => "invalid request",
            ErrorKind::Encoding => "encoding",
            ErrorKind::Decoding => "decoding",
            ErrorKind::Signing => "signing",
            ErrorKind::Server => "server",
            ErrorKind::Session => "session",
            ErrorKind::Transport => "transport",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Wrap this error with a description of the operation that failed.
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the kind of the innermost error, looking through context layers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::Decoding(_) => ErrorKind::Decoding,
            Error::Signing(_) => ErrorKind::Signing,
            Error::Server(_) => ErrorKind::Server,
            Error::Session(_) => ErrorKind::Session,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// Returns the context strings attached to this error, outermost first.
    pub fn contexts(&self) -> Vec<&str> {
        let mut contexts = Vec::new();
        let mut current = self;
        while let Error::Context { context, source } = current {
            contexts.push(context.as_str());
            current = source;
        }
        contexts
    }

    /// Returns the server error carried by this error, if any.
    ///
    /// For session errors the handshake's own server error is returned.
    pub fn server_error(&self) -> Option<&ServerError> {
        match self.root() {
            Error::Server(err) => Some(err),
            Error::Session(cause) => cause.server_error(),
            _ => None,
        }
    }

    fn root(&self) -> &Error {
        let mut current = self;
        while let Error::Context { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Attach operation context to fallible results.
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a description of the failed operation.
    fn context(self, context: impl Into<String>) -> Result<T, Error>;
}

impl<T> ResultExt<T> for Result<T, Error> {
    fn context(self, context: impl Into<String>) -> Result<T, Error> {
        self.map_err(|err| err.context(context))
    }
}

/// Errors detected before any network call is made.
#[derive(Debug, Error)]
pub enum InvalidRequestError {
    /// A request path could not be resolved against the server URL.
    #[error("invalid path '{value}': {reason}")]
    Path { value: String, reason: String },

    /// A URL could not be parsed.
    #[error("invalid URL '{value}': {reason}")]
    Url { value: String, reason: String },

    /// A server base URL failed validation.
    #[error("invalid server URL '{value}': {reason}")]
    ServerUrl { value: String, reason: String },

    /// A page size exceeded the server maximum.
    #[error("limit {value} exceeds the maximum of {max}")]
    Limit { value: u32, max: u32 },

    /// A header value contained characters not allowed on the wire.
    #[error("invalid value for header {name}")]
    Header { name: &'static str },
}

/// OAuth1 signature construction failures.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The HMAC key could not be initialized.
    #[error("invalid signing key: {0}")]
    Key(String),

    /// The Authorization header could not be encoded.
    #[error("authorization header is not valid ASCII")]
    Header,
}

/// A non-success HTTP response, with the body preserved verbatim.
#[derive(Debug, Clone)]
pub struct ServerError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body text.
    pub body: String,
}

impl ServerError {
    /// Create a new server error.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if the server rejected the request's authentication.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServerError {}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_looks_through_context() {
        let err = Error::from(ServerError::new(500, "boom"))
            .context("failed to run request")
            .context("failed to sync devices");

        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(
            err.contexts(),
            vec!["failed to sync devices", "failed to run request"]
        );
    }

    #[test]
    fn display_includes_context_chain() {
        let err = Error::from(InvalidRequestError::Limit {
            value: 1001,
            max: 1000,
        })
        .context("failed to create sync request");

        let msg = err.to_string();
        assert!(msg.starts_with("failed to create sync request: "));
        assert!(msg.contains("1001"));
    }

    #[test]
    fn session_error_exposes_handshake_server_error() {
        let cause = Error::from(ServerError::new(403, "forbidden"));
        let err = Error::Session(Arc::new(cause)).context("failed to get session");

        assert_eq!(err.kind(), ErrorKind::Session);
        let server = err.server_error().unwrap();
        assert_eq!(server.status, 403);
        assert!(server.is_auth_error());
    }

    #[test]
    fn server_error_display_keeps_body_verbatim() {
        let err = ServerError::new(401, r#"{"error":"bad session"}"#);
        assert_eq!(err.to_string(), r#"HTTP 401: {"error":"bad session"}"#);
    }
}
