//! HTTP plumbing: request construction, transport, and response decoding.

mod request;
mod response;
mod transport;

pub use request::RequestBuilder;
pub(crate) use response::read_json;
pub use transport::HttpTransport;

/// Value of both `Content-Type` and `Accept`.
pub const CONTENT_TYPE_JSON: &str = "application/json;charset=UTF8";

/// Header naming the protocol version the client speaks.
pub const PROTOCOL_VERSION_HEADER: &str = "X-Server-Protocol-Version";

/// Protocol version sent on every request.
pub const PROTOCOL_VERSION: &str = "3";

/// Header carrying the session token on authenticated requests.
pub const SESSION_HEADER: &str = "X-ADM-Auth-Session";
