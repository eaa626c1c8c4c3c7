//! Authentication: OAuth1 credentials, request signing and session management.
//!
//! Every authenticated call goes through the session manager, which performs
//! the signed handshake only when no valid session token is held.

mod credentials;
mod session;
mod signer;
mod tokens;

pub use credentials::OAuthCredentials;
pub(crate) use session::SessionManager;
pub use session::DEFAULT_SESSION_LIFETIME;
pub use signer::Signer;
pub use tokens::SessionToken;
