//! dep-client - Device Enrollment Program server client
//!
//! This library speaks the DEP server protocol. Long-lived OAuth1
//! credentials are exchanged for a short-lived session token, which the
//! [`DepClient`] caches, refreshes on expiry, and stamps on every call.
//!
//! # Example
//!
//! ```no_run
//! use dep_client::{DepClient, DeviceListing, DeviceRequest, OAuthCredentials, ServerUrl};
//!
//! # async fn example() -> Result<(), dep_client::Error> {
//! let creds = OAuthCredentials::new("CK_...", "CS_...", "AT_...", "AS_...");
//! let client = DepClient::builder(creds)
//!     .server_url(ServerUrl::new("https://mdmenrollment.apple.com")?)
//!     .build()?;
//!
//! let mut pager = client.device_pager(DeviceListing::Fetch, DeviceRequest::new(None, Some(500))?);
//! while let Some(page) = pager.next_page().await? {
//!     for device in &page.items {
//!         println!("{}: {}", device.serial_number, device.model);
//!     }
//! }
//! println!("resume sync from {:?}", pager.cursor());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod pagination;
pub mod types;

// Re-export primary types at crate root for convenience
pub use api::{
    Account, ActivationLockRequest, ActivationLockResponse, Device, DeviceDetails, Profile,
    ProfileResponse,
};
pub use auth::{DEFAULT_SESSION_LIFETIME, OAuthCredentials, SessionToken, Signer};
pub use client::{ClientBuilder, DepClient};
pub use error::{Error, ErrorKind, ServerError};
pub use http::{HttpTransport, RequestBuilder};
pub use pagination::{DeviceListing, DevicePager, DeviceRequest, Limit, MAX_LIMIT, Page};
pub use types::ServerUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
