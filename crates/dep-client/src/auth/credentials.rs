//! OAuth1 credential type.

use std::fmt;

use serde::Deserialize;

/// The long-lived OAuth1 credentials issued for a DEP server.
///
/// The consumer pair identifies the MDM server; the access pair authorizes
/// it. Both are required to obtain a session token and are immutable for the
/// life of the client.
///
/// Deserializes from the token file downloaded from the vendor portal:
///
/// ```
/// use dep_client::OAuthCredentials;
///
/// let creds: OAuthCredentials = serde_json::from_str(r#"{
///     "consumer_key": "CK_1",
///     "consumer_secret": "CS_1",
///     "access_token": "AT_1",
///     "access_secret": "AS_1",
///     "access_token_expiry": "2027-01-01T00:00:00Z"
/// }"#).unwrap();
/// assert_eq!(creds.consumer_key(), "CK_1");
/// ```
///
/// # Security
///
/// Secrets are never exposed in Debug output to prevent accidental logging.
#[derive(Clone, Deserialize)]
pub struct OAuthCredentials {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_secret: String,
}

impl OAuthCredentials {
    /// Create new credentials.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_secret: access_secret.into(),
        }
    }

    /// Returns the consumer key.
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Returns the access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub(crate) fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub(crate) fn access_secret(&self) -> &str {
        &self.access_secret
    }
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("access_token", &self.access_token)
            .field("access_secret", &"[REDACTED]")
            .finish()
    }
}
