//! DEP server URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidRequestError};

/// The production DEP server.
pub const DEFAULT_SERVER_URL: &str = "https://mdmenrollment.apple.com/";

/// A validated DEP server base URL.
///
/// This type ensures the URL is absolute, uses HTTPS (or HTTP for localhost),
/// and always ends in `/` so that relative endpoint paths resolve beneath it.
///
/// # Example
///
/// ```
/// use dep_client::ServerUrl;
///
/// let server = ServerUrl::new("https://mdmenrollment.apple.com").unwrap();
/// assert_eq!(
///     server.resolve("devices/sync").unwrap().as_str(),
///     "https://mdmenrollment.apple.com/devices/sync"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServerUrl(Url);

impl ServerUrl {
    /// Create a new server URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let mut url = Url::parse(s).map_err(|e| InvalidRequestError::ServerUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: directory-style path so joins append rather than replace
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self(url))
    }

    /// Resolve an endpoint path against this base.
    ///
    /// Relative paths resolve beneath the base; an absolute URL replaces it.
    pub fn resolve(&self, path: &str) -> Result<Url, Error> {
        self.0.join(path).map_err(|e| {
            InvalidRequestError::Path {
                value: path.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidRequestError::ServerUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        // Must be HTTPS (or HTTP for localhost)
        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidRequestError::ServerUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidRequestError::ServerUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for ServerUrl {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid"))
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServerUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ServerUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ServerUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ServerUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ServerUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_is_production_server() {
        let server = ServerUrl::default();
        assert_eq!(server.host(), Some("mdmenrollment.apple.com"));
        assert_eq!(server.as_str(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn valid_localhost_http() {
        let server = ServerUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(server.host(), Some("127.0.0.1"));
    }

    #[test]
    fn relative_paths_resolve_beneath_prefix() {
        let server = ServerUrl::new("https://dep.example.com/proxy").unwrap();
        assert_eq!(
            server.resolve("devices/sync").unwrap().as_str(),
            "https://dep.example.com/proxy/devices/sync"
        );
    }

    #[test]
    fn rooted_path_replaces_base_path() {
        let server = ServerUrl::new("https://dep.example.com/proxy/").unwrap();
        assert_eq!(
            server.resolve("/session").unwrap().as_str(),
            "https://dep.example.com/session"
        );
    }

    #[test]
    fn absolute_path_overrides_base() {
        let server = ServerUrl::default();
        assert_eq!(
            server.resolve("https://other.example.com/account").unwrap().as_str(),
            "https://other.example.com/account"
        );
    }

    #[test]
    fn malformed_path_is_invalid_request() {
        let server = ServerUrl::default();
        let err = server.resolve("http://[::1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ServerUrl::new("http://mdmenrollment.apple.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ServerUrl::new("/devices").is_err());
    }
}
