//! OAuth1 HMAC-SHA1 request signing.
//!
//! The DEP session handshake is a two-legged OAuth1 exchange: the consumer
//! pair acts as the client credentials and the access pair as the token
//! credentials. Only the handshake is signed; business calls carry the
//! session token instead.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Method;
use reqwest::header::HeaderValue;
use sha1::Sha1;
use url::Url;

use crate::error::{Error, InvalidRequestError, SigningError};

use super::credentials::OAuthCredentials;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Computes OAuth1 `Authorization` headers from a credential quadruple.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: OAuthCredentials,
}

impl Signer {
    /// Create a signer for the given credentials.
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self { credentials }
    }

    /// Returns the credentials this signer uses.
    pub fn credentials(&self) -> &OAuthCredentials {
        &self.credentials
    }

    /// Produce a signed `Authorization` header for a request.
    ///
    /// `url` must already be resolved against the server base. A fresh nonce
    /// and timestamp are generated for every call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the URL cannot be parsed.
    pub fn authorization(&self, method: &Method, url: &str) -> Result<HeaderValue, Error> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = Utc::now().timestamp();
        self.authorization_with(method, url, &nonce, timestamp)
    }

    /// Deterministic core of [`Signer::authorization`].
    pub(crate) fn authorization_with(
        &self,
        method: &Method,
        url: &str,
        nonce: &str,
        timestamp: i64,
    ) -> Result<HeaderValue, Error> {
        let url = Url::parse(url).map_err(|e| InvalidRequestError::Url {
            value: url.to_string(),
            reason: e.to_string(),
        })?;

        let timestamp = timestamp.to_string();
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.credentials.consumer_key()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_token()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let base = signature_base(method, &url, &oauth_params);
        let signature = self.sign(&base)?;
        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort_unstable();

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        HeaderValue::from_str(&format!("OAuth {}", header))
            .map_err(|_| SigningError::Header.into())
    }

    fn sign(&self, base: &str) -> Result<String, Error> {
        let key = format!(
            "{}&{}",
            encode(self.credentials.consumer_secret()),
            encode(self.credentials.access_secret())
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| SigningError::Key(e.to_string()))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// Build the signature base string: method, base URI, normalized parameters.
fn signature_base(method: &Method, url: &Url, oauth_params: &[(&str, &str)]) -> String {
    let mut params: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .chain(url.query_pairs().map(|(k, v)| (encode(&k), encode(&v))))
        .collect();
    params.sort();

    let normalized = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_ascii_uppercase(),
        encode(&base_uri(url)),
        encode(&normalized)
    )
}

/// Scheme, host, non-default port and path; no query or fragment.
fn base_uri(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    }
}

/// RFC 3986 percent-encoding: everything but unreserved characters.
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn signer() -> Signer {
        Signer::new(OAuthCredentials::new("CK_1", "CS_1", "AT_1", "AS_1"))
    }

    #[test]
    fn signs_session_handshake() {
        let header = signer()
            .authorization_with(
                &Method::GET,
                "https://mdmenrollment.apple.com/session",
                "abc123",
                1_700_000_000,
            )
            .unwrap();

        assert_eq!(
            header.to_str().unwrap(),
            "OAuth oauth_consumer_key=\"CK_1\", oauth_nonce=\"abc123\", \
             oauth_signature=\"NAzWMia4o4XXYlgpYJayhEqjdzk%3D\", \
             oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1700000000\", \
             oauth_token=\"AT_1\", oauth_version=\"1.0\""
        );
    }

    #[test]
    fn query_parameters_are_signed() {
        let header = signer()
            .authorization_with(
                &Method::GET,
                "https://dep.example.com/profile?profile_uuid=88ab%2012",
                "n0nce",
                1_700_000_000,
            )
            .unwrap();

        assert!(
            header
                .to_str()
                .unwrap()
                .contains("oauth_signature=\"VsGqlgzjBV4%2BKtaLmDEsFMEWeQQ%3D\"")
        );
    }

    #[test]
    fn base_string_uses_uppercase_method_and_encoded_uri() {
        let url = Url::parse("https://mdmenrollment.apple.com/session").unwrap();
        let base = signature_base(&Method::GET, &url, &[("oauth_nonce", "a b")]);
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fmdmenrollment.apple.com%2Fsession&oauth_nonce%3Da%2520b"
        );
    }

    #[test]
    fn base_uri_keeps_non_default_port() {
        let url = Url::parse("http://127.0.0.1:8080/session?x=1").unwrap();
        assert_eq!(base_uri(&url), "http://127.0.0.1:8080/session");

        let url = Url::parse("https://mdmenrollment.apple.com:443/session").unwrap();
        assert_eq!(base_uri(&url), "https://mdmenrollment.apple.com/session");
    }

    #[test]
    fn fresh_nonce_per_call() {
        let signer = signer();
        let a = signer.authorization(&Method::GET, "https://dep.example.com/session").unwrap();
        let b = signer.authorization(&Method::GET, "https://dep.example.com/session").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unparseable_url_is_invalid_request() {
        let err = signer().authorization(&Method::GET, "not a url").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
