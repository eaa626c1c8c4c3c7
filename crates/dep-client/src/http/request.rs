//! Outbound request construction.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Request};
use serde::Serialize;
use tracing::trace;

use crate::error::{Error, InvalidRequestError};
use crate::types::ServerUrl;

use super::{CONTENT_TYPE_JSON, PROTOCOL_VERSION, PROTOCOL_VERSION_HEADER};

/// Composes requests against a DEP server.
///
/// Built requests carry the JSON, user agent and protocol version headers but
/// no authentication; the dispatcher stamps the session token on last.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    server: ServerUrl,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl RequestBuilder {
    /// Create a builder for the given server.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the user agent is not a valid header value.
    pub fn new(
        server: ServerUrl,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|_| InvalidRequestError::Header { name: "User-Agent" })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));
        headers.insert(USER_AGENT, user_agent);
        headers.insert(
            PROTOCOL_VERSION_HEADER,
            HeaderValue::from_static(PROTOCOL_VERSION),
        );

        Ok(Self {
            server,
            headers,
            timeout,
        })
    }

    /// Returns the server requests are resolved against.
    pub fn server(&self) -> &ServerUrl {
        &self.server
    }

    /// Build a request for `path`, JSON-encoding `body` when present.
    ///
    /// A `None` body produces an empty payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a malformed path and `Encoding` if the
    /// body cannot be serialized.
    pub fn build<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Request, Error>
    where
        B: Serialize + ?Sized,
    {
        let url = self.server.resolve(path)?;

        let payload = match body {
            Some(body) => serde_json::to_vec(body).map_err(Error::Encoding)?,
            None => Vec::new(),
        };
        trace!(%method, %url, bytes = payload.len(), "built request");

        let mut request = Request::new(method, url);
        *request.headers_mut() = self.headers.clone();
        *request.timeout_mut() = self.timeout;
        if !payload.is_empty() {
            *request.body_mut() = Some(payload.into());
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::ErrorKind;

    fn builder() -> RequestBuilder {
        let server = ServerUrl::new("https://dep.example.com").unwrap();
        RequestBuilder::new(server, "dep-client/test", Some(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn sets_standard_headers() {
        let request = builder().build(Method::GET, "account", None::<&()>).unwrap();
        let headers = request.headers();

        assert_eq!(headers[CONTENT_TYPE], "application/json;charset=UTF8");
        assert_eq!(headers[ACCEPT], "application/json;charset=UTF8");
        assert_eq!(headers[USER_AGENT], "dep-client/test");
        assert_eq!(headers[PROTOCOL_VERSION_HEADER], "3");
        assert!(headers.get("X-ADM-Auth-Session").is_none());
    }

    #[test]
    fn resolves_relative_path() {
        let request = builder()
            .build(Method::POST, "devices/sync", None::<&()>)
            .unwrap();
        assert_eq!(request.url().as_str(), "https://dep.example.com/devices/sync");
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.timeout(), Some(&Duration::from_secs(5)));
    }

    #[test]
    fn none_body_is_empty() {
        let request = builder().build(Method::GET, "account", None::<&()>).unwrap();
        assert!(request.body().is_none());
    }

    #[test]
    fn encodes_json_body() {
        let body = serde_json::json!({"devices": ["C02XXXXXXXXX"]});
        let request = builder()
            .build(Method::POST, "devices", Some(&body))
            .unwrap();

        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn unencodable_body_is_encoding_error() {
        // JSON object keys must be strings
        let mut body = BTreeMap::new();
        body.insert((1, 2), "value");

        let err = builder()
            .build(Method::POST, "devices", Some(&body))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn malformed_path_is_invalid_request() {
        let err = builder()
            .build(Method::GET, "http://[::1", None::<&()>)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn rejects_invalid_user_agent() {
        let server = ServerUrl::default();
        let err = RequestBuilder::new(server, "bad\nagent", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
