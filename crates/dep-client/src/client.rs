//! The DEP client: configuration, dispatch and session stamping.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Method, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::auth::{DEFAULT_SESSION_LIFETIME, OAuthCredentials, SessionManager, Signer};
use crate::error::{Error, ResultExt};
use crate::http::{HttpTransport, RequestBuilder, SESSION_HEADER, read_json};
use crate::pagination::{DeviceListing, DevicePager, DeviceRequest};
use crate::types::ServerUrl;

const DEFAULT_USER_AGENT: &str = concat!("dep-client/", env!("CARGO_PKG_VERSION"));

/// A client for a DEP server.
///
/// Clients are cheap to clone (they use internal `Arc`) and safe to share
/// across tasks. All clones share one session.
///
/// # Example
///
/// ```no_run
/// use dep_client::{DepClient, DeviceRequest, OAuthCredentials};
///
/// # async fn example() -> Result<(), dep_client::Error> {
/// let creds = OAuthCredentials::new("CK_...", "CS_...", "AT_...", "AS_...");
/// let client = DepClient::new(creds)?;
///
/// let account = client.account().await?;
/// println!("{}", account.server_name);
///
/// let page = client.fetch_devices(&DeviceRequest::new(None, Some(100))?).await?;
/// println!("{} devices, done: {}", page.items.len(), page.is_done());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DepClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    requests: RequestBuilder,
    transport: Arc<dyn HttpTransport>,
    session: SessionManager,
}

/// Configuration for a [`DepClient`].
pub struct ClientBuilder {
    credentials: OAuthCredentials,
    server_url: ServerUrl,
    user_agent: String,
    session_lifetime: Duration,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientBuilder {
    fn new(credentials: OAuthCredentials) -> Self {
        Self {
            credentials,
            server_url: ServerUrl::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            session_lifetime: DEFAULT_SESSION_LIFETIME,
            timeout: None,
            transport: None,
        }
    }

    /// Override the server base URL.
    pub fn server_url(mut self, server_url: ServerUrl) -> Self {
        self.server_url = server_url;
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// How long a session token is reused before a new handshake.
    pub fn session_lifetime(mut self, lifetime: Duration) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    /// Per-request timeout applied to every outbound request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send requests through a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for an unusable user agent and `Transport`
    /// if the default HTTP client cannot be initialized.
    pub fn build(self) -> Result<DepClient, Error> {
        let requests = RequestBuilder::new(self.server_url, &self.user_agent, self.timeout)?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(reqwest::Client::builder().build()?),
        };

        let session = SessionManager::new(
            Signer::new(self.credentials),
            requests.clone(),
            Arc::clone(&transport),
            self.session_lifetime,
        );

        Ok(DepClient {
            inner: Arc::new(ClientInner {
                requests,
                transport,
                session,
            }),
        })
    }
}

impl DepClient {
    /// Create a client for the production server with default settings.
    pub fn new(credentials: OAuthCredentials) -> Result<Self, Error> {
        Self::builder(credentials).build()
    }

    /// Start configuring a client.
    pub fn builder(credentials: OAuthCredentials) -> ClientBuilder {
        ClientBuilder::new(credentials)
    }

    /// Returns the server this client talks to.
    pub fn server(&self) -> &ServerUrl {
        self.inner.requests.server()
    }

    /// Returns the builder used to compose unauthenticated requests.
    pub fn requests(&self) -> &RequestBuilder {
        &self.inner.requests
    }

    /// Make sure a valid session is held, performing a handshake if needed.
    ///
    /// Safe to call concurrently: at most one handshake runs at a time, and
    /// callers queued behind it share its outcome.
    pub async fn ensure_session(&self) -> Result<(), Error> {
        self.inner.session.ensure_session().await.map(|_| ())
    }

    /// Returns when the current session expires, if one is held.
    pub async fn session_expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.session.expires_at().await
    }

    /// Drop the current session so the next call performs a handshake.
    pub async fn invalidate_session(&self) {
        self.inner.session.invalidate().await
    }

    /// Begin walking a device listing one page at a time.
    pub fn device_pager(&self, listing: DeviceListing, request: DeviceRequest) -> DevicePager<'_> {
        DevicePager::new(self, listing, request)
    }

    /// Dispatch a built request with the session token and decode the reply.
    ///
    /// # Errors
    ///
    /// - `Session` if no session could be established
    /// - `Transport` if the request could not be sent
    /// - `Server` for a non-success status, with the body verbatim
    /// - `Decoding` if a success body is not the expected JSON
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute<R: DeserializeOwned>(&self, mut request: Request) -> Result<R, Error> {
        let token = self
            .inner
            .session
            .ensure_session()
            .await
            .context(format!("failed to get session for request to {}", request.url()))?;

        request
            .headers_mut()
            .insert(SESSION_HEADER, token.header_value().clone());

        debug!("DEP request");
        let response = self.inner.transport.execute(request).await?;
        read_json(response).await
    }

    /// Build, dispatch and decode in one step, naming the operation in errors.
    pub(crate) async fn call<B, R>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self
            .inner
            .requests
            .build(method, path, body)
            .context(format!("failed to create {} request", operation))?;
        self.send(operation, request).await
    }

    /// Dispatch an already-built request, naming the operation in errors.
    pub(crate) async fn send<R: DeserializeOwned>(
        &self,
        operation: &str,
        request: Request,
    ) -> Result<R, Error> {
        self.execute(request)
            .await
            .context(format!("error running {} request", operation))
    }
}

impl std::fmt::Debug for DepClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepClient")
            .field("server", self.server())
            .field("session", &self.inner.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> OAuthCredentials {
        OAuthCredentials::new("CK_1", "CS_1", "AT_1", "AS_1")
    }

    #[test]
    fn defaults_to_production_server() {
        let client = DepClient::new(credentials()).unwrap();
        assert_eq!(client.server().as_str(), "https://mdmenrollment.apple.com/");
    }

    #[test]
    fn debug_hides_secrets() {
        let client = DepClient::new(credentials()).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("CS_1"));
        assert!(!debug.contains("AS_1"));
    }

    #[test]
    fn rejects_invalid_user_agent() {
        let result = DepClient::builder(credentials())
            .user_agent("line\nbreak")
            .build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn no_session_before_first_call() {
        let client = DepClient::new(credentials()).unwrap();
        assert!(client.session_expires_at().await.is_none());
    }
}
