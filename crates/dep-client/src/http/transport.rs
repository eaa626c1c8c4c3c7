//! Pluggable HTTP transport.

use async_trait::async_trait;

use crate::error::TransportError;

/// Sends fully-built requests to the network.
///
/// Implemented for [`reqwest::Client`]. Supply a custom implementation to
/// add middleware (proxies, recording, retries) beneath the client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the raw response.
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, TransportError>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, TransportError> {
        reqwest::Client::execute(self, request)
            .await
            .map_err(TransportError::from)
    }
}
