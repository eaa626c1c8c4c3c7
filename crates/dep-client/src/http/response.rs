//! Response envelope decoding.

use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::error::{Error, ServerError};

/// Decode a JSON response body, or surface a non-success status verbatim.
///
/// The response is consumed on every path, releasing the connection.
pub(crate) async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, Error> {
    let status = response.status();
    trace!(status = %status, "DEP response");

    if !status.is_success() {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "failed to read error response body");
                String::new()
            }
        };
        return Err(ServerError::new(status.as_u16(), body).into());
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(Error::Decoding)
}
