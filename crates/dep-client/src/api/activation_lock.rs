//! Activation lock escrow.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::DepClient;
use crate::error::Error;

use super::ACTIVATION_LOCK_PATH;

/// Request body for enabling activation lock on a device.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationLockRequest {
    /// Device serial number.
    pub device: String,
    /// Escrow key used to bypass the lock later; sent even when empty.
    #[serde(default)]
    pub escrow_key: String,
    #[serde(default)]
    pub lost_message: String,
}

// Hide the escrow key in Debug output
impl std::fmt::Debug for ActivationLockRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationLockRequest")
            .field("device", &self.device)
            .field("escrow_key", &"[REDACTED]")
            .field("lost_message", &self.lost_message)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationLockResponse {
    pub serial_number: String,
    pub response_status: String,
}

impl DepClient {
    /// Enable activation lock on a device.
    #[instrument(skip(self, request), fields(device = %request.device))]
    pub async fn lock_device(
        &self,
        request: &ActivationLockRequest,
    ) -> Result<ActivationLockResponse, Error> {
        self.call("lock device", Method::POST, ACTIVATION_LOCK_PATH, Some(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_debug_hides_escrow_key() {
        let request = ActivationLockRequest {
            device: "C02XXXXXXXXX".into(),
            escrow_key: "super-secret-key".into(),
            lost_message: String::new(),
        };
        let debug = format!("{:?}", request);
        assert!(debug.contains("C02XXXXXXXXX"));
        assert!(!debug.contains("super-secret-key"));
    }

    #[test]
    fn request_always_sends_escrow_key_and_lost_message() {
        let request = ActivationLockRequest {
            device: "C02XXXXXXXXX".into(),
            escrow_key: String::new(),
            lost_message: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "device": "C02XXXXXXXXX",
                "escrow_key": "",
                "lost_message": ""
            })
        );
    }
}
