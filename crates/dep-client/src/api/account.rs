//! Server account details.

use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use crate::client::DepClient;
use crate::error::Error;

use super::ACCOUNT_PATH;

/// The MDM server account as registered with the DEP server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub server_name: String,
    pub server_uuid: String,
    pub admin_id: String,
    pub facilitator_id: String,
    pub org_id: String,
    pub org_id_hash: String,
    pub org_name: String,
    pub org_email: String,
    pub org_phone: String,
    pub org_address: String,
    pub org_type: String,
    pub org_version: String,
    pub urls: Vec<EndpointUrl>,
}

/// An endpoint the account may call, with its rate limits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointUrl {
    pub uri: String,
    #[serde(deserialize_with = "one_or_many")]
    pub http_method: Vec<String>,
    pub limit: EndpointLimit,
}

/// Page size bounds advertised for an endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointLimit {
    pub default: u32,
    pub maximum: u32,
}

/// Accept either `"GET"` or `["GET", "POST"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(method) => vec![method],
        OneOrMany::Many(methods) => methods,
    })
}

impl DepClient {
    /// Fetch the account details for this server.
    #[instrument(skip(self), fields(server = %self.server()))]
    pub async fn account(&self) -> Result<Account, Error> {
        self.call("account", Method::GET, ACCOUNT_PATH, None::<&()>)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_account_with_both_method_shapes() {
        let account: Account = serde_json::from_value(serde_json::json!({
            "server_name": "Teleport MDM",
            "server_uuid": "677cd2d8-2f5a-4b80-a1ac-1b05a9b7e4f1",
            "org_name": "Example Org",
            "urls": [
                {"uri": "/account", "http_method": ["GET"], "limit": {"default": 0, "maximum": 0}},
                {"uri": "/server/devices", "http_method": "POST", "limit": {"default": 100, "maximum": 1000}}
            ]
        }))
        .unwrap();

        assert_eq!(account.server_name, "Teleport MDM");
        assert_eq!(account.urls[0].http_method, vec!["GET"]);
        assert_eq!(account.urls[1].http_method, vec!["POST"]);
        assert_eq!(account.urls[1].limit.maximum, 1000);
        assert!(account.admin_id.is_empty());
    }
}
