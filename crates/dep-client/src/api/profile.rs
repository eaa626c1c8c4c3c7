//! Enrollment profiles.

use std::collections::HashMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::DepClient;
use crate::error::{Error, ResultExt};

use super::{PROFILE_DEVICES_PATH, PROFILE_PATH};

/// An enrollment profile pushed to devices during setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub profile_name: String,
    #[serde(rename = "url")]
    pub server_url: String,
    pub allow_pairing: bool,
    #[serde(rename = "is_supervised")]
    pub supervised: bool,
    #[serde(rename = "is_multi_user")]
    pub multi_user: bool,
    #[serde(rename = "is_mandatory")]
    pub mandatory: bool,
    pub await_device_configured: bool,
    #[serde(rename = "is_mdm_removable")]
    pub removable: bool,
    pub auto_advance_setup: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub support_phone_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub support_email_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub org_magic: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anchor_certs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supervising_host_certs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skip_setup_items: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub department: String,
    /// Serials to assign at definition time; always sent, even when empty.
    pub devices: Vec<String>,
    /// tvOS only.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    /// tvOS only.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
}

/// Result of defining or assigning a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileResponse {
    pub profile_uuid: String,
    /// Per-device status keyed by serial number.
    pub devices: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct AssignProfileRequest<'a> {
    profile_uuid: &'a str,
    devices: &'a [String],
}

#[derive(Debug, Serialize)]
struct RemoveProfileRequest<'a> {
    devices: &'a [String],
}

#[derive(Debug, Default, Deserialize)]
struct RemoveProfileResponse {
    #[serde(default)]
    devices: HashMap<String, String>,
}

impl DepClient {
    /// Fetch a profile by UUID.
    #[instrument(skip(self), fields(server = %self.server()))]
    pub async fn profile(&self, profile_uuid: &str) -> Result<Profile, Error> {
        let mut request = self
            .requests()
            .build(Method::GET, PROFILE_PATH, None::<&()>)
            .context("failed to create get profile request")?;
        request
            .url_mut()
            .query_pairs_mut()
            .append_pair("profile_uuid", profile_uuid);

        self.send("get profile", request).await
    }

    /// Define a new profile, optionally assigning it to `profile.devices`.
    #[instrument(skip(self, profile), fields(server = %self.server(), name = %profile.profile_name))]
    pub async fn define_profile(&self, profile: &Profile) -> Result<ProfileResponse, Error> {
        self.call("define profile", Method::POST, PROFILE_PATH, Some(profile))
            .await
    }

    /// Assign an existing profile to devices.
    #[instrument(skip(self), fields(server = %self.server(), count = serials.len()))]
    pub async fn assign_profile(
        &self,
        profile_uuid: &str,
        serials: &[String],
    ) -> Result<ProfileResponse, Error> {
        let body = AssignProfileRequest {
            profile_uuid,
            devices: serials,
        };
        self.call("assign profile", Method::POST, PROFILE_DEVICES_PATH, Some(&body))
            .await
    }

    /// Remove profile assignments from devices.
    ///
    /// Returns the per-device status keyed by serial number.
    #[instrument(skip(self), fields(server = %self.server(), count = serials.len()))]
    pub async fn remove_profile(
        &self,
        serials: &[String],
    ) -> Result<HashMap<String, String>, Error> {
        let body = RemoveProfileRequest { devices: serials };
        let response: RemoveProfileResponse = self
            .call("remove profile", Method::DELETE, PROFILE_DEVICES_PATH, Some(&body))
            .await?;
        Ok(response.devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_uses_wire_field_names() {
        let profile = Profile {
            profile_name: "Corporate".into(),
            server_url: "https://mdm.example.com/enroll".into(),
            supervised: true,
            removable: false,
            devices: vec!["C02XXXXXXXXX".into()],
            ..Default::default()
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["url"], "https://mdm.example.com/enroll");
        assert_eq!(value["is_supervised"], true);
        assert_eq!(value["is_mdm_removable"], false);
        assert!(value.get("language").is_none());
        assert!(value.get("server_url").is_none());
    }

    #[test]
    fn profile_always_sends_device_list() {
        let profile = Profile {
            profile_name: "Kiosk".into(),
            ..Default::default()
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["devices"], serde_json::json!([]));
        assert!(value.get("await_device_configured").is_some());
    }
}
