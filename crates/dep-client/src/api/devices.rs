//! Device listing, sync and lookup.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::DepClient;
use crate::error::Error;
use crate::pagination::{DeviceRequest, Page};

use super::{DEVICE_DETAILS_PATH, FETCH_DEVICES_PATH, SYNC_DEVICES_PATH};

/// A device assigned to this server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub serial_number: String,
    pub model: String,
    pub description: String,
    pub color: String,
    pub asset_tag: String,
    pub profile_status: String,
    pub profile_uuid: String,
    pub profile_assign_time: String,
    pub profile_assign_date: String,
    pub profile_push_time: String,
    pub device_assigned_by: String,
    pub device_assigned_date: String,
    pub os: String,
    pub device_family: String,
    /// Sync only: `added`, `modified` or `deleted`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_type: Option<String>,
    /// Sync only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_date: Option<DateTime<Utc>>,
    /// Lookup only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

/// Devices returned by a lookup, keyed by serial number.
pub type DeviceDetails = HashMap<String, Device>;

/// Wire envelope of the paginated device endpoints.
#[derive(Debug, Deserialize)]
struct DeviceResponse {
    #[serde(default)]
    devices: Vec<Device>,
    #[serde(default)]
    cursor: Option<String>,
    #[serde(default)]
    fetched_until: Option<DateTime<Utc>>,
    #[serde(default)]
    more_to_follow: bool,
}

impl From<DeviceResponse> for Page<Device> {
    fn from(response: DeviceResponse) -> Self {
        Page {
            items: response.devices,
            cursor: response.cursor,
            fetched_until: response.fetched_until,
            more_to_follow: response.more_to_follow,
        }
    }
}

#[derive(Debug, Serialize)]
struct DeviceList<'a> {
    devices: &'a [String],
}

#[derive(Debug, Default, Deserialize)]
struct DeviceDetailsResponse {
    #[serde(default)]
    devices: DeviceDetails,
}

impl DepClient {
    /// Fetch one page of the full device list.
    ///
    /// Start without a cursor; pass each page's cursor into the next request
    /// until the page reports [`Page::is_done`].
    #[instrument(skip(self), fields(server = %self.server()))]
    pub async fn fetch_devices(&self, request: &DeviceRequest) -> Result<Page<Device>, Error> {
        let response: DeviceResponse = self
            .call("fetch devices", Method::POST, FETCH_DEVICES_PATH, Some(request))
            .await?;
        Ok(response.into())
    }

    /// Fetch one page of device changes since the request's cursor.
    #[instrument(skip(self), fields(server = %self.server()))]
    pub async fn sync_devices(&self, request: &DeviceRequest) -> Result<Page<Device>, Error> {
        let response: DeviceResponse = self
            .call("sync devices", Method::POST, SYNC_DEVICES_PATH, Some(request))
            .await?;
        Ok(response.into())
    }

    /// Look up details for specific devices by serial number.
    #[instrument(skip(self), fields(server = %self.server(), count = serials.len()))]
    pub async fn device_details(&self, serials: &[String]) -> Result<DeviceDetails, Error> {
        let body = DeviceList { devices: serials };
        let response: DeviceDetailsResponse = self
            .call("device details", Method::POST, DEVICE_DETAILS_PATH, Some(&body))
            .await?;
        Ok(response.devices)
    }
}
