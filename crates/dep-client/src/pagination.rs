//! Cursor-based pagination for the device listing endpoints.
//!
//! The client never loops on its own. Each call performs exactly one round
//! trip and hands back the page; callers feed the returned cursor into the
//! next request until [`Page::is_done`] reports completion. This lets a
//! caller stop early, apply backpressure, or persist the cursor and resume
//! after a restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::Device;
use crate::client::DepClient;
use crate::error::{Error, InvalidRequestError};

/// Largest page size the server accepts.
pub const MAX_LIMIT: u32 = 1000;

/// A validated page size, at most [`MAX_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Limit(u32);

impl Limit {
    /// Create a page size, rejecting values above [`MAX_LIMIT`].
    pub fn new(limit: u32) -> Result<Self, Error> {
        if limit > MAX_LIMIT {
            return Err(InvalidRequestError::Limit {
                value: limit,
                max: MAX_LIMIT,
            }
            .into());
        }
        Ok(Self(limit))
    }

    /// Returns the page size.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Limit {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Request state for one page of a device listing.
///
/// Built fresh for every call; the cursor is carried by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<Limit>,
}

impl DeviceRequest {
    /// Create a request, validating the page size before any network call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if `limit` exceeds [`MAX_LIMIT`].
    pub fn new(cursor: Option<String>, limit: Option<u32>) -> Result<Self, Error> {
        Ok(Self {
            cursor,
            limit: limit.map(Limit::new).transpose()?,
        })
    }

    /// Returns a copy of this request positioned at `cursor`.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Returns a copy of this request with the given page size.
    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn limit(&self) -> Option<Limit> {
        self.limit
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Continuation marker for the next request.
    pub cursor: Option<String>,
    /// Server time up to which this page is current.
    pub fetched_until: Option<DateTime<Utc>>,
    pub more_to_follow: bool,
}

impl<T> Page<T> {
    /// True once the server reports no further pages.
    ///
    /// An empty page is not the end of a listing; only `more_to_follow`
    /// decides.
    pub fn is_done(&self) -> bool {
        !self.more_to_follow
    }

    /// The request for the page after this one, keeping the page size.
    ///
    /// Returns `None` when the listing is complete, or when the server asked
    /// for more pages without saying where to resume.
    pub fn next_request(&self, previous: &DeviceRequest) -> Option<DeviceRequest> {
        if self.is_done() {
            return None;
        }
        let cursor = self.cursor.as_ref()?;
        Some(previous.clone().with_cursor(cursor.as_str()))
    }
}

/// Which device listing endpoint a pager walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceListing {
    /// `server/devices`: the full device list.
    Fetch,
    /// `devices/sync`: changes since a cursor.
    Sync,
}

/// Caller-owned cursor holder for walking a device listing page by page.
///
/// [`DevicePager::next_page`] performs one round trip per call. A failed call
/// leaves the cursor untouched so it can be retried or persisted.
#[derive(Debug)]
pub struct DevicePager<'a> {
    client: &'a DepClient,
    listing: DeviceListing,
    request: DeviceRequest,
    done: bool,
}

impl<'a> DevicePager<'a> {
    pub fn new(client: &'a DepClient, listing: DeviceListing, request: DeviceRequest) -> Self {
        Self {
            client,
            listing,
            request,
            done: false,
        }
    }

    /// Fetch the next page, or `None` once the listing is complete.
    pub async fn next_page(&mut self) -> Result<Option<Page<Device>>, Error> {
        if self.done {
            return Ok(None);
        }

        let page = match self.listing {
            DeviceListing::Fetch => self.client.fetch_devices(&self.request).await?,
            DeviceListing::Sync => self.client.sync_devices(&self.request).await?,
        };
        debug!(
            listing = ?self.listing,
            items = page.items.len(),
            more_to_follow = page.more_to_follow,
            "received device page"
        );

        if !page.is_done() && page.cursor.is_none() {
            warn!(listing = ?self.listing, "more_to_follow without a cursor");
            return Err(Error::Decoding(serde::de::Error::custom(
                "more_to_follow is set but no cursor was returned",
            )));
        }

        match page.next_request(&self.request) {
            Some(next) => self.request = next,
            None => {
                if let Some(cursor) = &page.cursor {
                    self.request.cursor = Some(cursor.clone());
                }
                self.done = true;
            }
        }
        Ok(Some(page))
    }

    /// The cursor the next call will send; persist it to resume later.
    pub fn cursor(&self) -> Option<&str> {
        self.request.cursor()
    }

    /// True once the final page has been returned.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn page(cursor: Option<&str>, more_to_follow: bool) -> Page<u32> {
        Page {
            items: Vec::new(),
            cursor: cursor.map(str::to_string),
            fetched_until: None,
            more_to_follow,
        }
    }

    #[test]
    fn limit_accepts_range() {
        assert_eq!(Limit::new(0).unwrap().get(), 0);
        assert_eq!(Limit::new(1000).unwrap().get(), 1000);
    }

    #[test]
    fn limit_rejects_over_max() {
        let err = Limit::new(1001).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(DeviceRequest::new(None, Some(5000)).is_err());
    }

    #[test]
    fn limit_passes_through_unchanged() {
        let request = DeviceRequest::new(Some("c0".into()), Some(250)).unwrap();
        assert_eq!(request.limit().map(Limit::get), Some(250));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"cursor": "c0", "limit": 250})
        );
    }

    #[test]
    fn empty_request_serializes_to_empty_object() {
        let request = DeviceRequest::default();
        assert_eq!(serde_json::to_string(&request).unwrap(), "{}");
    }

    #[test]
    fn empty_page_with_more_to_follow_is_not_done() {
        let page = page(Some("c1"), true);
        assert!(page.items.is_empty());
        assert!(!page.is_done());
    }

    #[test]
    fn next_request_carries_cursor_and_limit() {
        let first = DeviceRequest::new(None, Some(100)).unwrap();
        let next = page(Some("c1"), true).next_request(&first).unwrap();
        assert_eq!(next.cursor(), Some("c1"));
        assert_eq!(next.limit().map(Limit::get), Some(100));
    }

    #[test]
    fn no_next_request_without_cursor() {
        let request = DeviceRequest::new(Some("c0".into()), Some(10)).unwrap();
        assert!(page(None, true).next_request(&request).is_none());
    }

    #[test]
    fn no_next_request_when_done() {
        let request = DeviceRequest::default();
        assert!(page(Some("c2"), false).next_request(&request).is_none());
    }
}
