//! Business endpoints.
//!
//! Each wrapper builds one request, dispatches it through the session-aware
//! client, and wraps any failure with the name of the operation.

mod account;
mod activation_lock;
mod devices;
mod profile;

pub use account::{Account, EndpointLimit, EndpointUrl};
pub use activation_lock::{ActivationLockRequest, ActivationLockResponse};
pub use devices::{Device, DeviceDetails};
pub use profile::{Profile, ProfileResponse};

/// `GET account`
pub const ACCOUNT_PATH: &str = "account";

/// `POST device/activationlock`
pub const ACTIVATION_LOCK_PATH: &str = "device/activationlock";

/// `POST devices`
pub const DEVICE_DETAILS_PATH: &str = "devices";

/// `POST server/devices`
pub const FETCH_DEVICES_PATH: &str = "server/devices";

/// `POST devices/sync`
pub const SYNC_DEVICES_PATH: &str = "devices/sync";

/// `GET`/`POST profile`
pub const PROFILE_PATH: &str = "profile";

/// `POST`/`DELETE profile/devices`
pub const PROFILE_DEVICES_PATH: &str = "profile/devices";
