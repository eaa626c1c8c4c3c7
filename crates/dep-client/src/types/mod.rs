//! Validated value types.

mod server_url;

pub use server_url::{DEFAULT_SERVER_URL, ServerUrl};
