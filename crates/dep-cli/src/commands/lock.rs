//! Activation lock command implementation.

use anyhow::{Context, Result};
use clap::Args;

use dep_client::{ActivationLockRequest, DepClient};

use crate::output;

#[derive(Args, Debug)]
pub struct LockArgs {
    /// Device serial number
    #[arg(long)]
    pub device: String,

    /// Escrow key for bypassing the lock
    #[arg(long, env = "DEP_ESCROW_KEY", hide_env_values = true)]
    pub escrow_key: Option<String>,

    /// Message shown on the lost device
    #[arg(long)]
    pub lost_message: Option<String>,
}

pub async fn run(args: LockArgs, client: &DepClient) -> Result<()> {
    let request = ActivationLockRequest {
        device: args.device,
        escrow_key: args.escrow_key.unwrap_or_default(),
        lost_message: args.lost_message.unwrap_or_default(),
    };

    let response = client
        .lock_device(&request)
        .await
        .context("Failed to lock device")?;

    output::field("Serial", &response.serial_number);
    output::field("Status", &response.response_status);

    Ok(())
}
