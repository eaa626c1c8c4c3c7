//! Session command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use dep_client::DepClient;

use crate::output;

#[derive(Args, Debug)]
pub struct SessionArgs {}

pub async fn run(_args: SessionArgs, client: &DepClient) -> Result<()> {
    eprintln!("{}", "Creating session...".dimmed());

    client
        .ensure_session()
        .await
        .context("Failed to create session")?;

    output::success("Session established");
    println!();
    output::field("Server", client.server().as_str());
    if let Some(expires_at) = client.session_expires_at().await {
        output::field("Expires", &expires_at.to_rfc3339());
    }

    Ok(())
}
