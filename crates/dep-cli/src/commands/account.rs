//! Account command implementation.

use anyhow::{Context, Result};
use clap::Args;

use dep_client::DepClient;

use crate::output;

#[derive(Args, Debug)]
pub struct AccountArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: AccountArgs, client: &DepClient) -> Result<()> {
    let account = client
        .account()
        .await
        .context("Failed to fetch account")?;

    output::json_as(&account, args.pretty)
}
