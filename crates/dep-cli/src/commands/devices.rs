//! Device command implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use dep_client::{DepClient, Device, DeviceListing, DeviceRequest, Page};

use crate::output;

#[derive(Args, Debug)]
pub struct DevicesCommand {
    #[command(subcommand)]
    pub command: DevicesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DevicesSubcommand {
    /// List devices assigned to this server
    List(ListArgs),

    /// Fetch device changes since a cursor
    Sync(SyncArgs),

    /// Look up specific devices by serial number
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Pagination cursor
    #[arg(long)]
    pub cursor: Option<String>,

    /// Maximum number of devices per page (at most 1000)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Keep fetching until the last page
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Cursor from a previous list or sync
    #[arg(long)]
    pub cursor: String,

    /// Maximum number of devices per page (at most 1000)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Keep fetching until the last page
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Device serial numbers
    #[arg(required = true)]
    pub serials: Vec<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn handle(cmd: DevicesCommand, client: &DepClient) -> Result<()> {
    match cmd.command {
        DevicesSubcommand::List(args) => {
            let request =
                DeviceRequest::new(args.cursor, args.limit).context("Invalid list options")?;
            walk(client, DeviceListing::Fetch, request, args.all).await
        }
        DevicesSubcommand::Sync(args) => {
            let request = DeviceRequest::new(Some(args.cursor), args.limit)
                .context("Invalid sync options")?;
            walk(client, DeviceListing::Sync, request, args.all).await
        }
        DevicesSubcommand::Show(args) => show(client, args).await,
    }
}

/// Print one page, or every page with `all`, one device per line.
async fn walk(
    client: &DepClient,
    listing: DeviceListing,
    request: DeviceRequest,
    all: bool,
) -> Result<()> {
    let mut pager = client.device_pager(listing, request);
    let mut total = 0;

    while let Some(page) = pager
        .next_page()
        .await
        .context("Failed to fetch devices")?
    {
        total += page.items.len();
        print_page(&page)?;
        if !all {
            break;
        }
    }

    if total == 0 {
        eprintln!("{}", "No devices found.".dimmed());
    }

    eprintln!();
    if let Some(cursor) = pager.cursor() {
        output::note("Next cursor", cursor);
    }
    output::note("More to follow", &(!pager.is_done()).to_string());

    Ok(())
}

fn print_page(page: &Page<Device>) -> Result<()> {
    for device in &page.items {
        output::json(device)?;
    }
    if let Some(fetched_until) = page.fetched_until {
        output::note("Fetched until", &fetched_until.to_rfc3339());
    }
    Ok(())
}

async fn show(client: &DepClient, args: ShowArgs) -> Result<()> {
    let details = client
        .device_details(&args.serials)
        .await
        .context("Failed to look up devices")?;

    output::json_as(&details, args.pretty)
}
