//! Subcommand implementations.

mod account;
mod devices;
mod lock;
mod profile;
mod session;

use anyhow::Result;
use clap::Subcommand;

use dep_client::DepClient;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the server account details
    Account(account::AccountArgs),

    /// Perform a session handshake and show its expiry
    Session(session::SessionArgs),

    /// Device listing, sync and lookup
    Devices(devices::DevicesCommand),

    /// Enrollment profile operations
    Profile(profile::ProfileCommand),

    /// Enable activation lock on a device
    Lock(lock::LockArgs),
}

pub async fn handle(cmd: Commands, client: &DepClient) -> Result<()> {
    match cmd {
        Commands::Account(args) => account::run(args, client).await,
        Commands::Session(args) => session::run(args, client).await,
        Commands::Devices(cmd) => devices::handle(cmd, client).await,
        Commands::Profile(cmd) => profile::handle(cmd, client).await,
        Commands::Lock(args) => lock::run(args, client).await,
    }
}
