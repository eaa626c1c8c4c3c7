//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use dep_client::types::DEFAULT_SERVER_URL;

use crate::commands::Commands;

/// DEP CLI tool for device enrollment server exploration.
#[derive(Parser, Debug)]
#[command(name = "dep")]
#[command(author, version = env!("DEP_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to connect and how to authenticate.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// DEP server base URL
    #[arg(long, env = "DEP_SERVER_URL", global = true, default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// OAuth token file downloaded from the vendor portal
    #[arg(long, env = "DEP_TOKENS", global = true)]
    pub tokens: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,
}
