//! Profile command implementations.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use dep_client::{DepClient, Profile};

use crate::output;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Fetch a profile by UUID
    Get(GetArgs),

    /// Define a new profile from JSON
    Define(DefineArgs),

    /// Assign a profile to devices
    Assign(AssignArgs),

    /// Remove profile assignments from devices
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Profile UUID
    pub uuid: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct DefineArgs {
    /// JSON file with the profile definition (use - for stdin)
    #[arg(long)]
    pub json: String,
}

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Profile UUID
    pub uuid: String,

    /// Device serial numbers
    #[arg(required = true)]
    pub serials: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Device serial numbers
    #[arg(required = true)]
    pub serials: Vec<String>,
}

pub async fn handle(cmd: ProfileCommand, client: &DepClient) -> Result<()> {
    match cmd.command {
        ProfileSubcommand::Get(args) => {
            let profile = client
                .profile(&args.uuid)
                .await
                .context("Failed to fetch profile")?;
            output::json_as(&profile, args.pretty)
        }
        ProfileSubcommand::Define(args) => {
            let profile = read_profile(&args.json)?;
            let response = client
                .define_profile(&profile)
                .await
                .context("Failed to define profile")?;

            output::success(&format!("Defined profile: {}", response.profile_uuid));
            output::json(&response.devices)
        }
        ProfileSubcommand::Assign(args) => {
            let response = client
                .assign_profile(&args.uuid, &args.serials)
                .await
                .context("Failed to assign profile")?;
            output::json(&response.devices)
        }
        ProfileSubcommand::Remove(args) => {
            let devices = client
                .remove_profile(&args.serials)
                .await
                .context("Failed to remove profile")?;
            output::json(&devices)
        }
    }
}

fn read_profile(path: &str) -> Result<Profile> {
    let content = if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).context("Failed to read JSON file")?
    };

    serde_json::from_str(&content).context("Invalid profile JSON")
}
