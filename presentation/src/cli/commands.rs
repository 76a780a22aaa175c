//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use ussd_domain::{Dialect, EndpointUpdate, NewEndpoint};

/// CLI arguments for ussd-sim
#[derive(Parser, Debug)]
#[command(name = "ussd-sim")]
#[command(author, version, about = "USSD gateway simulator - dial your callback from the terminal")]
#[command(long_about = r#"
ussd-sim plays the part of a USSD gateway. It dials a service code against
your callback URL, speaking the wire format of the gateway you target, and
shows each menu the callback returns.

Supported dialects: arkesel, africastalking, hollatags

Configuration files are loaded from (in priority order):
1. USSD_SIM_* environment variables
2. --config <path>     Explicit config file
3. ./ussd-sim.toml     Project-level config
4. ~/.config/ussd-sim/config.toml   Global config

Example:
  ussd-sim endpoints add --name bank --url http://localhost:3000/ussd --dialect africastalking --phone 254711000222
  ussd-sim dial bank "*384*1#"
  ussd-sim --transcript ussd.jsonl dial bank
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress spinners and banners
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the effective config, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Seconds to wait for the callback to answer each turn
    #[arg(long, global = true, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Append a JSONL transcript of the dialogue to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an interactive USSD session against an endpoint
    Dial {
        /// Endpoint id or name
        endpoint: String,

        /// Service code to dial, e.g. "*123#" (prompted for if omitted)
        code: Option<String>,
    },

    /// Manage configured endpoints
    #[command(subcommand)]
    Endpoints(EndpointsCommand),
}

#[derive(Subcommand, Debug)]
pub enum EndpointsCommand {
    /// List endpoints, newest first
    List,

    /// Show one endpoint
    Show {
        /// Endpoint id or name
        id: String,
    },

    /// Add an endpoint
    Add(AddEndpointArgs),

    /// Change some fields of an endpoint
    Update(UpdateEndpointArgs),

    /// Remove an endpoint
    Remove {
        /// Endpoint id or name
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct AddEndpointArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Callback URL the simulated gateway posts to
    #[arg(long, value_name = "URL")]
    pub url: String,

    /// Gateway wire format
    #[arg(long)]
    pub dialect: Dialect,

    /// Subscriber number sent with every turn
    #[arg(long, value_name = "MSISDN")]
    pub phone: String,
}

impl AddEndpointArgs {
    pub fn into_new_endpoint(self) -> NewEndpoint {
        NewEndpoint {
            name: self.name,
            phone_number: self.phone,
            callback_url: self.url,
            dialect: self.dialect,
        }
    }
}

#[derive(Args, Debug)]
pub struct UpdateEndpointArgs {
    /// Endpoint id or name
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    #[arg(long)]
    pub dialect: Option<Dialect>,

    #[arg(long, value_name = "MSISDN")]
    pub phone: Option<String>,
}

impl UpdateEndpointArgs {
    pub fn to_update(&self) -> EndpointUpdate {
        EndpointUpdate {
            name: self.name.clone(),
            phone_number: self.phone.clone(),
            callback_url: self.url.clone(),
            dialect: self.dialect,
        }
    }
}
