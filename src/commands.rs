//! CLI command definitions
//!
//! Defines the clap commands for the bridge-e2e CLI.

use clap::{Args, Subcommand};

use crate::common::config::RunSection;

#[derive(Subcommand)]
pub enum Commands {
    /// Run bridge scenarios (all of them when no names are given)
    Run {
        /// Scenarios to run, in order
        scenarios: Vec<String>,

        #[command(flatten)]
        args: RunArgs,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered scenarios in run order
    List,
}

/// Run parameters that override the config file
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Private key of the mainnet account (hex)
    #[arg(long, env = "BRIDGE_E2E_MAINNET_KEY", hide_env_values = true)]
    pub mainnet_key: Option<String>,

    /// Private key of the schain account (hex)
    #[arg(long, env = "BRIDGE_E2E_SCHAIN_KEY", hide_env_values = true)]
    pub schain_key: Option<String>,

    /// Name of the schain under test
    #[arg(long)]
    pub schain_name: Option<String>,

    /// Mainnet endpoint the schain bridge should use
    #[arg(long)]
    pub mainnet_rpc_url: Option<String>,

    /// Per-scenario timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl RunArgs {
    /// Overlay the flags that were given onto the file's run section
    pub fn apply(self, run: &mut RunSection) {
        if self.mainnet_key.is_some() {
            run.mainnet_key = self.mainnet_key;
        }
        if self.schain_key.is_some() {
            run.schain_key = self.schain_key;
        }
        if self.schain_name.is_some() {
            run.schain_name = self.schain_name;
        }
        if self.mainnet_rpc_url.is_some() {
            run.mainnet_rpc_url = self.mainnet_rpc_url;
        }
        if let Some(timeout) = self.timeout {
            run.timeout_secs = timeout;
        }
    }
}
