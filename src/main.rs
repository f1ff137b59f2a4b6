//! bridge-e2e - end-to-end scenarios for a mainnet/schain token bridge
//!
//! Runs registered bridge scenarios one at a time and reports a pass/fail
//! outcome for each. Exits non-zero when any scenario did not pass.

use bridge_e2e::common::logging;
use bridge_e2e::{cli, commands::Commands};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bridge-e2e", about = "End-to-end bridge scenario runner")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a file (default location when no path is given)
    #[arg(long, global = true, num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_file = match cli.log_file {
        Some(Some(path)) => Some(path),
        Some(None) => logging::default_log_path(),
        None => None,
    };
    if let Some(path) = logging::init_cli(log_file.as_deref()) {
        tracing::debug!(path = %path.display(), "Logging to file");
    }

    if let Err(e) = cli::dispatch(cli.command, cli.config.as_deref()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
