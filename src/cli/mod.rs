//! CLI command handling
//!
//! Resolves configuration, builds the chain environment and prints the
//! run report.

use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::chain::local::LocalNetwork;
use crate::chain::shell::ShellAdmin;
use crate::chain::Environment;
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::scenarios;
use crate::testing::{Runner, TestConfig};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::List => {
            let pool = scenarios::default_pool()?;
            println!("Scenarios (run order):");
            for name in pool.names() {
                let description = scenarios::describe(name).unwrap_or("");
                println!("  {} {}", format!("{name:<20}").cyan(), description.dimmed());
            }
            Ok(())
        }

        Commands::Run {
            scenarios: selection,
            args,
            json,
        } => {
            let mut config = Config::load(config_path)?;
            args.apply(&mut config.run);

            let test_config = Arc::new(TestConfig::from_config(&config)?);
            let env = build_environment(&config)?;
            let pool = scenarios::default_pool()?;

            info!(
                schain = %test_config.schain_name,
                mainnet = %test_config.mainnet_key.address(),
                timeout_secs = test_config.timeout.as_secs(),
                "Starting bridge scenarios"
            );

            let selection = (!selection.is_empty()).then_some(selection);
            let report = Runner::new(&pool, env)
                .run(test_config, selection.as_deref())
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }

            if report.all_passed() {
                Ok(())
            } else {
                Err(Error::ScenariosFailed {
                    failed: report.failed_count(),
                    total: report.cases.len(),
                })
            }
        }
    }
}

/// Local network for chain access and transfers, with shell commands for
/// node administration when they are configured
fn build_environment(config: &Config) -> Result<Environment> {
    let env = Environment::local(LocalNetwork::new(config.local.clone()));
    if config.admin.is_configured() {
        let admin = ShellAdmin::new(&config.admin)?;
        Ok(env.with_admin(Arc::new(admin)))
    } else {
        Ok(env)
    }
}
