//! Node administration through shell commands
//!
//! Each operation runs a configured `sh -c` template. `{schain}` and
//! `{rpc_url}` become quoted references to positional parameters, so the
//! values reach the command as single words and are never parsed as shell
//! syntax.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use super::NodeAdmin;
use crate::common::config::AdminConfig;
use crate::common::{Error, Result};

pub struct ShellAdmin {
    reconfigure_command: String,
    restart_command: String,
}

impl ShellAdmin {
    pub fn new(config: &AdminConfig) -> Result<Self> {
        match (&config.reconfigure_command, &config.restart_command) {
            (Some(reconfigure), Some(restart)) => Ok(Self {
                reconfigure_command: reconfigure.clone(),
                restart_command: restart.clone(),
            }),
            _ => Err(Error::Config(
                "admin.reconfigure_command and admin.restart_command must both be set".to_string(),
            )),
        }
    }

    async fn run(&self, template: &str, schain: &str, rpc_url: &str) -> Result<()> {
        let command = render(template);
        debug!(%command, schain, rpc_url, "Running admin command");

        let output = TokioCommand::new("sh")
            .arg("-c")
            .arg(&command)
            .arg("bridge-e2e")
            .arg(schain)
            .arg(rpc_url)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::Admin(format!("'{}' failed to execute: {}", command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Admin(format!(
                "'{}' exited with code {:?}: {}",
                command,
                output.status.code(),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// `$0` is the program name, the schain is `$1` and the RPC URL `$2`
fn render(template: &str) -> String {
    template
        .replace("{schain}", "\"$1\"")
        .replace("{rpc_url}", "\"$2\"")
}

#[async_trait]
impl NodeAdmin for ShellAdmin {
    async fn reconfigure_bridge(&self, schain_name: &str, mainnet_rpc_url: &str) -> Result<()> {
        self.run(&self.reconfigure_command, schain_name, mainnet_rpc_url)
            .await?;
        info!(schain = schain_name, mainnet_rpc_url, "Bridge reconfigured");
        Ok(())
    }

    async fn restart_chain_node(&self, schain_name: &str) -> Result<()> {
        self.run(&self.restart_command, schain_name, "").await?;
        info!(schain = schain_name, "Schain node restarted");
        Ok(())
    }
}
