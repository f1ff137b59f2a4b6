//! Configuration file handling
//!
//! Everything has a default except the run section's keys and chain
//! coordinates, which may instead come from command-line flags.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Run parameters shared by every scenario
    #[serde(default)]
    pub run: RunSection,

    /// Settlement polling settings
    #[serde(default)]
    pub polling: PollingConfig,

    /// In-process simulated network settings
    #[serde(default)]
    pub local: LocalConfig,

    /// Node administration commands
    #[serde(default)]
    pub admin: AdminConfig,
}

/// Run parameters
#[derive(Debug, Deserialize, Clone)]
pub struct RunSection {
    /// Hex private key of the mainnet account
    pub mainnet_key: Option<String>,

    /// Hex private key of the schain account
    pub schain_key: Option<String>,

    /// Name of the schain under test
    pub schain_name: Option<String>,

    /// Mainnet JSON-RPC endpoint handed to the schain nodes
    pub mainnet_rpc_url: Option<String>,

    /// Per-case time budget, also passed to every agent transfer
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            mainnet_key: None,
            schain_key: None,
            schain_name: None,
            mainnet_rpc_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    120
}

/// Exponential backoff used while waiting for chain state to settle
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    /// Delay before the second probe
    #[serde(default = "default_initial_interval")]
    pub initial_interval_ms: u64,

    /// Upper bound for the delay between probes
    #[serde(default = "default_max_interval")]
    pub max_interval_ms: u64,

    /// Multiplier applied to the delay after every probe
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: u32,

    /// Give up waiting for a single condition after this long
    #[serde(default = "default_deadline")]
    pub deadline_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: default_initial_interval(),
            max_interval_ms: default_max_interval(),
            backoff_factor: default_backoff_factor(),
            deadline_ms: default_deadline(),
        }
    }
}

fn default_initial_interval() -> u64 {
    250
}
fn default_max_interval() -> u64 {
    5_000
}
fn default_backoff_factor() -> u32 {
    2
}
fn default_deadline() -> u64 {
    60_000
}

impl PollingConfig {
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

/// Simulated two-chain network settings
#[derive(Debug, Deserialize, Clone)]
pub struct LocalConfig {
    /// Time until a submitted transaction has a receipt
    #[serde(default = "default_block_time")]
    pub block_time_ms: u64,

    /// Time the agent takes to relay a transfer to the other chain
    #[serde(default = "default_relay_delay")]
    pub relay_delay_ms: u64,

    /// Wei charged against the schain cost budget for every exit to mainnet
    #[serde(default = "default_exit_fee")]
    pub exit_fee_wei: u64,

    /// Native coin credited to every mainnet account on first use
    #[serde(default = "default_faucet")]
    pub faucet_wei: u64,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            block_time_ms: default_block_time(),
            relay_delay_ms: default_relay_delay(),
            exit_fee_wei: default_exit_fee(),
            faucet_wei: default_faucet(),
        }
    }
}

fn default_block_time() -> u64 {
    200
}
fn default_relay_delay() -> u64 {
    1_000
}
fn default_exit_fee() -> u64 {
    10_000_000_000_000_000
}
fn default_faucet() -> u64 {
    5_000_000_000_000_000_000
}

impl LocalConfig {
    pub fn block_time(&self) -> Duration {
        Duration::from_millis(self.block_time_ms)
    }

    pub fn relay_delay(&self) -> Duration {
        Duration::from_millis(self.relay_delay_ms)
    }
}

/// Shell command templates for node administration
///
/// `{schain}` and `{rpc_url}` are substituted before the command runs.
/// When unset, the selected backend's own admin implementation is used.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminConfig {
    /// Points the schain nodes' bridge at the mainnet endpoint
    pub reconfigure_command: Option<String>,

    /// Restarts the schain node daemon
    pub restart_command: Option<String>,
}

impl AdminConfig {
    /// Whether any admin shell command is set
    pub fn is_configured(&self) -> bool {
        self.reconfigure_command.is_some() || self.restart_command.is_some()
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// read if present, otherwise defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::read(&path);
            }
        }
        Ok(Self::default())
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.run.timeout_secs, 120);
        assert_eq!(config.polling, PollingConfig::default());
        assert_eq!(config.local.relay_delay(), Duration::from_secs(1));
        assert!(!config.admin.is_configured());
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::from_toml_str(
            r#"
            [run]
            schain_name = "elastic-schain"
            mainnet_rpc_url = "http://127.0.0.1:8545"
            timeout_secs = 30

            [polling]
            initial_interval_ms = 100
            backoff_factor = 3

            [admin]
            reconfigure_command = "ima-config {schain} {rpc_url}"
            restart_command = "systemctl restart skaled@{schain}"
            "#,
        )
        .unwrap();

        assert_eq!(config.run.schain_name.as_deref(), Some("elastic-schain"));
        assert_eq!(config.run.timeout_secs, 30);
        assert_eq!(config.polling.initial_interval(), Duration::from_millis(100));
        assert_eq!(config.polling.max_interval_ms, 5_000);
        assert_eq!(config.polling.backoff_factor, 3);
        assert!(config.admin.is_configured());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Config::from_toml_str("[run\ntimeout_secs = ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[local]\nrelay_delay_ms = 5").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.local.relay_delay_ms, 5);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
