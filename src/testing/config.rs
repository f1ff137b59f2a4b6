//! Run parameters handed to every test case

use std::time::Duration;

use crate::chain::PrivateKey;
use crate::common::config::{Config, PollingConfig};
use crate::common::{Error, Result};

/// Immutable parameters of one run
///
/// Built once, then shared read-only with every test case.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Account that deploys, mints and sends on mainnet
    pub mainnet_key: PrivateKey,
    /// Account that receives and sends on the schain
    pub schain_key: PrivateKey,
    /// Schain under test
    pub schain_name: String,
    /// Mainnet endpoint the schain nodes' bridge is pointed at
    pub mainnet_rpc_url: String,
    /// Budget for one test case, also handed to every agent transfer
    pub timeout: Duration,
    /// Backoff used while waiting for chain state to settle
    pub polling: PollingConfig,
}

impl TestConfig {
    /// Resolve run parameters from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let run = &config.run;

        let mainnet_key = PrivateKey::from_hex(required(&run.mainnet_key, "mainnet_key")?)?;
        let schain_key = PrivateKey::from_hex(required(&run.schain_key, "schain_key")?)?;
        let schain_name = required(&run.schain_name, "schain_name")?.to_string();
        let mainnet_rpc_url = required(&run.mainnet_rpc_url, "mainnet_rpc_url")?.to_string();

        if run.timeout_secs == 0 {
            return Err(Error::Config("run.timeout_secs must be positive".to_string()));
        }
        if config.polling.initial_interval_ms == 0 {
            return Err(Error::Config(
                "polling.initial_interval_ms must be positive".to_string(),
            ));
        }

        Ok(Self {
            mainnet_key,
            schain_key,
            schain_name,
            mainnet_rpc_url,
            timeout: Duration::from_secs(run.timeout_secs),
            polling: config.polling.clone(),
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value.as_deref().filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        Error::Config(format!(
            "missing run.{field}; set it in the config file or pass --{}",
            field.replace('_', "-")
        ))
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two distinct valid keys with default polling
    pub(crate) fn sample_config() -> TestConfig {
        TestConfig {
            mainnet_key: PrivateKey::from_hex(&"11".repeat(32)).unwrap(),
            schain_key: PrivateKey::from_hex(&"22".repeat(32)).unwrap(),
            schain_name: "elastic-schain".to_string(),
            mainnet_rpc_url: "http://127.0.0.1:8545".to_string(),
            timeout: Duration::from_secs(120),
            polling: PollingConfig::default(),
        }
    }

    fn config(toml: &str) -> Config {
        Config::from_toml_str(toml).unwrap()
    }

    #[test]
    fn test_resolves_complete_run_section() {
        let config = config(&format!(
            r#"
            [run]
            mainnet_key = "0x{}"
            schain_key = "{}"
            schain_name = "elastic-schain"
            mainnet_rpc_url = "http://127.0.0.1:8545"
            timeout_secs = 45
            "#,
            "11".repeat(32),
            "22".repeat(32)
        ));

        let test_config = TestConfig::from_config(&config).unwrap();
        assert_eq!(test_config.schain_name, "elastic-schain");
        assert_eq!(test_config.timeout, Duration::from_secs(45));
        assert_ne!(
            test_config.mainnet_key.address(),
            test_config.schain_key.address()
        );
    }

    #[test]
    fn test_missing_field_names_the_flag() {
        let err = TestConfig::from_config(&Config::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("run.mainnet_key"), "{msg}");
        assert!(msg.contains("--mainnet-key"), "{msg}");
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = config(&format!(
            r#"
            [run]
            mainnet_key = "{k}"
            schain_key = "{k}"
            schain_name = "s"
            mainnet_rpc_url = "http://x"
            timeout_secs = 0
            "#,
            k = "33".repeat(32)
        ));
        assert!(matches!(
            TestConfig::from_config(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_rejects_zero_polling_interval() {
        let config = config(&format!(
            r#"
            [run]
            mainnet_key = "{k}"
            schain_key = "{k}"
            schain_name = "s"
            mainnet_rpc_url = "http://x"

            [polling]
            initial_interval_ms = 0
            "#,
            k = "33".repeat(32)
        ));
        let err = TestConfig::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("polling.initial_interval_ms"), "{err}");
    }
}
