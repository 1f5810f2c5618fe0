use alloy_primitives::Address;
use config::{NetworkRegistry, NetworkType, DEFAULT_TOKEN_ADDRESS};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use token::DashboardOptions;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

/// Dashboard configuration.
///
/// Every field is optional in the file; command line flags and environment
/// variables override it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network selected at start-up
    pub network: NetworkType,

    /// RPC endpoint used for every network instead of the chain defaults
    pub rpc_url: Option<String>,

    /// Token contract shown at start-up
    pub token_address: Address,

    /// JSON-RPC wallet endpoint (e.g. Frame on `http://127.0.0.1:1248`)
    pub wallet_url: Option<String>,

    /// Decimals used until the contract reports its own
    pub default_decimals: u8,

    /// Delay before balances are re-read after a transfer
    pub refresh_delay_ms: u64,

    /// Interval at which the wallet's accounts are polled for changes
    pub accounts_poll_secs: u64,

    /// Port for the Prometheus exporter; disabled when unset
    pub metrics_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkType::default(),
            rpc_url: None,
            token_address: DEFAULT_TOKEN_ADDRESS,
            wallet_url: None,
            default_decimals: 18,
            refresh_delay_ms: 2_000,
            accounts_poll_secs: 2,
            metrics_port: None,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Load `path`, or the default file if present, or the defaults.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn networks(&self) -> NetworkRegistry {
        NetworkRegistry::new(self.rpc_url.as_deref())
    }

    pub const fn accounts_poll_interval(&self) -> Duration {
        Duration::from_secs(self.accounts_poll_secs)
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions::default()
            .networks(self.networks())
            .network(self.network)
            .token_address(self.token_address)
            .default_decimals(self.default_decimals)
            .refresh_delay(Duration::from_millis(self.refresh_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            network = "hardhat"
            rpc_url = "http://127.0.0.1:8545"
            token_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            wallet_url = "http://127.0.0.1:1248"
            default_decimals = 6
            refresh_delay_ms = 500
            accounts_poll_secs = 5
            metrics_port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.network, NetworkType::Hardhat);
        assert_eq!(config.wallet_url.as_deref(), Some("http://127.0.0.1:1248"));
        assert_eq!(config.metrics_port, Some(9000));

        let options = config.dashboard_options();
        assert_eq!(options.network, NetworkType::Hardhat);
        assert_eq!(options.default_decimals, 6);
        assert_eq!(options.refresh_delay, Duration::from_millis(500));
        assert_eq!(
            options.networks.get(NetworkType::Sepolia).rpc_url,
            "http://127.0.0.1:8545"
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str(r#"network = "sepolia""#).unwrap();

        assert_eq!(config.token_address, DEFAULT_TOKEN_ADDRESS);
        assert_eq!(config.default_decimals, 18);
        assert_eq!(config.refresh_delay_ms, 2_000);
        assert!(config.rpc_url.is_none());
        assert!(config.metrics_port.is_none());
    }

    #[test]
    fn test_unknown_network_rejected() {
        assert!(toml::from_str::<Config>(r#"network = "mainnet""#).is_err());
    }
}
