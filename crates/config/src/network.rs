//! Network configuration for the dashboard.
//!
//! Provides the chain descriptors and RPC endpoints for the two supported
//! networks. The table is built once at start-up and never mutated.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Token shown when no other address has been entered.
// https://sepolia.etherscan.io/address/0x1b96FC4e081D0A44Fad54F70d37Aa76ebff77ad7
pub const DEFAULT_TOKEN_ADDRESS: Address = address!("0x1b96FC4e081D0A44Fad54F70d37Aa76ebff77ad7");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Unknown network: {0} (expected one of: hardhat, sepolia)")]
    UnknownNetwork(String),
}

/// Supported networks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Hardhat,
    #[default]
    Sepolia,
}

impl NetworkType {
    /// All networks, in display order.
    pub const ALL: [Self; 2] = [Self::Hardhat, Self::Sepolia];

    /// Identifier used in config files and on the command line.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hardhat => "hardhat",
            Self::Sepolia => "sepolia",
        }
    }

    /// Chain descriptor for this network.
    pub const fn chain(&self) -> ChainSpec {
        match self {
            Self::Hardhat => ChainSpec::hardhat(),
            Self::Sepolia => ChainSpec::sepolia(),
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hardhat" => Ok(Self::Hardhat),
            "sepolia" => Ok(Self::Sepolia),
            other => Err(NetworkError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Chain descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainSpec {
    /// Chain ID
    pub id: u64,
    /// Human readable chain name
    pub name: &'static str,
    /// Public RPC endpoint used when no override is configured
    pub default_rpc_url: &'static str,
    /// Block explorer base url, if the chain has one
    pub explorer_url: Option<&'static str>,
}

impl ChainSpec {
    /// Local Hardhat node.
    pub const fn hardhat() -> Self {
        Self {
            id: 31337,
            name: "Hardhat",
            default_rpc_url: "http://127.0.0.1:8545",
            explorer_url: None,
        }
    }

    /// Ethereum Sepolia testnet.
    pub const fn sepolia() -> Self {
        Self {
            id: 11155111,
            name: "Sepolia",
            default_rpc_url: "https://sepolia.drpc.org",
            explorer_url: Some("https://sepolia.etherscan.io"),
        }
    }

    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, hash: impl fmt::Display) -> Option<String> {
        self.explorer_url.map(|base| format!("{base}/tx/{hash}"))
    }

    /// Explorer link for an address.
    pub fn address_url(&self, address: Address) -> Option<String> {
        self.explorer_url
            .map(|base| format!("{base}/address/{address}"))
    }
}

/// Network entry: display name, chain descriptor and RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkConfig {
    /// Network identifier
    pub network_type: NetworkType,
    /// Display name
    pub name: &'static str,
    /// Chain descriptor
    pub chain: ChainSpec,
    /// RPC endpoint url
    pub rpc_url: String,
}

impl NetworkConfig {
    /// Create the configuration for a network, optionally overriding its endpoint.
    pub fn new(network_type: NetworkType, rpc_url: Option<&str>) -> Self {
        let chain = network_type.chain();
        Self {
            network_type,
            name: chain.name,
            chain,
            rpc_url: rpc_url.unwrap_or(chain.default_rpc_url).to_string(),
        }
    }

    /// Hardhat configuration with the chain's default endpoint.
    pub fn hardhat() -> Self {
        Self::new(NetworkType::Hardhat, None)
    }

    /// Sepolia configuration with the chain's default endpoint.
    pub fn sepolia() -> Self {
        Self::new(NetworkType::Sepolia, None)
    }
}

/// Static mapping from network identifier to its configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRegistry {
    entries: [NetworkConfig; 2],
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::new(None)
    }
}

impl NetworkRegistry {
    /// Build the table. A single `rpc_url` applies to every network.
    pub fn new(rpc_url: Option<&str>) -> Self {
        Self {
            entries: NetworkType::ALL.map(|network| NetworkConfig::new(network, rpc_url)),
        }
    }

    /// Look up a network.
    pub fn get(&self, network: NetworkType) -> &NetworkConfig {
        match network {
            NetworkType::Hardhat => &self.entries[0],
            NetworkType::Sepolia => &self.entries[1],
        }
    }

    /// Iterate the table in display order.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.entries.iter()
    }
}
