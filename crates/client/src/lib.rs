mod wallet;

use alloy_network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use config::NetworkConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
pub use wallet::{InjectedWallet, KeyWallet, RpcWallet, WalletError, USER_REJECTED_CODE};

/// A function that builds a read-only client for a network.
///
/// The dashboard rebuilds its client through this whenever the selected
/// network changes, which lets tests substitute mocked transports.
pub type ClientFn = Arc<dyn Fn(&NetworkConfig) -> Result<DynProvider, ClientError> + Send + Sync>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
}

/// Clients bound to a single network.
#[derive(Clone)]
pub struct Clients {
    /// Read-only client used for contract view calls
    pub public: DynProvider,
    /// Read/write client, present when a signing key is configured
    pub wallet: Option<DynProvider>,
}

/// Convenience function to create an ethereum rpc provider from url.
pub fn create_provider(rpc_url: &str) -> Result<DynProvider, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);
    Ok(provider.erased())
}

/// Create a provider with wallet signing capability from a private key.
pub fn create_wallet_provider(
    rpc_url: &str,
    private_key: &str,
) -> Result<DynProvider, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let signer = parse_private_key(private_key)?;
    let wallet = EthereumWallet::from(signer);
    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);
    Ok(provider.erased())
}

/// Build the read-only client, and the signing client when a key is given.
pub fn create_clients(
    network: &NetworkConfig,
    private_key: Option<&str>,
) -> Result<Clients, ClientError> {
    debug!(
        network = %network.network_type,
        chain_id = network.chain.id,
        rpc_url = %network.rpc_url,
        "Creating clients"
    );

    let public = create_provider(&network.rpc_url)?;
    let wallet = private_key
        .map(|key| create_wallet_provider(&network.rpc_url, key))
        .transpose()?;

    Ok(Clients { public, wallet })
}

/// The default [`ClientFn`]: a plain HTTP provider for the network's endpoint.
pub fn http_client_fn() -> ClientFn {
    Arc::new(|network: &NetworkConfig| create_clients(network, None).map(|clients| clients.public))
}

pub(crate) fn parse_private_key(private_key: &str) -> Result<PrivateKeySigner, ClientError> {
    private_key
        .trim()
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // First Hardhat dev account.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_invalid_url() {
        let result = create_provider("not a url");
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_invalid_private_key() {
        let result = create_wallet_provider("http://127.0.0.1:8545", "0x1234");
        assert!(matches!(result, Err(ClientError::InvalidPrivateKey(_))));
    }

    #[tokio::test]
    async fn test_create_clients_without_key() {
        let clients = create_clients(&NetworkConfig::hardhat(), None).unwrap();
        assert!(clients.wallet.is_none());
    }

    #[tokio::test]
    async fn test_create_clients_with_key() {
        let clients = create_clients(&NetworkConfig::hardhat(), Some(DEV_KEY)).unwrap();
        assert!(clients.wallet.is_some());
    }
}
