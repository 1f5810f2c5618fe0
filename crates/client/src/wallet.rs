//! Wallets that hold the user's accounts and sign transactions.
//!
//! The dashboard never signs anything itself. Writes are handed to an
//! [`InjectedWallet`] through the same three methods a browser extension
//! exposes: `eth_accounts`, `eth_requestAccounts` and `eth_sendTransaction`.

use crate::{create_wallet_provider, parse_private_key, ClientError};
use alloy_primitives::{Address, TxHash};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types::eth::TransactionRequest;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use thiserror::Error;
use tracing::debug;

/// EIP-1193 error code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Error, Debug)]
pub enum WalletError {
    /// The user declined the request in the wallet
    #[error("{message}")]
    Rejected { message: String },

    /// The wallet answered with a JSON-RPC error
    #[error("Wallet error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The wallet endpoint answered with a non-success HTTP status
    #[error("Wallet returned {status}: {body}")]
    Http { status: u16, body: String },

    /// The wallet endpoint could not be reached
    #[error("Wallet unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The wallet answered with something that is not a JSON-RPC response
    #[error("Invalid wallet response: {0}")]
    InvalidResponse(String),

    /// Sending through a key-backed provider failed
    #[error("{0}")]
    Provider(String),
}

impl WalletError {
    fn from_rpc(error: JsonRpcError) -> Self {
        if error.code == USER_REJECTED_CODE {
            Self::Rejected {
                message: error.message,
            }
        } else {
            Self::Rpc {
                code: error.code,
                message: error.message,
            }
        }
    }
}

/// Account access and transaction submission, as offered by a wallet extension.
pub trait InjectedWallet: Send + Sync {
    /// Accounts the wallet has already authorised, without prompting.
    fn accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send;

    /// Ask the wallet to authorise accounts, prompting the user if needed.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send;

    /// Ask the wallet to sign and broadcast a transaction.
    ///
    /// Returns the transaction hash once the wallet has broadcast it. This does
    /// not wait for the transaction to be mined.
    fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> impl Future<Output = Result<TxHash, WalletError>> + Send;
}

/// A wallet reachable over HTTP JSON-RPC.
///
/// Works with desktop wallets that expose a local RPC endpoint (Frame listens
/// on `http://127.0.0.1:1248`) and with dev nodes that hold unlocked accounts
/// (Hardhat, Anvil).
///
/// # Example
///
/// ```ignore
/// let wallet = RpcWallet::new("http://127.0.0.1:1248");
/// let accounts = wallet.request_accounts().await?;
/// let hash = wallet.send_transaction(tx_request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RpcWallet {
    client: reqwest::Client,
    url: String,
}

impl RpcWallet {
    /// Creates a new wallet client for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, WalletError> {
        debug!(method, url = %self.url, "Wallet request");

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(WalletError::Http { status, body });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

impl InjectedWallet for RpcWallet {
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.request("eth_accounts", json!([])).await
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.request("eth_requestAccounts", json!([])).await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError> {
        self.request("eth_sendTransaction", json!([tx])).await
    }
}

/// A wallet backed by a local private key.
///
/// Signs through a provider built with the key, so it behaves like a wallet
/// that has already authorised exactly one account.
#[derive(Clone)]
pub struct KeyWallet {
    provider: DynProvider,
    address: Address,
}

impl KeyWallet {
    /// Creates a key-backed wallet that broadcasts through `rpc_url`.
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self, ClientError> {
        let address = parse_private_key(private_key)?.address();
        let provider = create_wallet_provider(rpc_url, private_key)?;

        Ok(Self { provider, address })
    }

    /// Returns the signer's address.
    pub const fn address(&self) -> Address {
        self.address
    }
}

impl InjectedWallet for KeyWallet {
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.address])
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.address])
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| WalletError::Provider(e.to_string()))?;

        Ok(*pending.tx_hash())
    }
}

fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T, WalletError> {
    let response: JsonRpcResponse<T> =
        serde_json::from_str(body).map_err(|e| WalletError::InvalidResponse(e.to_string()))?;

    match (response.result, response.error) {
        (_, Some(error)) => Err(WalletError::from_rpc(error)),
        (Some(result), None) => Ok(result),
        (None, None) => Err(WalletError::InvalidResponse(
            "response has neither result nor error".to_string(),
        )),
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    method: &'static str,
    params: Value,
    id: u32,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}
