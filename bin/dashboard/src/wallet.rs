use alloy_primitives::{Address, TxHash};
use alloy_rpc_types::eth::TransactionRequest;
use client::{InjectedWallet, KeyWallet, RpcWallet, WalletError};

/// The wallet selected on the command line.
#[derive(Clone)]
pub enum WalletBackend {
    /// JSON-RPC wallet endpoint
    Rpc(RpcWallet),
    /// Local private key
    Key(KeyWallet),
}

impl WalletBackend {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rpc(_) => "rpc",
            Self::Key(_) => "key",
        }
    }
}

impl InjectedWallet for WalletBackend {
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        match self {
            Self::Rpc(wallet) => wallet.accounts().await,
            Self::Key(wallet) => wallet.accounts().await,
        }
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        match self {
            Self::Rpc(wallet) => wallet.request_accounts().await,
            Self::Key(wallet) => wallet.request_accounts().await,
        }
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError> {
        match self {
            Self::Rpc(wallet) => wallet.send_transaction(tx).await,
            Self::Key(wallet) => wallet.send_transaction(tx).await,
        }
    }
}
