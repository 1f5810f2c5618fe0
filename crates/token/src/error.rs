use client::{ClientError, WalletError};
use thiserror::Error;

/// Dashboard failures.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Wallet is not available")]
    WalletUnavailable,

    #[error("Failed to connect wallet")]
    WalletConnection,

    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("Invalid recipient address")]
    InvalidRecipient,

    #[error("Invalid spender address")]
    InvalidSpender,

    #[error("Invalid address format")]
    InvalidAddress,

    #[error("Invalid Ethereum address format")]
    InvalidTokenAddress,

    #[error("Decimals must be between 0 and {max}, got {value}")]
    InvalidDecimals { value: u32, max: u8 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Failed to load token data. Verify that the token address is correct and the blockchain is accessible.")]
    TokenData,

    #[error("Failed to fetch token data")]
    Metadata,

    #[error("Failed to read allowance")]
    Allowance,

    #[error("Cannot format amount: {0}")]
    Format(String),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
