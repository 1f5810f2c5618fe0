use alloy_primitives::{Address, TxHash};
use config::NetworkType;
use serde::Serialize;

/// Placeholder shown before the first successful read.
pub const LOADING: &str = "Loading...";

/// Placeholder shown for the balance when no account is known.
pub const NOT_AVAILABLE: &str = "N/A";

/// Token metadata and the connected account's balance, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Total supply formatted with `decimals`
    pub total_supply: String,
    /// Connected account, if any
    pub user_address: Option<Address>,
    /// Balance of `user_address` formatted with `decimals`
    pub user_balance: String,
}

impl Default for TokenData {
    fn default() -> Self {
        Self {
            name: LOADING.to_string(),
            symbol: LOADING.to_string(),
            decimals: 18,
            total_supply: LOADING.to_string(),
            user_address: None,
            user_balance: LOADING.to_string(),
        }
    }
}

/// Status of the last write submitted through the wallet.
///
/// Shared by transfer, approve and transferFrom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TransferStatus {
    #[default]
    Idle,
    Pending,
    Success {
        hash: TxHash,
    },
    Error {
        message: String,
    },
}

impl TransferStatus {
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Error message, empty unless the status is [`TransferStatus::Error`].
    pub fn error_message(&self) -> &str {
        match self {
            Self::Error { message } => message,
            _ => "",
        }
    }

    pub const fn hash(&self) -> Option<TxHash> {
        match self {
            Self::Success { hash } => Some(*hash),
            _ => None,
        }
    }
}

/// Snapshot of everything the presentation renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub selected_network: NetworkType,
    pub token_data: TokenData,
    /// Decimals used when the token has no `decimals()` method
    pub custom_decimals: u8,
    /// Page-level error message
    pub error: Option<String>,
    pub is_loading: bool,
    /// Token contract currently read from and written to
    pub custom_token_address: Address,
    /// Token address being edited, not yet validated
    pub input_token_address: String,
    pub transfer_status: TransferStatus,
}

impl DashboardState {
    pub(crate) fn new(network: NetworkType, token: Address, decimals: u8) -> Self {
        Self {
            selected_network: network,
            token_data: TokenData::default(),
            custom_decimals: decimals,
            error: None,
            is_loading: true,
            custom_token_address: token,
            input_token_address: token.to_checksum(None),
            transfer_status: TransferStatus::Idle,
        }
    }

    pub const fn is_connected(&self) -> bool {
        self.token_data.user_address.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    #[test]
    fn test_status_flags() {
        let idle = TransferStatus::Idle;
        assert!(!idle.is_pending() && !idle.is_success() && !idle.is_error());
        assert_eq!(idle.error_message(), "");

        let success = TransferStatus::Success {
            hash: B256::repeat_byte(0x11),
        };
        assert!(success.is_success());
        assert_eq!(success.hash(), Some(B256::repeat_byte(0x11)));

        let error = TransferStatus::Error {
            message: "User rejected the request.".to_string(),
        };
        assert!(error.is_error());
        assert_eq!(error.error_message(), "User rejected the request.");
        assert_eq!(error.hash(), None);
    }

    #[test]
    fn test_initial_token_data() {
        let data = TokenData::default();
        assert_eq!(data.name, LOADING);
        assert_eq!(data.decimals, 18);
        assert!(data.user_address.is_none());
    }
}
