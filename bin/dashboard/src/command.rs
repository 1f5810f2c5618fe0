//! Commands accepted by the interactive prompt.

use clap::{Parser, Subcommand};
use config::NetworkType;
use token::{address::is_address, units::is_positive_amount, WriteKind};

#[derive(Debug, Parser)]
#[command(name = "prompt", no_binary_name = true, disable_version_flag = true)]
struct PromptLine {
    #[command(subcommand)]
    command: PromptCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum PromptCommand {
    /// Connect the wallet and load the account's balance
    Connect,

    /// Forget the connected account
    Disconnect,

    /// Switch network (hardhat | sepolia)
    Network { network: NetworkType },

    /// Show a different token contract
    Token { address: String },

    /// Decimals used for tokens without decimals()
    Decimals { decimals: u32 },

    /// Send tokens from the connected account
    Transfer {
        to: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Allow a spender to move tokens of the connected account
    Approve {
        spender: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Move tokens from an owner using the connected account's allowance
    TransferFrom {
        from: String,
        to: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Read how much a spender may move on behalf of an owner
    Allowance { owner: String, spender: String },

    /// Clear the transaction status
    Reset,

    /// Re-read token data and balance
    Refresh,

    /// Print the dashboard
    Show,

    /// Leave the prompt
    #[command(alias = "exit")]
    Quit,
}

/// Reason a form is not submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    Address(&'static str),
    Amount,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(field) => write!(f, "Enter a valid {field} address"),
            Self::Amount => f.write_str("Enter an amount greater than zero"),
        }
    }
}

impl PromptCommand {
    /// Parse one prompt line. Empty lines yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, clap::Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }

        PromptLine::try_parse_from(words).map(|line| Some(line.command))
    }

    /// Write submitted by this command, if any.
    pub const fn write_kind(&self) -> Option<WriteKind> {
        match self {
            Self::Transfer { .. } => Some(WriteKind::Transfer),
            Self::Approve { .. } => Some(WriteKind::Approve),
            Self::TransferFrom { .. } => Some(WriteKind::TransferFrom),
            _ => None,
        }
    }

    /// Form checks run before a write is dispatched.
    pub fn validate(&self) -> Result<(), FormError> {
        let (addresses, amount) = match self {
            Self::Transfer { to, amount } => (vec![("recipient", to)], amount),
            Self::Approve { spender, amount } => (vec![("spender", spender)], amount),
            Self::TransferFrom { from, to, amount } => {
                (vec![("owner", from), ("recipient", to)], amount)
            }
            _ => return Ok(()),
        };

        if let Some((field, _)) = addresses.iter().find(|(_, value)| !is_address(value)) {
            return Err(FormError::Address(*field));
        }
        if !is_positive_amount(amount) {
            return Err(FormError::Amount);
        }

        Ok(())
    }
}
