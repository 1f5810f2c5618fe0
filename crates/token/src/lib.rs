//! Token dashboard state.
//!
//! This crate owns everything between the presentation layer and the chain:
//! - [`TokenReader`]: sequential ERC20 view calls through the RPC client
//! - [`Dashboard`]: the state controller that connects the wallet, switches
//!   networks, reads token data and submits transfers
//! - [`TokenData`] and [`TransferStatus`]: the state the presentation renders

pub mod address;
pub mod dashboard;
pub mod error;
pub mod reader;
pub mod state;
pub mod units;

pub use dashboard::{Dashboard, DashboardOptions, WriteKind};
pub use error::DashboardError;
pub use reader::{TokenMetadata, TokenReader};
pub use state::{DashboardState, TokenData, TransferStatus};
