//! Contract bindings for the token dashboard.
//!
//! This crate holds the minimal ERC-20 interface consumed by the dashboard:
//! - view functions read through the RPC client (`name`, `symbol`, `decimals`,
//!   `totalSupply`, `balanceOf`, `allowance`)
//! - write functions encoded into call data and handed to a wallet for signing
//!   (`transfer`, `approve`, `transferFrom`)
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod token;

pub use token::{encode_approve, encode_transfer, encode_transfer_from, IERC20};
