//! Configuration types for the token dashboard.
//!
//! This crate provides:
//! - The static network table (Hardhat, Sepolia) with chain descriptors
//! - RPC endpoint resolution (one override for every network, chain defaults)
//! - The default token contract address

pub mod network;

pub use network::{
    ChainSpec, NetworkConfig, NetworkError, NetworkRegistry, NetworkType, DEFAULT_TOKEN_ADDRESS,
};
