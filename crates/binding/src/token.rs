//! ERC20 token contract bindings and call data encoders.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

sol! {
    /// Minimal ERC20 token interface
    #[sol(rpc)]
    interface IERC20 {
        /// Get token name
        function name() external view returns (string memory);

        /// Get token symbol
        function symbol() external view returns (string memory);

        /// Get token decimals
        function decimals() external view returns (uint8);

        /// Get total supply
        function totalSupply() external view returns (uint256);

        /// Get token balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Get allowance granted by owner to spender
        function allowance(address owner, address spender) external view returns (uint256);

        /// Transfer tokens to recipient
        function transfer(address to, uint256 amount) external returns (bool);

        /// Approve spender to spend tokens
        function approve(address spender, uint256 amount) external returns (bool);

        /// Transfer tokens from owner to recipient (requires allowance)
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }
}

/// Encode a `transfer(to, amount)` call.
pub fn encode_transfer(to: Address, amount: U256) -> Bytes {
    IERC20::transferCall { to, amount }.abi_encode().into()
}

/// Encode an `approve(spender, amount)` call.
pub fn encode_approve(spender: Address, amount: U256) -> Bytes {
    IERC20::approveCall { spender, amount }.abi_encode().into()
}

/// Encode a `transferFrom(from, to, amount)` call.
pub fn encode_transfer_from(from: Address, to: Address, amount: U256) -> Bytes {
    IERC20::transferFromCall { from, to, amount }
        .abi_encode()
        .into()
}
