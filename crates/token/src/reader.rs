use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::IERC20;
use eyre::Result;
use tracing::{debug, warn};

/// Token metadata read in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// False when the contract has no usable `decimals()` and the fallback was used
    pub decimals_from_contract: bool,
    pub total_supply: U256,
}

// ERC20 view calls against a single token contract.
pub struct TokenReader<P> {
    provider: P,
    token: Address,
}

impl<P> TokenReader<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, token: Address) -> Self {
        Self { provider, token }
    }

    pub async fn name(&self) -> Result<String> {
        debug!(token = %self.token, "Querying token name");

        let contract = IERC20::new(self.token, &self.provider);
        Ok(contract.name().call().await?)
    }

    pub async fn symbol(&self) -> Result<String> {
        debug!(token = %self.token, "Querying token symbol");

        let contract = IERC20::new(self.token, &self.provider);
        Ok(contract.symbol().call().await?)
    }

    pub async fn decimals(&self) -> Result<u8> {
        debug!(token = %self.token, "Querying token decimals");

        let contract = IERC20::new(self.token, &self.provider);
        Ok(contract.decimals().call().await?)
    }

    pub async fn total_supply(&self) -> Result<U256> {
        debug!(token = %self.token, "Querying total supply");

        let contract = IERC20::new(self.token, &self.provider);
        Ok(contract.totalSupply().call().await?)
    }

    pub async fn balance_of(&self, holder: Address) -> Result<U256> {
        debug!(token = %self.token, holder = %holder, "Querying token balance");

        let contract = IERC20::new(self.token, &self.provider);
        Ok(contract.balanceOf(holder).call().await?)
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        debug!(token = %self.token, owner = %owner, spender = %spender, "Querying allowance");

        let contract = IERC20::new(self.token, &self.provider);
        Ok(contract.allowance(owner, spender).call().await?)
    }

    /// Read name, symbol, decimals and total supply, one call after another.
    ///
    /// A failing `decimals()` does not abort the read: `fallback_decimals` is
    /// used instead. Any other failure does.
    pub async fn metadata(&self, fallback_decimals: u8) -> Result<TokenMetadata> {
        let name = self.name().await?;
        let symbol = self.symbol().await?;

        let (decimals, decimals_from_contract) = match self.decimals().await {
            Ok(decimals) => (decimals, true),
            Err(e) => {
                warn!(
                    token = %self.token,
                    fallback = fallback_decimals,
                    error = %e,
                    "Could not get decimals from contract, using custom value"
                );
                (fallback_decimals, false)
            }
        };

        let total_supply = self.total_supply().await?;

        Ok(TokenMetadata {
            name,
            symbol,
            decimals,
            decimals_from_contract,
            total_supply,
        })
    }
}
