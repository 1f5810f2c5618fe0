//! The dashboard state controller.
//!
//! [`Dashboard`] coordinates the wallet, the RPC client and the token
//! contract, and records the outcome of every action in a
//! [`DashboardState`] the presentation layer renders.
//!
//! Actions report failure twice: the user-facing message is written into the
//! state (`error` or `transfer_status`), and the same error is returned to
//! the caller.
//!
//! There is no cancellation. Switching networks while a read is in flight
//! lets the late response land in the state, and nothing stops a second
//! write from being submitted while the first is pending.

use crate::{
    address::parse_address,
    reader::TokenReader,
    state::{DashboardState, TokenData, TransferStatus, NOT_AVAILABLE},
    units::{format_amount, parse_amount, MAX_DECIMALS},
    DashboardError,
};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::DynProvider;
use alloy_rpc_types::eth::{TransactionInput, TransactionRequest};
use binding::{encode_approve, encode_transfer, encode_transfer_from};
use client::{ClientFn, InjectedWallet};
use config::{NetworkConfig, NetworkRegistry, NetworkType, DEFAULT_TOKEN_ADDRESS};
use parking_lot::RwLock;
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

/// Delay between a submitted transfer and the balance refresh that follows it.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_secs(2);

/// Start-up options for a [`Dashboard`].
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Network table
    pub networks: NetworkRegistry,
    /// Network selected at start-up
    pub network: NetworkType,
    /// Token contract shown at start-up
    pub token_address: Address,
    /// Decimals used until the contract reports its own
    pub default_decimals: u8,
    /// Delay before refreshing balances after a transfer
    pub refresh_delay: Duration,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            networks: NetworkRegistry::default(),
            network: NetworkType::default(),
            token_address: DEFAULT_TOKEN_ADDRESS,
            default_decimals: 18,
            refresh_delay: DEFAULT_REFRESH_DELAY,
        }
    }
}

impl DashboardOptions {
    pub fn networks(mut self, networks: NetworkRegistry) -> Self {
        self.networks = networks;
        self
    }

    pub const fn network(mut self, network: NetworkType) -> Self {
        self.network = network;
        self
    }

    pub const fn token_address(mut self, token_address: Address) -> Self {
        self.token_address = token_address;
        self
    }

    pub const fn default_decimals(mut self, decimals: u8) -> Self {
        self.default_decimals = decimals;
        self
    }

    pub const fn refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }
}

/// Kind of write submitted through the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Transfer,
    Approve,
    TransferFrom,
}

impl WriteKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Approve => "approve",
            Self::TransferFrom => "transferFrom",
        }
    }

    /// Whether balances change once the write is mined.
    const fn moves_tokens(&self) -> bool {
        matches!(self, Self::Transfer | Self::TransferFrom)
    }
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Inner<W> {
    networks: NetworkRegistry,
    client_fn: ClientFn,
    client: RwLock<DynProvider>,
    wallet: Option<W>,
    state: RwLock<DashboardState>,
    refresh_delay: Duration,
}

/// Token dashboard state controller.
///
/// Cheap to clone; clones share state.
pub struct Dashboard<W> {
    inner: Arc<Inner<W>>,
}

impl<W> Clone for Dashboard<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W> Dashboard<W>
where
    W: InjectedWallet + 'static,
{
    /// Create a dashboard bound to `options.network`.
    ///
    /// `wallet` is `None` when no wallet is available; reads still work.
    /// Nothing is fetched until [`Dashboard::refresh_metadata`] is called.
    pub fn new(
        options: DashboardOptions,
        client_fn: ClientFn,
        wallet: Option<W>,
    ) -> Result<Self, DashboardError> {
        let client = client_fn(options.networks.get(options.network))?;
        let decimals = options.default_decimals.min(MAX_DECIMALS);
        let state = DashboardState::new(options.network, options.token_address, decimals);

        Ok(Self {
            inner: Arc::new(Inner {
                networks: options.networks,
                client_fn,
                client: RwLock::new(client),
                wallet,
                state: RwLock::new(state),
                refresh_delay: options.refresh_delay,
            }),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // State access
    // ─────────────────────────────────────────────────────────────────────────────

    /// Snapshot of the current state.
    pub fn state(&self) -> DashboardState {
        self.inner.state.read().clone()
    }

    pub fn token_data(&self) -> TokenData {
        self.inner.state.read().token_data.clone()
    }

    pub fn transfer_status(&self) -> TransferStatus {
        self.inner.state.read().transfer_status.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.read().error.clone()
    }

    pub fn selected_network(&self) -> NetworkType {
        self.inner.state.read().selected_network
    }

    /// Configuration of the selected network.
    pub fn network(&self) -> &NetworkConfig {
        self.inner.networks.get(self.selected_network())
    }

    pub fn networks(&self) -> &NetworkRegistry {
        &self.inner.networks
    }

    pub fn wallet(&self) -> Option<&W> {
        self.inner.wallet.as_ref()
    }

    /// Whether the edited token address is valid and differs from the active one.
    pub fn can_update_token_address(&self) -> bool {
        let state = self.inner.state.read();
        parse_address(&state.input_token_address)
            .is_some_and(|address| address != state.custom_token_address)
    }

    fn client(&self) -> DynProvider {
        self.inner.client.read().clone()
    }

    fn update(&self, f: impl FnOnce(&mut DashboardState)) {
        f(&mut self.inner.state.write());
    }

    fn set_error(&self, err: &DashboardError) {
        let message = err.to_string();
        self.update(|state| state.error = Some(message));
    }

    fn set_transfer_status(&self, status: TransferStatus) {
        self.update(|state| state.transfer_status = status);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Wallet
    // ─────────────────────────────────────────────────────────────────────────────

    /// Ask the wallet for accounts and load the first one's balance.
    pub async fn connect_wallet(&self) -> Result<Address, DashboardError> {
        let Some(wallet) = self.wallet() else {
            let err = DashboardError::WalletUnavailable;
            self.set_error(&err);
            return Err(err);
        };

        self.update(|state| state.error = None);

        let account = match wallet.request_accounts().await {
            Ok(accounts) => accounts.first().copied(),
            Err(e) => {
                error!(error = %e, "Error connecting wallet");
                None
            }
        };

        let Some(account) = account else {
            let err = DashboardError::WalletConnection;
            self.set_error(&err);
            return Err(err);
        };

        info!(account = %account, "Wallet connected");
        let token = self.update_and_read(|state| {
            state.token_data.user_address = Some(account);
            state.custom_token_address
        });

        // Failures are already recorded in the state.
        let _ = self.fetch_token_data(Some(account), token).await;

        Ok(account)
    }

    /// Forget the connected account. The wallet itself stays authorised.
    pub fn disconnect_wallet(&self) {
        debug!("Wallet disconnected");
        self.update(|state| {
            state.token_data.user_address = None;
            state.token_data.user_balance = NOT_AVAILABLE.to_string();
        });
    }

    /// React to the wallet's `accountsChanged` event.
    ///
    /// An empty list means the wallet was locked or revoked access. A new
    /// first account replaces the connected one.
    pub async fn on_accounts_changed(&self, accounts: &[Address]) {
        let Some(&account) = accounts.first() else {
            self.disconnect_wallet();
            return;
        };

        let (current, token) = {
            let state = self.inner.state.read();
            (state.token_data.user_address, state.custom_token_address)
        };

        match current {
            Some(current) if current != account => {
                info!(from = %current, to = %account, "Wallet account changed");
                self.update(|state| state.token_data.user_address = Some(account));
                let _ = self.fetch_token_data(Some(account), token).await;
            }
            _ => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────────

    /// Read token metadata and the balance of `address`.
    ///
    /// Without an address, the wallet's first authorised account is used if
    /// there is one. Replaces [`TokenData`] on success.
    pub async fn fetch_token_data(
        &self,
        address: Option<Address>,
        token: Address,
    ) -> Result<TokenData, DashboardError> {
        self.update(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let result = self.load_token_data(address, token).await;

        self.update(|state| {
            match &result {
                Ok(data) => state.token_data = data.clone(),
                Err(e) => {
                    error!(token = %token, error = %e, "Error fetching token data");
                    state.error = Some(DashboardError::TokenData.to_string());
                }
            }
            state.is_loading = false;
        });

        result.map_err(|_| DashboardError::TokenData)
    }

    async fn load_token_data(
        &self,
        address: Option<Address>,
        token: Address,
    ) -> eyre::Result<TokenData> {
        let reader = TokenReader::new(self.client(), token);
        let fallback = self.inner.state.read().custom_decimals;

        let metadata = reader.metadata(fallback).await?;
        if metadata.decimals_from_contract {
            self.update(|state| state.custom_decimals = metadata.decimals);
        }

        let total_supply = format_amount(metadata.total_supply, metadata.decimals)?;

        let user_address = match address {
            Some(address) => Some(address),
            None => self.authorised_account().await,
        };

        let user_balance = match user_address {
            Some(holder) => {
                let balance = reader.balance_of(holder).await?;
                format_amount(balance, metadata.decimals)?
            }
            None => NOT_AVAILABLE.to_string(),
        };

        Ok(TokenData {
            name: metadata.name,
            symbol: metadata.symbol,
            decimals: metadata.decimals,
            total_supply,
            user_address,
            user_balance,
        })
    }

    /// First account the wallet has already authorised, without prompting.
    async fn authorised_account(&self) -> Option<Address> {
        let wallet = self.wallet()?;
        match wallet.accounts().await {
            Ok(accounts) => accounts.first().copied(),
            Err(e) => {
                debug!(error = %e, "Could not list wallet accounts");
                None
            }
        }
    }

    /// Read token metadata only, keeping the account fields.
    ///
    /// Runs at start-up and whenever the token address, network or custom
    /// decimals change.
    pub async fn refresh_metadata(&self) -> Result<(), DashboardError> {
        let (token, fallback) = {
            let state = self.inner.state.read();
            (state.custom_token_address, state.custom_decimals)
        };

        let reader = TokenReader::new(self.client(), token);
        let result = match reader.metadata(fallback).await {
            Ok(metadata) => format_amount(metadata.total_supply, metadata.decimals)
                .map(|total_supply| (metadata, total_supply))
                .map_err(eyre::Report::from),
            Err(e) => Err(e),
        };

        match result {
            Ok((metadata, total_supply)) => {
                self.update(|state| {
                    if metadata.decimals_from_contract {
                        state.custom_decimals = metadata.decimals;
                    }
                    state.token_data.name = metadata.name;
                    state.token_data.symbol = metadata.symbol;
                    state.token_data.decimals = metadata.decimals;
                    state.token_data.total_supply = total_supply;
                    state.is_loading = false;
                });
                Ok(())
            }
            Err(e) => {
                error!(token = %token, error = %e, "Error fetching token metadata");
                self.update(|state| {
                    state.error = Some(DashboardError::Metadata.to_string());
                    state.is_loading = false;
                });
                Err(DashboardError::Metadata)
            }
        }
    }

    /// Read `allowance(owner, spender)` on the active token, formatted.
    pub async fn fetch_allowance(
        &self,
        owner: &str,
        spender: &str,
    ) -> Result<String, DashboardError> {
        let (Some(owner), Some(spender)) = (parse_address(owner), parse_address(spender)) else {
            let err = DashboardError::InvalidAddress;
            self.set_error(&err);
            return Err(err);
        };

        let (token, decimals) = {
            let state = self.inner.state.read();
            (state.custom_token_address, state.token_data.decimals)
        };

        let reader = TokenReader::new(self.client(), token);
        let allowance = reader.allowance(owner, spender).await.map_err(|e| {
            error!(token = %token, error = %e, "Error reading allowance");
            DashboardError::Allowance
        })?;

        format_amount(allowance, decimals)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Inputs
    // ─────────────────────────────────────────────────────────────────────────────

    /// Edit the candidate token address. Validated on submit.
    pub fn set_input_token_address(&self, input: impl Into<String>) {
        let input = input.into();
        self.update(|state| state.input_token_address = input);
    }

    /// Make the edited token address active and reload against it.
    pub async fn handle_token_address_change(&self) -> Result<Address, DashboardError> {
        let input = self.inner.state.read().input_token_address.clone();

        let Some(token) = parse_address(&input) else {
            let err = DashboardError::InvalidTokenAddress;
            self.set_error(&err);
            return Err(err);
        };

        info!(token = %token, "Switching token");
        let user = self.update_and_read(|state| {
            state.custom_token_address = token;
            state.transfer_status = TransferStatus::Idle;
            state.error = None;
            state.token_data.user_address
        });

        match user {
            Some(user) => self.fetch_token_data(Some(user), token).await.map(|_| token),
            None => self.refresh_metadata().await.map(|_| token),
        }
    }

    /// Set the decimals used for tokens without `decimals()`, then reload.
    pub async fn set_custom_decimals(&self, decimals: u32) -> Result<(), DashboardError> {
        let value = u8::try_from(decimals)
            .ok()
            .filter(|value| *value <= MAX_DECIMALS)
            .ok_or(DashboardError::InvalidDecimals {
                value: decimals,
                max: MAX_DECIMALS,
            })?;

        self.update(|state| state.custom_decimals = value);
        self.refresh_metadata().await
    }

    /// Switch networks: rebuild the RPC client and reload metadata.
    ///
    /// Reads still running against the previous client are not cancelled.
    pub async fn set_selected_network(&self, network: NetworkType) -> Result<(), DashboardError> {
        let config = self.inner.networks.get(network);
        let client = match (self.inner.client_fn)(config) {
            Ok(client) => client,
            Err(e) => {
                let err = DashboardError::from(e);
                self.set_error(&err);
                return Err(err);
            }
        };

        info!(network = %network, chain_id = config.chain.id, "Switching network");
        *self.inner.client.write() = client;
        self.update(|state| state.selected_network = network);

        self.refresh_metadata().await
    }

    pub fn reset_transfer_status(&self) {
        self.set_transfer_status(TransferStatus::Idle);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Send `amount` tokens from the connected account to `to`.
    pub async fn handle_transfer(&self, to: &str, amount: &str) -> Result<TxHash, DashboardError> {
        let from = self.require_connected()?;
        let to = self.require_address(to, DashboardError::InvalidRecipient)?;

        self.submit(WriteKind::Transfer, from, amount, |amount| {
            encode_transfer(to, amount)
        })
        .await
    }

    /// Allow `spender` to move `amount` tokens of the connected account.
    pub async fn handle_approve(
        &self,
        spender: &str,
        amount: &str,
    ) -> Result<TxHash, DashboardError> {
        let from = self.require_connected()?;
        let spender = self.require_address(spender, DashboardError::InvalidSpender)?;

        self.submit(WriteKind::Approve, from, amount, |amount| {
            encode_approve(spender, amount)
        })
        .await
    }

    /// Move `amount` tokens from `owner` to `to` using the connected account's allowance.
    pub async fn handle_transfer_from(
        &self,
        owner: &str,
        to: &str,
        amount: &str,
    ) -> Result<TxHash, DashboardError> {
        let from = self.require_connected()?;
        let (Some(owner), Some(to)) = (parse_address(owner), parse_address(to)) else {
            let err = DashboardError::InvalidAddress;
            self.set_error(&err);
            return Err(err);
        };

        self.submit(WriteKind::TransferFrom, from, amount, |amount| {
            encode_transfer_from(owner, to, amount)
        })
        .await
    }

    fn require_connected(&self) -> Result<Address, DashboardError> {
        let user = self.inner.state.read().token_data.user_address;
        user.ok_or_else(|| {
            let err = DashboardError::NotConnected;
            self.set_error(&err);
            err
        })
    }

    fn require_address(&self, input: &str, err: DashboardError) -> Result<Address, DashboardError> {
        parse_address(input).ok_or_else(|| {
            self.set_error(&err);
            err
        })
    }

    async fn submit(
        &self,
        kind: WriteKind,
        from: Address,
        amount: &str,
        encode: impl FnOnce(U256) -> Bytes,
    ) -> Result<TxHash, DashboardError> {
        let (token, decimals) = {
            let state = self.inner.state.read();
            (state.custom_token_address, state.token_data.decimals)
        };

        let amount = match parse_amount(amount, decimals) {
            Ok(amount) => amount,
            Err(e) => {
                self.fail_write(kind, &e);
                return Err(e);
            }
        };

        self.set_transfer_status(TransferStatus::Pending);

        let Some(wallet) = self.wallet() else {
            let err = DashboardError::WalletUnavailable;
            self.fail_write(kind, &err);
            return Err(err);
        };

        let tx = TransactionRequest::default()
            .from(from)
            .to(token)
            .input(TransactionInput::new(encode(amount)));

        debug!(kind = %kind, from = %from, token = %token, amount = %amount, "Submitting transaction");

        match wallet.send_transaction(tx).await {
            Ok(hash) => {
                info!(kind = %kind, tx_hash = %hash, "Transaction submitted");
                self.set_transfer_status(TransferStatus::Success { hash });

                if kind.moves_tokens() {
                    self.schedule_refresh(from, token);
                }

                Ok(hash)
            }
            Err(e) => {
                let err = DashboardError::from(e);
                self.fail_write(kind, &err);
                Err(err)
            }
        }
    }

    fn fail_write(&self, kind: WriteKind, err: &DashboardError) {
        warn!(kind = %kind, error = %err, "Transaction failed");

        let mut message = err.to_string();
        if message.is_empty() {
            message = "Unknown error occurred".to_string();
        }
        self.set_transfer_status(TransferStatus::Error { message });
    }

    /// Refresh balances after the refresh delay. The transaction may not be
    /// mined by then.
    fn schedule_refresh(&self, user: Address, token: Address) {
        let dashboard = self.clone();
        let delay = self.inner.refresh_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(user = %user, token = %token, "Refreshing balance after transaction");
            let _ = dashboard.fetch_token_data(Some(user), token).await;
        });
    }

    fn update_and_read<T>(&self, f: impl FnOnce(&mut DashboardState) -> T) -> T {
        f(&mut self.inner.state.write())
    }
}


#[cfg(test)]
mod tests {
    use super::{test_utils::*, *};
    use alloy_primitives::{address, TxKind};
    use alloy_transport::mock::Asserter;
    use parking_lot::Mutex;

    const TOKEN: Address = address!("1b96FC4e081D0A44Fad54F70d37Aa76ebff77ad7");
    const OTHER_TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
    const USER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    const ONE: u128 = 1_000_000_000_000_000_000;

    struct Harness {
        asserter: Asserter,
        requested: Arc<Mutex<Vec<NetworkType>>>,
        dashboard: Dashboard<MockWallet>,
    }

    fn harness(wallet: Option<MockWallet>, refresh_delay: Duration) -> Harness {
        let asserter = Asserter::new();
        let requested = Arc::new(Mutex::new(Vec::new()));
        let options = DashboardOptions::default()
            .token_address(TOKEN)
            .refresh_delay(refresh_delay);
        let dashboard = Dashboard::new(
            options,
            mocked_client_fn(&asserter, Arc::clone(&requested)),
            wallet,
        )
        .unwrap();

        Harness {
            asserter,
            requested,
            dashboard,
        }
    }

    fn idle_harness(wallet: Option<MockWallet>) -> Harness {
        harness(wallet, Duration::from_secs(3600))
    }

    fn push_metadata(asserter: &Asserter, decimals: Option<u8>, total_supply: u128) {
        push_return(asserter, "WhiteToken".to_string());
        push_return(asserter, "WHT".to_string());
        match decimals {
            Some(decimals) => push_return(asserter, U256::from(decimals)),
            None => asserter.push_failure_msg("execution reverted"),
        }
        push_return(asserter, U256::from(total_supply));
    }

    async fn connect(h: &Harness, balance: u128) {
        push_metadata(&h.asserter, Some(18), 1_000 * ONE);
        push_return(&h.asserter, U256::from(balance));
        h.dashboard.connect_wallet().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_token_data_populates_metadata() {
        let h = idle_harness(None);
        push_metadata(&h.asserter, Some(18), 1_000 * ONE);
        push_return(&h.asserter, U256::from(250 * ONE + ONE / 2));

        let data = h
            .dashboard
            .fetch_token_data(Some(USER), TOKEN)
            .await
            .unwrap();

        assert_eq!(data.name, "WhiteToken");
        assert_eq!(data.symbol, "WHT");
        assert_eq!(data.decimals, 18);
        assert_eq!(data.total_supply, "1000");
        assert_eq!(data.user_address, Some(USER));
        assert_eq!(data.user_balance, "250.5");

        let state = h.dashboard.state();
        assert_eq!(state.token_data, data);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_without_account_uses_authorised_wallet_account() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        push_metadata(&h.asserter, Some(18), ONE);
        push_return(&h.asserter, U256::from(3 * ONE));

        let data = h.dashboard.fetch_token_data(None, TOKEN).await.unwrap();

        assert_eq!(data.user_address, Some(USER));
        assert_eq!(data.user_balance, "3");
    }

    #[tokio::test]
    async fn test_fetch_without_any_account_shows_no_balance() {
        let h = idle_harness(None);
        push_metadata(&h.asserter, Some(18), ONE);

        let data = h.dashboard.fetch_token_data(None, TOKEN).await.unwrap();

        assert_eq!(data.user_address, None);
        assert_eq!(data.user_balance, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_error() {
        let h = idle_harness(None);
        h.asserter.push_failure_msg("connection refused");

        let err = h
            .dashboard
            .fetch_token_data(None, TOKEN)
            .await
            .unwrap_err();

        assert!(matches!(err, DashboardError::TokenData));
        let state = h.dashboard.state();
        assert_eq!(state.error, Some(DashboardError::TokenData.to_string()));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_edited_decimals_used_when_contract_has_none() {
        let h = idle_harness(None);

        // Metadata reload triggered by the edit.
        push_metadata(&h.asserter, None, 1_000_000);
        h.dashboard.set_custom_decimals(6).await.unwrap();
        assert_eq!(h.dashboard.state().custom_decimals, 6);

        push_metadata(&h.asserter, None, 2_500_000);
        let data = h.dashboard.fetch_token_data(None, TOKEN).await.unwrap();

        assert_eq!(data.decimals, 6);
        assert_eq!(data.total_supply, "2.5");
        assert_eq!(h.dashboard.state().custom_decimals, 6);
    }

    #[tokio::test]
    async fn test_contract_decimals_override_custom_value() {
        let h = idle_harness(None);
        push_metadata(&h.asserter, Some(8), 100_000_000);
        h.dashboard.set_custom_decimals(2).await.unwrap();

        let state = h.dashboard.state();
        assert_eq!(state.custom_decimals, 8);
        assert_eq!(state.token_data.total_supply, "1");
    }

    #[tokio::test]
    async fn test_decimals_out_of_range_rejected() {
        let h = idle_harness(None);

        let err = h.dashboard.set_custom_decimals(37).await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDecimals { value: 37, .. }));
        assert_eq!(h.dashboard.state().custom_decimals, 18);
    }

    #[tokio::test]
    async fn test_refresh_metadata_keeps_account_fields() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        connect(&h, 5 * ONE).await;

        push_return(&h.asserter, "Renamed".to_string());
        push_return(&h.asserter, "RNM".to_string());
        push_return(&h.asserter, U256::from(18));
        push_return(&h.asserter, U256::from(ONE));
        h.dashboard.refresh_metadata().await.unwrap();

        let data = h.dashboard.token_data();
        assert_eq!(data.name, "Renamed");
        assert_eq!(data.total_supply, "1");
        assert_eq!(data.user_address, Some(USER));
        assert_eq!(data.user_balance, "5");
    }

    #[tokio::test]
    async fn test_refresh_metadata_failure() {
        let h = idle_harness(None);
        h.asserter.push_failure_msg("connection refused");

        assert!(h.dashboard.refresh_metadata().await.is_err());
        assert_eq!(h.dashboard.error().as_deref(), Some("Failed to fetch token data"));
        assert!(!h.dashboard.state().is_loading);
    }

    #[tokio::test]
    async fn test_connect_without_wallet() {
        let h = idle_harness(None);

        let err = h.dashboard.connect_wallet().await.unwrap_err();

        assert!(matches!(err, DashboardError::WalletUnavailable));
        assert_eq!(h.dashboard.error().as_deref(), Some("Wallet is not available"));
    }

    #[tokio::test]
    async fn test_connect_rejected() {
        let h = idle_harness(Some(
            MockWallet::with_account(USER).rejecting("User rejected the request."),
        ));

        let err = h.dashboard.connect_wallet().await.unwrap_err();

        assert!(matches!(err, DashboardError::WalletConnection));
        assert_eq!(h.dashboard.error().as_deref(), Some("Failed to connect wallet"));
        assert!(!h.dashboard.state().is_connected());
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        connect(&h, 7 * ONE).await;

        let data = h.dashboard.token_data();
        assert_eq!(data.user_address, Some(USER));
        assert_eq!(data.user_balance, "7");

        h.dashboard.disconnect_wallet();
        let data = h.dashboard.token_data();
        assert_eq!(data.user_address, None);
        assert_eq!(data.user_balance, NOT_AVAILABLE);
        assert_eq!(data.name, "WhiteToken");
    }

    #[tokio::test]
    async fn test_empty_accounts_event_disconnects() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        connect(&h, ONE).await;

        h.dashboard.on_accounts_changed(&[]).await;

        assert!(!h.dashboard.state().is_connected());
    }

    #[tokio::test]
    async fn test_account_switch_event_reloads_balance() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        connect(&h, ONE).await;

        let next = parse_address(RECIPIENT).unwrap();
        push_metadata(&h.asserter, Some(18), 1_000 * ONE);
        push_return(&h.asserter, U256::from(9 * ONE));
        h.dashboard.on_accounts_changed(&[next]).await;

        let data = h.dashboard.token_data();
        assert_eq!(data.user_address, Some(next));
        assert_eq!(data.user_balance, "9");
    }

    #[tokio::test]
    async fn test_write_requires_connection() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));

        let err = h.dashboard.handle_transfer(RECIPIENT, "1").await.unwrap_err();

        assert!(matches!(err, DashboardError::NotConnected));
        assert_eq!(
            h.dashboard.error().as_deref(),
            Some("Please connect your wallet first")
        );
        assert!(h.dashboard.wallet().unwrap().sent().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_addresses_block_writes() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        connect(&h, ONE).await;

        let err = h.dashboard.handle_transfer("0x1234", "1").await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRecipient));
        assert_eq!(h.dashboard.error().as_deref(), Some("Invalid recipient address"));

        let err = h.dashboard.handle_approve("spender", "1").await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidSpender));
        assert_eq!(h.dashboard.error().as_deref(), Some("Invalid spender address"));

        let err = h
            .dashboard
            .handle_transfer_from("0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266", RECIPIENT, "1")
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidAddress));
        assert_eq!(h.dashboard.error().as_deref(), Some("Invalid address format"));

        assert!(h.dashboard.wallet().unwrap().sent().is_empty());
        assert_eq!(h.dashboard.transfer_status(), TransferStatus::Idle);
    }

    #[tokio::test]
    async fn test_invalid_amount_fails_without_wallet_call() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        connect(&h, ONE).await;

        let err = h.dashboard.handle_transfer(RECIPIENT, "lots").await.unwrap_err();

        assert!(matches!(err, DashboardError::InvalidAmount(_)));
        assert!(h.dashboard.transfer_status().is_error());
        assert!(h.dashboard.wallet().unwrap().sent().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_success() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        connect(&h, ONE).await;

        let hash = h.dashboard.handle_transfer(RECIPIENT, "1.5").await.unwrap();

        let status = h.dashboard.transfer_status();
        assert!(status.is_success());
        assert_eq!(status.hash(), Some(hash));

        let sent = h.dashboard.wallet().unwrap().sent();
        assert_eq!(sent.len(), 1);
        let tx = &sent[0];
        assert_eq!(tx.from, Some(USER));
        assert_eq!(tx.to, Some(TxKind::Call(TOKEN)));
        assert_eq!(
            tx.input.input(),
            Some(&encode_transfer(
                parse_address(RECIPIENT).unwrap(),
                U256::from(ONE + ONE / 2)
            ))
        );
    }

    #[tokio::test]
    async fn test_transfer_amount_uses_token_decimals() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        push_metadata(&h.asserter, Some(6), 1_000_000_000);
        push_return(&h.asserter, U256::from(5_000_000u64));
        h.dashboard.connect_wallet().await.unwrap();
        assert_eq!(h.dashboard.token_data().user_balance, "5");

        h.dashboard.handle_transfer(RECIPIENT, "1.5").await.unwrap();

        let sent = h.dashboard.wallet().unwrap().sent();
        assert_eq!(
            sent[0].input.input(),
            Some(&encode_transfer(
                parse_address(RECIPIENT).unwrap(),
                U256::from(1_500_000u64)
            ))
        );
    }

    #[tokio::test]
    async fn test_rejected_transfer_sets_error_status() {
        let h = idle_harness(Some(
            MockWallet::with_account(USER).rejecting("User rejected the request."),
        ));
        h.dashboard.update(|state| state.token_data.user_address = Some(USER));

        let err = h.dashboard.handle_approve(RECIPIENT, "10").await.unwrap_err();

        assert!(matches!(err, DashboardError::Wallet(_)));
        let status = h.dashboard.transfer_status();
        assert!(status.is_error());
        assert_eq!(status.error_message(), "User rejected the request.");
        assert_eq!(h.dashboard.wallet().unwrap().sent().len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_from_encodes_owner_and_recipient() {
        let h = idle_harness(Some(MockWallet::with_account(USER)));
        connect(&h, ONE).await;

        let owner = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";
        h.dashboard
            .handle_transfer_from(owner, RECIPIENT, "2")
            .await
            .unwrap();

        let sent = h.dashboard.wallet().unwrap().sent();
        assert_eq!(
            sent[0].input.input(),
            Some(&encode_transfer_from(
                parse_address(owner).unwrap(),
                parse_address(RECIPIENT).unwrap(),
                U256::from(2 * ONE)
            ))
        );
    }

    #[tokio::test]
    async fn test_balance_refreshed_after_transfer() {
        let h = harness(
            Some(MockWallet::with_account(USER)),
            Duration::from_millis(10),
        );
        connect(&h, 10 * ONE).await;

        push_metadata(&h.asserter, Some(18), 1_000 * ONE);
        push_return(&h.asserter, U256::from(8 * ONE));
        h.dashboard.handle_transfer(RECIPIENT, "2").await.unwrap();

        let mut balance = h.dashboard.token_data().user_balance;
        for _ in 0..200 {
            if balance == "8" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            balance = h.dashboard.token_data().user_balance;
        }
        assert_eq!(balance, "8");
    }

    #[tokio::test]
    async fn test_token_address_change() {
        let h = idle_harness(None);
        h.dashboard.set_input_token_address("not an address");
        assert!(!h.dashboard.can_update_token_address());

        let err = h.dashboard.handle_token_address_change().await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidTokenAddress));
        assert_eq!(
            h.dashboard.error().as_deref(),
            Some("Invalid Ethereum address format")
        );

        h.dashboard.set_input_token_address(OTHER_TOKEN.to_checksum(None));
        assert!(h.dashboard.can_update_token_address());
        h.dashboard.set_transfer_status(TransferStatus::Error {
            message: "old".to_string(),
        });

        push_metadata(&h.asserter, Some(18), ONE);
        let token = h.dashboard.handle_token_address_change().await.unwrap();

        let state = h.dashboard.state();
        assert_eq!(token, OTHER_TOKEN);
        assert_eq!(state.custom_token_address, OTHER_TOKEN);
        assert_eq!(state.transfer_status, TransferStatus::Idle);
        assert_eq!(state.error, None);
        assert_eq!(state.token_data.total_supply, "1");
        assert!(!h.dashboard.can_update_token_address());
    }

    #[tokio::test]
    async fn test_network_switch_rebuilds_client() {
        let h = idle_harness(None);
        assert_eq!(*h.requested.lock(), vec![NetworkType::Sepolia]);

        push_metadata(&h.asserter, Some(18), ONE);
        h.dashboard
            .set_selected_network(NetworkType::Hardhat)
            .await
            .unwrap();

        assert_eq!(
            *h.requested.lock(),
            vec![NetworkType::Sepolia, NetworkType::Hardhat]
        );
        assert_eq!(h.dashboard.selected_network(), NetworkType::Hardhat);
        assert_eq!(h.dashboard.network().chain.id, 31337);
    }

    #[tokio::test]
    async fn test_fetch_allowance() {
        let h = idle_harness(None);
        push_return(&h.asserter, U256::from(3 * ONE));

        let allowance = h
            .dashboard
            .fetch_allowance("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266", RECIPIENT)
            .await
            .unwrap();
        assert_eq!(allowance, "3");

        let err = h
            .dashboard
            .fetch_allowance("0x00", RECIPIENT)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidAddress));
    }

    #[tokio::test]
    async fn test_reset_transfer_status() {
        let h = idle_harness(None);
        h.dashboard.set_transfer_status(TransferStatus::Pending);

        h.dashboard.reset_transfer_status();

        assert_eq!(h.dashboard.transfer_status(), TransferStatus::Idle);
    }
}
