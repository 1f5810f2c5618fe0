pub mod command;
pub mod config;
pub mod metrics;
pub mod render;
mod wallet;

use crate::{command::PromptCommand, metrics::Metrics, render::render_dashboard};
use alloy_primitives::Address;
use client::InjectedWallet;
use std::time::Duration;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use token::{Dashboard, DashboardError, WriteKind};
use tracing::{debug, info};
pub use wallet::WalletBackend;

/// Shortest interval at which wallet accounts are polled.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// An interactive dashboard session.
///
/// Runs prompt commands against the dashboard and renders the result.
pub struct Session<W> {
    dashboard: Dashboard<W>,
    metrics: Metrics,
    last_write: Option<WriteKind>,
}

impl<W> Session<W>
where
    W: InjectedWallet + 'static,
{
    pub const fn new(dashboard: Dashboard<W>, metrics: Metrics) -> Self {
        Self {
            dashboard,
            metrics,
            last_write: None,
        }
    }

    pub const fn dashboard(&self) -> &Dashboard<W> {
        &self.dashboard
    }

    /// Current dashboard view.
    pub fn render(&self) -> String {
        render_dashboard(
            &self.dashboard.state(),
            self.dashboard.network(),
            self.last_write,
        )
    }

    /// First read after start-up. Token metadata only; the account stays
    /// disconnected until `connect`.
    pub async fn start(&self) -> String {
        let result = self.dashboard.refresh_metadata().await;
        self.record_fetch(result.is_ok());
        self.render()
    }

    /// Like [`Session::start`], but also loads the balance of an account the
    /// wallet has already authorised.
    pub async fn start_with_account(&self) -> String {
        let token = self.dashboard.state().custom_token_address;
        let result = self.dashboard.fetch_token_data(None, token).await;
        self.record_fetch(result.is_ok());
        self.render()
    }

    /// Run one command and return what to print.
    pub async fn execute(&mut self, command: PromptCommand) -> String {
        if let Err(e) = command.validate() {
            return e.to_string();
        }

        let dashboard = &self.dashboard;
        match command {
            PromptCommand::Connect => {
                let result = dashboard.connect_wallet().await;
                self.record_fetch(result.is_ok());
            }
            PromptCommand::Disconnect => dashboard.disconnect_wallet(),
            PromptCommand::Network { network } => {
                if dashboard.set_selected_network(network).await.is_ok() {
                    self.metrics.record_network_switch(network.as_str());
                }
            }
            PromptCommand::Token { address } => {
                let known = token::address::is_address(&address);
                dashboard.set_input_token_address(address);
                if known && !dashboard.can_update_token_address() {
                    return "Token is already selected".to_string();
                }
                let result = dashboard.handle_token_address_change().await;
                self.record_fetch(result.is_ok());
            }
            PromptCommand::Decimals { decimals } => {
                if let Err(e @ DashboardError::InvalidDecimals { .. }) =
                    dashboard.set_custom_decimals(decimals).await
                {
                    return render::render_error(&e.to_string());
                }
            }
            PromptCommand::Transfer { to, amount } => {
                self.last_write = Some(WriteKind::Transfer);
                let result = dashboard.handle_transfer(&to, &amount).await;
                self.metrics.record_transaction(WriteKind::Transfer, result.is_ok());
            }
            PromptCommand::Approve { spender, amount } => {
                self.last_write = Some(WriteKind::Approve);
                let result = dashboard.handle_approve(&spender, &amount).await;
                self.metrics.record_transaction(WriteKind::Approve, result.is_ok());
            }
            PromptCommand::TransferFrom { from, to, amount } => {
                self.last_write = Some(WriteKind::TransferFrom);
                let result = dashboard.handle_transfer_from(&from, &to, &amount).await;
                self.metrics
                    .record_transaction(WriteKind::TransferFrom, result.is_ok());
            }
            PromptCommand::Allowance { owner, spender } => {
                return match dashboard.fetch_allowance(&owner, &spender).await {
                    Ok(allowance) => render::render_row(
                        "Allowance",
                        &format!("{allowance} {}", dashboard.token_data().symbol),
                    ),
                    Err(e) => render::render_error(&e.to_string()),
                };
            }
            PromptCommand::Reset => {
                self.last_write = None;
                dashboard.reset_transfer_status();
            }
            PromptCommand::Refresh => {
                let state = dashboard.state();
                let result = dashboard
                    .fetch_token_data(state.token_data.user_address, state.custom_token_address)
                    .await;
                self.record_fetch(result.is_ok());
            }
            PromptCommand::Show | PromptCommand::Quit => {}
        }

        self.render()
    }

    fn record_fetch(&self, success: bool) {
        self.metrics.record_fetch(success);
        if success {
            let data = self.dashboard.token_data();
            if data.user_address.is_some() {
                self.metrics.set_user_balance(&data.symbol, &data.user_balance);
            }
        }
    }
}

/// Poll the wallet's accounts and forward changes to the dashboard.
///
/// Stands in for the `accountsChanged` event of browser wallets. The first
/// poll only records the current accounts.
pub fn watch_accounts<W>(dashboard: Dashboard<W>, interval: Duration) -> JoinHandle<()>
where
    W: InjectedWallet + 'static,
{
    tokio::spawn(async move {
        let Some(wallet) = dashboard.wallet() else {
            return;
        };

        let mut ticker = tokio::time::interval(interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last: Option<Vec<Address>> = None;

        loop {
            ticker.tick().await;

            let accounts = match wallet.accounts().await {
                Ok(accounts) => accounts,
                Err(e) => {
                    debug!(error = %e, "Polling wallet accounts failed");
                    continue;
                }
            };

            if last.as_ref() == Some(&accounts) {
                continue;
            }
            if last.is_some() {
                info!(accounts = accounts.len(), "Wallet accounts changed");
                dashboard.on_accounts_changed(&accounts).await;
            }
            last = Some(accounts);
        }
    })
}
