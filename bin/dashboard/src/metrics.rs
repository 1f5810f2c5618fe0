//! Prometheus metrics for the dashboard.
//!
//! All metrics are aggregated in the [`Metrics`] struct.

use metrics::{counter, describe_counter, describe_gauge, gauge};
use token::WriteKind;

/// Aggregated metrics for the dashboard.
///
/// Metrics are registered with the global metrics registry on creation.
/// Recording is a no-op until an exporter is installed.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "dashboard_token_fetch_total",
            "Token data reads by outcome"
        );
        describe_counter!(
            "dashboard_transactions_total",
            "Transactions submitted through the wallet by kind and outcome"
        );
        describe_counter!(
            "dashboard_network_switches_total",
            "Network switches by target network"
        );
        describe_gauge!(
            "dashboard_user_balance",
            "Token balance of the connected account, in whole tokens"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────────

    /// Record a token data read.
    pub fn record_fetch(&self, success: bool) {
        counter!("dashboard_token_fetch_total", "outcome" => outcome(success)).increment(1);
    }

    /// Set the connected account's balance. Unparseable display values are skipped.
    pub fn set_user_balance(&self, token: &str, balance: &str) {
        if let Ok(balance) = balance.parse::<f64>() {
            gauge!("dashboard_user_balance", "token" => token.to_string()).set(balance);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Record a submitted transaction.
    pub fn record_transaction(&self, kind: WriteKind, success: bool) {
        counter!(
            "dashboard_transactions_total",
            "kind" => kind.as_str(),
            "outcome" => outcome(success)
        )
        .increment(1);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Networks
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn record_network_switch(&self, network: &str) {
        counter!("dashboard_network_switches_total", "network" => network.to_string()).increment(1);
    }
}

const fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
