//! Plain-text rendering of the dashboard state.

use config::{ChainSpec, NetworkConfig};
use token::{
    address::shorten_address, state::NOT_AVAILABLE, DashboardState, TokenData, TransferStatus,
    WriteKind,
};

const LABEL_WIDTH: usize = 14;

/// Token header, e.g. `WhiteToken (WHT)`.
pub fn render_header(data: &TokenData) -> String {
    format!("{} ({})", data.name, data.symbol)
}

/// A single `label: value` row.
pub fn render_row(label: &str, value: &str) -> String {
    format!("{:<width$}{}", format!("{label}:"), value, width = LABEL_WIDTH)
}

pub fn render_error(message: &str) -> String {
    format!("Error: {message}")
}

/// Token rows. Account rows are shown only while an account is connected.
pub fn render_token(data: &TokenData) -> String {
    let mut out = render_header(data);
    out.push('\n');
    out.push_str(&render_row(
        "Total Supply",
        &format!("{} {}", data.total_supply, data.symbol),
    ));

    if let Some(address) = data.user_address {
        out.push('\n');
        out.push_str(&render_row("Your Address", &shorten_address(address)));
        out.push('\n');
        let balance = if data.user_balance == NOT_AVAILABLE {
            data.user_balance.clone()
        } else {
            format!("{} {}", data.user_balance, data.symbol)
        };
        out.push_str(&render_row("Your Balance", &balance));
    }

    out
}

/// Status block for the last write. `None` while idle.
pub fn render_status(
    status: &TransferStatus,
    kind: WriteKind,
    chain: &ChainSpec,
) -> Option<String> {
    let noun = match kind {
        WriteKind::Approve => "Approval",
        WriteKind::Transfer | WriteKind::TransferFrom => "Transfer",
    };

    match status {
        TransferStatus::Idle => None,
        TransferStatus::Pending => {
            Some("Processing... confirm the transaction in your wallet".to_string())
        }
        TransferStatus::Success { hash } => {
            let mut out = format!("{noun} Successful!\nTransaction hash: {hash}");
            if let Some(url) = chain.tx_url(hash) {
                out.push('\n');
                out.push_str(&url);
            }
            Some(out)
        }
        TransferStatus::Error { message } => Some(format!("{noun} Failed\n{message}")),
    }
}

/// Full dashboard view.
pub fn render_dashboard(
    state: &DashboardState,
    network: &NetworkConfig,
    last_write: Option<WriteKind>,
) -> String {
    let token = state.custom_token_address;
    let mut out = format!(
        "Network: {} (chain {})\nToken:   {}\n",
        network.name,
        network.chain.id,
        token.to_checksum(None)
    );
    if let Some(url) = network.chain.address_url(token) {
        out.push_str(&format!("         {url}\n"));
    }

    if let Some(error) = &state.error {
        out.push('\n');
        out.push_str(&render_error(error));
        out.push('\n');
    }

    out.push('\n');
    if state.is_loading {
        out.push_str("Loading...");
    } else {
        out.push_str(&render_token(&state.token_data));
    }
    out.push('\n');

    if !state.is_connected() {
        out.push_str("\nWallet not connected. Type `connect` to connect.\n");
    }

    let kind = last_write.unwrap_or(WriteKind::Transfer);
    if let Some(status) = render_status(&state.transfer_status, kind, &network.chain) {
        out.push('\n');
        out.push_str(&status);
        out.push('\n');
    }

    out
}
