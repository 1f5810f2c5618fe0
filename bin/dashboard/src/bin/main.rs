//! ERC20 token dashboard.
//!
//! Without a subcommand the dashboard opens an interactive prompt. The
//! subcommands run a single action and exit:
//! - `info`: token metadata and the authorised account's balance
//! - `allowance`: how much a spender may move for an owner
//! - `transfer`, `approve`, `transfer-from`: submit a write through the wallet

use clap::{Parser, Subcommand};
use client::{KeyWallet, RpcWallet};
use config::NetworkType;
use dashboard::{
    command::PromptCommand,
    config::Config,
    metrics::{install_prometheus_exporter, Metrics},
    watch_accounts, Session, WalletBackend,
};
use std::{io::Write, path::PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use token::{address::parse_address, Dashboard, DashboardError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "ERC20 token dashboard")]
struct Cli {
    /// Path to the configuration file (defaults to dashboard.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network to start on (hardhat | sepolia)
    #[arg(short, long, env = "CHAIN")]
    network: Option<NetworkType>,

    /// RPC endpoint used for every network
    #[arg(long, env = "RPC_URL")]
    rpc_url: Option<String>,

    /// Token contract address
    #[arg(short, long)]
    token: Option<String>,

    /// Decimals used until the contract reports its own
    #[arg(long)]
    decimals: Option<u8>,

    /// JSON-RPC wallet endpoint
    #[arg(long, env = "WALLET_URL")]
    wallet_url: Option<String>,

    /// Private key used as the wallet instead of a wallet endpoint
    #[arg(short = 'k', long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Serve Prometheus metrics on this port
    #[arg(long)]
    metrics_port: Option<u16>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show token metadata and the authorised account's balance
    Info,

    /// Show how much `spender` may move on behalf of `owner`
    Allowance { owner: String, spender: String },

    /// Send tokens from the wallet's account
    Transfer {
        to: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Allow `spender` to move tokens of the wallet's account
    Approve {
        spender: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Move tokens from `from` to `to` using the wallet's allowance
    TransferFrom {
        from: String,
        to: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
}

impl Command {
    fn into_prompt(self) -> Option<PromptCommand> {
        match self {
            Self::Info => None,
            Self::Allowance { owner, spender } => {
                Some(PromptCommand::Allowance { owner, spender })
            }
            Self::Transfer { to, amount } => Some(PromptCommand::Transfer { to, amount }),
            Self::Approve { spender, amount } => Some(PromptCommand::Approve { spender, amount }),
            Self::TransferFrom { from, to, amount } => {
                Some(PromptCommand::TransferFrom { from, to, amount })
            }
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

impl Cli {
    /// File configuration with command line and environment overrides applied.
    fn config(&self) -> eyre::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(rpc_url) = self.rpc_url.as_ref().filter(|url| !url.trim().is_empty()) {
            config.rpc_url = Some(rpc_url.clone());
        }
        if let Some(token) = &self.token {
            config.token_address = parse_address(token)
                .ok_or_else(|| eyre::eyre!(DashboardError::InvalidTokenAddress))?;
        }
        if let Some(decimals) = self.decimals {
            config.default_decimals = decimals;
        }
        if let Some(wallet_url) = &self.wallet_url {
            config.wallet_url = Some(wallet_url.clone());
        }
        if let Some(port) = self.metrics_port {
            config.metrics_port = Some(port);
        }

        Ok(config)
    }

    /// A private key takes precedence over a wallet endpoint.
    fn wallet(&self, config: &Config) -> eyre::Result<Option<WalletBackend>> {
        if let Some(key) = &self.private_key {
            let networks = config.networks();
            let rpc_url = &networks.get(config.network).rpc_url;
            return Ok(Some(WalletBackend::Key(KeyWallet::new(rpc_url, key)?)));
        }

        Ok(config
            .wallet_url
            .as_ref()
            .map(|url| WalletBackend::Rpc(RpcWallet::new(url))))
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = cli.config()?;
    let wallet = cli.wallet(&config)?;

    info!("Loaded config:");
    info!("  Network: {}", config.network);
    info!("  Token: {}", config.token_address);
    match &wallet {
        Some(wallet) => info!("  Wallet: {}", wallet.kind()),
        None => warn!("  Wallet: none (read-only)"),
    }

    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!("Metrics listening on port {}", port);
    }

    let dashboard = Dashboard::new(
        config.dashboard_options(),
        client::http_client_fn(),
        wallet,
    )?;
    let mut session = Session::new(dashboard, Metrics::new());

    match cli.command {
        Some(command) => run_once(&mut session, command).await,
        None => run_prompt(&mut session, &config).await,
    }
}

async fn run_once(session: &mut Session<WalletBackend>, command: Command) -> eyre::Result<()> {
    let Some(command) = command.into_prompt() else {
        // `info` includes the balance of an account the wallet already authorised.
        println!("{}", session.start_with_account().await);
        return Ok(());
    };

    let dashboard = session.dashboard().clone();
    if command.write_kind().is_some() {
        // Writes need the wallet's account and the token's decimals.
        dashboard.connect_wallet().await?;
    } else {
        dashboard.refresh_metadata().await?;
    }

    println!("{}", session.execute(command).await);

    let state = dashboard.state();
    if let Some(message) = state.error {
        eyre::bail!(message);
    }
    if state.transfer_status.is_error() {
        eyre::bail!(state.transfer_status.error_message().to_string());
    }

    Ok(())
}

async fn run_prompt(session: &mut Session<WalletBackend>, config: &Config) -> eyre::Result<()> {
    println!("{}", session.start().await);
    let _watcher = watch_accounts(
        session.dashboard().clone(),
        config.accounts_poll_interval(),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let command = match PromptCommand::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if command == PromptCommand::Quit {
            break;
        }

        println!("{}", session.execute(command).await);
    }

    info!("Exiting");
    Ok(())
}
