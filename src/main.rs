//! Timelock Courier CLI
//!
//! Command-line shell around the connection subsystem: inspect RPC and
//! network reachability, run the wallet connect flow against the local
//! keystore, or watch all connection state live.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use timelock_courier::network::Prober;
use timelock_courier::{
    Config, HostSignals, HttpProber, NetworkStatusMonitor, ProviderConnectionManager, Result,
    RpcConfig, WalletConnectionManager, PRIVATE_KEY_ENV,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "courier")]
#[command(about = "Connection subsystem for the Timelock Courier dApp")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check RPC endpoint and network reachability
    Status {
        /// Chain name (ethereum, sepolia, base)
        #[arg(short, long, default_value = "sepolia")]
        chain: String,
    },

    /// Run the wallet connect flow and list accounts
    Connect,

    /// Watch wallet, RPC, and network state live until interrupted
    Watch {
        /// Chain name (ethereum, sepolia, base)
        #[arg(short, long, default_value = "sepolia")]
        chain: String,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Load config
    let config = if let Some(config_path) = cli.config {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| timelock_courier::Error::Config(e.to_string()))?;
        serde_json::from_str(&content)
            .map_err(|e| timelock_courier::Error::Config(e.to_string()))?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Status { chain } => {
            run_status(config, chain).await?;
        }
        Commands::Connect => {
            run_connect(config).await?;
        }
        Commands::Watch { chain } => {
            run_watch(config, chain).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config).unwrap());
        }
    }

    Ok(())
}

fn provider_manager_for(config: &Config, chain: &str) -> Result<ProviderConnectionManager> {
    let chain_id = config
        .chain_id
        .or_else(|| RpcConfig::chain_id_by_name(chain))
        .ok_or_else(|| timelock_courier::Error::Config(format!("Unknown chain: {}", chain)))?;

    let rpc = RpcConfig::from_env();
    let url = rpc
        .get(chain_id)
        .ok_or_else(|| timelock_courier::Error::Config(format!("No RPC for chain {}", chain_id)))?
        .parse()
        .map_err(|e| timelock_courier::Error::Config(format!("Invalid RPC URL: {}", e)))?;

    Ok(ProviderConnectionManager::new(url))
}

/// Build the wallet manager with whatever extensions the environment offers.
fn wallet_manager_for(config: &Config) -> WalletConnectionManager {
    use timelock_courier::extension::{ExtensionDiscovery, LocalKeyExtension};

    let discovery = ExtensionDiscovery::new(config.wallet.clone());
    match LocalKeyExtension::from_env(PRIVATE_KEY_ENV) {
        Ok(extension) => {
            tracing::info!(address = %extension.address(), "Loaded local keystore from PRIVATE_KEY");
            discovery.register(Arc::new(extension));
        }
        Err(e) => {
            tracing::warn!(error = %e, "No local keystore available");
        }
    }

    WalletConnectionManager::new(discovery, config.wallet.clone())
}

async fn run_status(config: Config, chain: String) -> Result<()> {
    let prober = HttpProber::new(&config.network);
    match prober.check().await {
        Ok(()) => println!("Network reachability: OK ({})", config.network.probe_url),
        Err(e) => println!("Network reachability: FAILED ({})", e),
    }

    let provider_manager = provider_manager_for(&config, &chain)?;
    match provider_manager.get_provider().await {
        Ok(_) => println!("RPC endpoint ({}): OK", chain),
        Err(e) => println!("RPC endpoint ({}): FAILED ({})", chain, e),
    }
    provider_manager.disconnect();

    Ok(())
}

async fn run_connect(config: Config) -> Result<()> {
    let manager = wallet_manager_for(&config);

    match manager.connect().await {
        Ok(()) => {
            let snapshot = manager.snapshot();
            println!(
                "Connected via {}",
                snapshot.provider_id.as_deref().unwrap_or("unknown")
            );
            for account in &snapshot.accounts {
                let marker = if snapshot.selected.as_ref() == Some(account) {
                    "*"
                } else {
                    " "
                };
                println!("  {} {} ({})", marker, account.address, account.display_name);
            }
            manager.disconnect();
            Ok(())
        }
        Err(timelock_courier::Error::NotFound) => {
            println!("No wallet available. Set PRIVATE_KEY or install a wallet extension.");
            Err(timelock_courier::Error::NotFound)
        }
        Err(e) => Err(e),
    }
}

async fn run_watch(config: Config, chain: String) -> Result<()> {
    use timelock_courier::wallet::HealthMonitor;

    let signals = HostSignals::new();
    let wallet = wallet_manager_for(&config);
    let provider_manager = provider_manager_for(&config, &chain)?;

    wallet.add_listener(|snapshot| {
        tracing::info!(
            state = ?snapshot.state,
            accounts = snapshot.accounts.len(),
            selected = ?snapshot.selected.as_ref().map(|a| a.address),
            "Wallet state"
        );
    });
    provider_manager.add_connection_listener(|connected| {
        tracing::info!(connected, "RPC state");
    });

    if let Err(e) = wallet.connect().await {
        tracing::warn!(error = %e, "Wallet connect failed; watching anyway");
    }
    if let Err(e) = provider_manager.get_provider().await {
        tracing::warn!(error = %e, "RPC setup failed; watching anyway");
    }

    let health = HealthMonitor::spawn(wallet.clone(), signals.visibility(), config.health);
    let network = NetworkStatusMonitor::spawn(
        Arc::new(HttpProber::new(&config.network)),
        config.network.clone(),
        signals.online(),
        signals.visibility(),
    );

    let mut network_status = network.status();
    let watch_network = tokio::spawn(async move {
        while network_status.changed().await.is_ok() {
            let status = network_status.borrow().clone();
            tracing::info!(
                is_online = status.is_online,
                is_connecting = status.is_connecting,
                "Network status"
            );
        }
    });

    tracing::info!("Watching connection state; press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| timelock_courier::Error::Config(e.to_string()))?;

    // One teardown path for everything that holds a timer or transport
    health.shutdown();
    network.shutdown();
    watch_network.abort();
    wallet.disconnect();
    provider_manager.disconnect();

    Ok(())
}
