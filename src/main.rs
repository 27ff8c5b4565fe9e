//! Deposit Verifier - Entry Point
//!
//! One-shot operator commands over the configured assets. Each
//! invocation performs its lookups once and prints JSON on stdout;
//! logs go to stderr.
//!
//! Wiring sequence:
//! 1. Parse CLI
//! 2. Load .env + config.toml, validate
//! 3. Init tracing (JSON structured logging)
//! 4. Build the asset catalog (shared RPC registry, HTTP client, ABIs)
//! 5. Run the subcommand

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use deposit_verifier::adapters::assets::{AssetCatalog, ConfiguredAsset, EvmAsset};
use deposit_verifier::config::loader::load_config;
use deposit_verifier::ports::AssetAdapter;
use deposit_verifier::usecases::DepositDesk;

/// Multi-chain deposit verifier: wallets, quotes and balance checks.
#[derive(Parser)]
#[command(name = "deposit-verifier", version, about)]
struct Cli {
    /// Path to config.toml.
    #[arg(long, short, env = "DEPOSIT_VERIFIER_CONFIG", default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured assets.
    Assets,

    /// Open a deposit: fresh wallet plus the token amount covering a USD price.
    Quote {
        /// Asset index or SYMBOL@NETWORK (e.g. "USDT@TRON").
        #[arg(long)]
        asset: String,

        /// Price to collect, in USD.
        #[arg(long)]
        usd: Decimal,
    },

    /// Whole-token balance of an address.
    Balance {
        #[arg(long)]
        asset: String,

        #[arg(long)]
        address: String,
    },

    /// Check an address against a required token amount.
    Check {
        #[arg(long)]
        asset: String,

        #[arg(long)]
        address: String,

        /// Required amount in whole tokens.
        #[arg(long)]
        required: Decimal,
    },

    /// USD price of one token.
    Price {
        #[arg(long)]
        asset: String,
    },

    /// First block at or after a unix timestamp (EVM assets only).
    BlockAt {
        #[arg(long)]
        asset: String,

        /// Unix seconds.
        #[arg(long)]
        timestamp: u64,
    },

    /// Token transfers to an address in one transaction (EVM assets only).
    Transfers {
        #[arg(long)]
        asset: String,

        /// Transaction hash (0x...).
        #[arg(long)]
        tx: String,

        /// Recipient address.
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Load configuration from config.toml ──────────────
    let config = load_config(&cli.config).context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.service.log_level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        assets = config.assets.len(),
        "Starting deposit verifier"
    );

    // ── 3. Build every configured asset ─────────────────────
    let catalog = AssetCatalog::from_config(&config).context("Failed to build asset catalog")?;
    let desk = DepositDesk::new();

    // ── 4. Run the requested command ────────────────────────
    match cli.command {
        Commands::Assets => {
            let listing: Vec<_> = catalog
                .iter()
                .enumerate()
                .map(|(index, asset)| json!({ "index": index, "key": asset.key(), "token": asset.identity() }))
                .collect();
            print_json(&listing)
        }
        Commands::Quote { asset, usd } => {
            let asset = select(&catalog, &asset)?.adapter();
            let quote = desk.open(asset.as_ref(), usd).await?;
            print_json(&quote)
        }
        Commands::Balance { asset, address } => {
            let asset = select(&catalog, &asset)?.adapter();
            let balance = asset.get_balance(&address).await?;
            print_json(&json!({ "asset": asset.identity(), "address": address, "balance": balance }))
        }
        Commands::Check {
            asset,
            address,
            required,
        } => {
            let asset = select(&catalog, &asset)?.adapter();
            let check = desk.check_balance(asset.as_ref(), &address, required).await?;
            print_json(&check)
        }
        Commands::Price { asset } => {
            let asset = select(&catalog, &asset)?.adapter();
            let price = asset.price_usd().await?;
            print_json(&json!({ "asset": asset.identity(), "price_usd": price }))
        }
        Commands::BlockAt { asset, timestamp } => {
            let resolver = select_evm(&catalog, &asset)?.block_resolver().await?;
            let lookup = resolver.block_at_timestamp(timestamp).await?;
            print_json(&lookup)
        }
        Commands::Transfers { asset, tx, to } => {
            let amounts = select_evm(&catalog, &asset)?.transfers_to(&tx, &to).await?;
            print_json(&json!({ "tx": tx, "to": to, "amounts": amounts }))
        }
    }
}

fn select<'a>(catalog: &'a AssetCatalog, selector: &str) -> Result<&'a ConfiguredAsset> {
    catalog
        .find(selector)
        .with_context(|| format!("No asset matches {selector:?} (see `deposit-verifier assets`)"))
}

fn select_evm<'a>(catalog: &'a AssetCatalog, selector: &str) -> Result<&'a EvmAsset> {
    select(catalog, selector)?
        .as_evm()
        .with_context(|| format!("{selector} is not an EVM asset"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}
