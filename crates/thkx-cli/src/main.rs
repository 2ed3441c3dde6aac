// crates/thkx-cli/src/main.rs
//
// CLI entrypoint for the THKX ledger tools.
//
// Provides subcommands for initializing a ledger, moving tokens,
// staking, governing the reward rate, operating the faucet, and
// inspecting state.

mod commands;
mod config;

use std::str::FromStr;

use clap::{Parser, Subcommand};

use commands::faucet::FaucetCmd;
use commands::governance::RateCmd;
use commands::stake::StakeCmd;
use commands::token::TokenCmd;
use commands::treasury::TreasuryCmd;
use commands::{parse_amount, Ctx};
use config::CliConfig;

use thkx_core::Address;
use thkx_ledger::{Operation, ThkxLedger};
use thkx_store::LedgerStore;

/// THKX ledger CLI — token, staking, governance, and faucet operations.
#[derive(Parser, Debug)]
#[command(
    name = "thkx",
    version = "0.1.0",
    about = "THKX ledger CLI — staking, governance, and faucet operations"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.thkx/config.toml")]
    config: String,

    /// Caller address (hex); overrides the configured default.
    #[arg(long = "as", global = true, value_name = "ADDRESS")]
    caller: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Initialize a new ledger with an owner and genesis supply.
    Init {
        /// Owner address (hex).
        owner: String,
        /// Genesis supply minted to the owner, in THKX.
        #[arg(long, default_value = "700000000")]
        supply: String,
    },

    /// Display the contract summary.
    Info,

    /// Show a balance (defaults to the caller).
    Balance {
        /// Account address (hex).
        address: Option<String>,
    },

    /// Token management: mint, transfer, approve, allowance.
    #[command(subcommand)]
    Token(TokenCmd),

    /// Staking management: add, remove, claim, auto-compound, info.
    #[command(subcommand)]
    Stake(StakeCmd),

    /// Reward-pool management: deposit, withdraw, status.
    #[command(subcommand)]
    Treasury(TreasuryCmd),

    /// Reward-rate governance: propose, execute, status.
    #[command(subcommand)]
    Rate(RateCmd),

    /// Faucet operations: claim, settings, fund, status.
    #[command(subcommand)]
    Faucet(FaucetCmd),

    /// Pause all non-emergency operations (owner-only).
    Pause,

    /// Resume normal operation (owner-only).
    Unpause,

    /// Fold the journal into the snapshot.
    Compact,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = CliConfig::load(&cli.config)?;
    let store = LedgerStore::open(cfg.data_path())?;
    let now = chrono::Utc::now().timestamp() as u64;

    if let Commands::Init { owner, supply } = &cli.command {
        if store.is_initialized() {
            return Err("ledger already initialized; remove the data directory first".into());
        }
        let owner = Address::from_str(owner)?;
        let supply = parse_amount(supply)?;
        let mut ledger = ThkxLedger::new(owner, cfg.ledger.clone(), now);
        ledger.mint(owner, owner, supply)?;
        store.initialize(&ledger)?;
        tracing::info!(
            "Initialized ledger at {} with genesis supply {}",
            cfg.data_path().display(),
            supply
        );
        println!("Ledger initialized");
        println!("Owner: {}", owner);
        println!("Genesis supply: {}", supply);
        return Ok(());
    }

    let ledger = store.load()?;
    let caller = match cli.caller.as_deref().or(cfg.caller.as_deref()) {
        Some(s) => Address::from_str(s)?,
        None => ledger.owner(),
    };
    let mut ctx = Ctx {
        store,
        ledger,
        caller,
        now,
    };

    match &cli.command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Info => commands::info::run(&ctx)?,
        Commands::Balance { address } => {
            let address = match address {
                Some(s) => Address::from_str(s)?,
                None => ctx.caller,
            };
            println!("Balance of {}: {}", address, ctx.ledger.balance_of(address));
        }
        Commands::Token(cmd) => commands::token::run(&mut ctx, cmd)?,
        Commands::Stake(cmd) => commands::stake::run(&mut ctx, cmd)?,
        Commands::Treasury(cmd) => commands::treasury::run(&mut ctx, cmd)?,
        Commands::Rate(cmd) => commands::governance::run(&mut ctx, cmd)?,
        Commands::Faucet(cmd) => commands::faucet::run(&mut ctx, cmd)?,
        Commands::Pause => {
            ctx.commit(Operation::Pause { caller: ctx.caller })?;
            println!("Ledger paused");
        }
        Commands::Unpause => {
            ctx.commit(Operation::Unpause { caller: ctx.caller })?;
            println!("Ledger resumed");
        }
        Commands::Compact => {
            ctx.store.compact(&ctx.ledger)?;
            tracing::info!("Journal folded into snapshot");
            println!("Journal compacted into snapshot");
        }
    }

    Ok(())
}
