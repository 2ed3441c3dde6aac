// crates/thkx-cli/src/commands/stake.rs
//
// `thkx stake {add, remove, claim, auto-compound, emergency, info}` —
// staking management commands.

use std::str::FromStr;

use clap::Subcommand;

use thkx_core::Address;
use thkx_ledger::Operation;

use super::info::format_timestamp;
use super::{parse_amount, Ctx};

/// Staking subcommands.
#[derive(Debug, Subcommand)]
pub enum StakeCmd {
    /// Stake THKX from the caller's balance.
    Add {
        /// Amount in THKX (decimals allowed).
        amount: String,
    },
    /// Unstake THKX; pays principal (minus any early fee) plus rewards.
    Remove {
        /// Amount in THKX.
        amount: String,
    },
    /// Settle and pay out accumulated rewards without unstaking.
    Claim,
    /// Toggle auto-compounding of settled rewards.
    AutoCompound {
        /// true to reinvest rewards into the principal, false to accrue.
        enabled: bool,
    },
    /// Owner-only: zero a position and return its raw principal.
    Emergency {
        /// Target account (hex).
        target: String,
    },
    /// Show the stake position for an address (defaults to the caller).
    Info {
        /// Account address (hex).
        address: Option<String>,
    },
}

/// Run the stake subcommand.
pub fn run(ctx: &mut Ctx, cmd: &StakeCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        StakeCmd::Add { amount } => {
            let amount = parse_amount(amount)?;
            ctx.commit(Operation::Stake {
                caller: ctx.caller,
                amount: amount.wei,
                now: ctx.now,
            })?;
            println!("Staked {}", amount);
            println!("Total staked: {}", ctx.ledger.contract_info().total_staked);
        }
        StakeCmd::Remove { amount } => {
            let amount = parse_amount(amount)?;
            ctx.commit(Operation::Unstake {
                caller: ctx.caller,
                amount: amount.wei,
                now: ctx.now,
            })?;
            println!("Unstaked {}", amount);
            println!("Balance: {}", ctx.ledger.balance_of(ctx.caller));
        }
        StakeCmd::Claim => {
            ctx.commit(Operation::ClaimRewards {
                caller: ctx.caller,
                now: ctx.now,
            })?;
            println!("Rewards claimed");
            println!("Balance: {}", ctx.ledger.balance_of(ctx.caller));
        }
        StakeCmd::AutoCompound { enabled } => {
            ctx.commit(Operation::SetAutoCompound {
                caller: ctx.caller,
                enabled: *enabled,
            })?;
            println!(
                "Auto-compound {}",
                if *enabled { "enabled" } else { "disabled" }
            );
        }
        StakeCmd::Emergency { target } => {
            let target = Address::from_str(target)?;
            ctx.commit(Operation::EmergencyWithdraw {
                caller: ctx.caller,
                target,
            })?;
            println!("Emergency withdrawal completed for {}", target);
        }
        StakeCmd::Info { address } => {
            let address = match address {
                Some(s) => Address::from_str(s)?,
                None => ctx.caller,
            };
            match ctx.ledger.stake_info(address, ctx.now)? {
                Some(info) => {
                    println!("Stake position for {}", address);
                    println!("  Staked:         {}", info.amount);
                    println!("  Since:          {}", format_timestamp(info.stake_timestamp));
                    println!("  Accrued:        {}", info.accrued_rewards);
                    println!("  Pending reward: {}", info.pending_reward);
                    println!("  Auto-compound:  {}", info.auto_compound);
                }
                None => println!("No stake position for {}", address),
            }
        }
    }
    Ok(())
}
