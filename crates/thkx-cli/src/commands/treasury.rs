// crates/thkx-cli/src/commands/treasury.rs
//
// `thkx treasury {deposit, withdraw, status}` — reward-pool management
// (owner-only for the mutating calls).

use clap::Subcommand;

use thkx_ledger::Operation;

use super::info::format_timestamp;
use super::{parse_amount, Ctx};

/// Treasury subcommands.
#[derive(Debug, Subcommand)]
pub enum TreasuryCmd {
    /// Deposit THKX from the owner into the reward pool.
    Deposit {
        /// Amount in THKX (decimals allowed).
        amount: String,
    },
    /// Withdraw THKX from the reward pool (capped, cooldown-gated).
    Withdraw {
        /// Amount in THKX.
        amount: String,
    },
    /// Show pool balance, current cap, and the next withdrawal window.
    Status,
}

/// Run the treasury subcommand.
pub fn run(ctx: &mut Ctx, cmd: &TreasuryCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TreasuryCmd::Deposit { amount } => {
            let amount = parse_amount(amount)?;
            println!("Depositing {} to the reward pool...", amount);
            ctx.commit(Operation::DepositRewards {
                caller: ctx.caller,
                amount: amount.wei,
            })?;
            println!("Deposit successful");
            println!("Updated Reward Pool: {}", ctx.ledger.reward_pool());
        }
        TreasuryCmd::Withdraw { amount } => {
            let amount = parse_amount(amount)?;
            println!("Withdrawing {} from the reward pool...", amount);
            ctx.commit(Operation::WithdrawRewards {
                caller: ctx.caller,
                amount: amount.wei,
                now: ctx.now,
            })?;
            println!("Withdrawal successful");
            println!("Updated Reward Pool: {}", ctx.ledger.reward_pool());
        }
        TreasuryCmd::Status => {
            let global = ctx.ledger.global();
            let cap_bps = global.policy.withdrawal_cap_bps;
            let cap_wei = global.reward_pool.wei * cap_bps / 10_000;
            let unlock = global
                .last_owner_withdrawal
                .saturating_add(global.policy.withdrawal_cooldown_secs);
            println!("Reward Pool: {}", global.reward_pool);
            println!(
                "Withdrawal cap ({}%): {}",
                cap_bps / 100,
                thkx_core::Thkx::from_wei(cap_wei)
            );
            if ctx.now < unlock {
                println!("Next withdrawal window: {}", format_timestamp(unlock));
            } else {
                println!("Withdrawal window: open");
            }
        }
    }
    Ok(())
}
