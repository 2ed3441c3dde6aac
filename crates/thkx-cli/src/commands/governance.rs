// crates/thkx-cli/src/commands/governance.rs
//
// `thkx rate {propose, execute, status}` — timelocked reward-rate
// governance (owner-only for the mutating calls).

use clap::Subcommand;

use thkx_ledger::Operation;

use super::info::format_timestamp;
use super::Ctx;

/// Rate-governance subcommands.
#[derive(Debug, Subcommand)]
pub enum RateCmd {
    /// Propose a new reward rate; executable after the timelock delay.
    Propose {
        /// New rate (annualized basis points).
        rate: u128,
    },
    /// Execute a previously proposed rate (must match exactly).
    Execute {
        /// Rate to execute.
        rate: u128,
    },
    /// Show the pending proposal, if any.
    Status,
}

/// Run the rate subcommand.
pub fn run(ctx: &mut Ctx, cmd: &RateCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        RateCmd::Propose { rate } => {
            ctx.commit(Operation::ProposeRewardRate {
                caller: ctx.caller,
                new_rate: *rate,
                now: ctx.now,
            })?;
            // Committed above, so the proposal is on record.
            if let Some(p) = ctx.ledger.rate_proposal() {
                println!("Proposed reward rate {}", p.proposed_rate);
                println!("Executable at: {}", format_timestamp(p.min_executable_at));
            }
        }
        RateCmd::Execute { rate } => {
            ctx.commit(Operation::ExecuteRewardRate {
                caller: ctx.caller,
                new_rate: *rate,
                now: ctx.now,
            })?;
            println!("Reward rate updated to {}", rate);
        }
        RateCmd::Status => match ctx.ledger.rate_proposal() {
            Some(p) => {
                println!("Pending proposal: rate {}", p.proposed_rate);
                println!("Proposed at:   {}", format_timestamp(p.proposed_at));
                println!("Executable at: {}", format_timestamp(p.min_executable_at));
                println!(
                    "Executable now: {}",
                    ctx.ledger.is_rate_executable(ctx.now)
                );
            }
            None => println!("No pending rate proposal"),
        },
    }
    Ok(())
}
