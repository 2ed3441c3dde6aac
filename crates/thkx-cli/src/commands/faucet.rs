// crates/thkx-cli/src/commands/faucet.rs
//
// `thkx faucet {claim, settings, fund, status}` — faucet operations.

use clap::Subcommand;

use thkx_ledger::Operation;

use super::info::format_timestamp;
use super::{parse_amount, Ctx};

/// Faucet subcommands.
#[derive(Debug, Subcommand)]
pub enum FaucetCmd {
    /// Request tokens from the faucet (cooldown-gated per address).
    Claim,
    /// Owner-only: update claim amount and cooldown atomically.
    Settings {
        /// New claim amount in THKX.
        claim_amount: String,
        /// New cooldown in seconds.
        cooldown_secs: u64,
    },
    /// Move THKX from the caller into the faucet's balance.
    Fund {
        /// Amount in THKX.
        amount: String,
    },
    /// Show faucet settings and the caller's cooldown state.
    Status,
}

/// Run the faucet subcommand.
pub fn run(ctx: &mut Ctx, cmd: &FaucetCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        FaucetCmd::Claim => {
            println!("Requesting tokens from the faucet...");
            ctx.commit(Operation::ClaimTokens {
                caller: ctx.caller,
                now: ctx.now,
            })?;
            println!("Tokens successfully claimed!");
            println!("Balance: {}", ctx.ledger.balance_of(ctx.caller));
        }
        FaucetCmd::Settings {
            claim_amount,
            cooldown_secs,
        } => {
            let claim_amount = parse_amount(claim_amount)?;
            ctx.commit(Operation::SetFaucetSettings {
                caller: ctx.caller,
                claim_amount: claim_amount.wei,
                claim_cooldown_secs: *cooldown_secs,
            })?;
            println!("Claim amount updated to: {}", claim_amount);
            println!("Claim cooldown updated to: {} seconds", cooldown_secs);
        }
        FaucetCmd::Fund { amount } => {
            let amount = parse_amount(amount)?;
            println!("Funding faucet with {}...", amount);
            ctx.commit(Operation::FundFaucet {
                caller: ctx.caller,
                amount: amount.wei,
            })?;
            println!("Faucet funded successfully!");
        }
        FaucetCmd::Status => {
            println!("Claim amount: {}", ctx.ledger.claim_amount());
            println!("Claim cooldown: {} seconds", ctx.ledger.claim_cooldown());
            match ctx.ledger.last_claimed(ctx.caller) {
                Some(last) => {
                    let unlock = last.saturating_add(ctx.ledger.claim_cooldown());
                    println!("Last claimed: {}", format_timestamp(last));
                    if ctx.now < unlock {
                        println!("Next claim: {}", format_timestamp(unlock));
                    } else {
                        println!("Next claim: available now");
                    }
                }
                None => println!("Last claimed: never"),
            }
        }
    }
    Ok(())
}
