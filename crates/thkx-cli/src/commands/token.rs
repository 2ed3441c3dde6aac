// crates/thkx-cli/src/commands/token.rs
//
// `thkx token {mint, transfer, approve, allowance}` — plain token moves.

use std::str::FromStr;

use clap::Subcommand;

use thkx_core::Address;
use thkx_ledger::Operation;

use super::{parse_amount, Ctx};

/// Token subcommands.
#[derive(Debug, Subcommand)]
pub enum TokenCmd {
    /// Mint new THKX supply (owner-only).
    Mint {
        /// Recipient address (hex).
        to: String,
        /// Amount in THKX (decimals allowed).
        amount: String,
    },
    /// Transfer THKX from the caller.
    Transfer {
        /// Recipient address (hex).
        to: String,
        /// Amount in THKX.
        amount: String,
    },
    /// Approve a spender over the caller's balance.
    Approve {
        /// Spender address (hex).
        spender: String,
        /// Amount in THKX.
        amount: String,
    },
    /// Show the remaining allowance between two addresses.
    Allowance {
        /// Balance owner (hex).
        owner: String,
        /// Approved spender (hex).
        spender: String,
    },
}

/// Run the token subcommand.
pub fn run(ctx: &mut Ctx, cmd: &TokenCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TokenCmd::Mint { to, amount } => {
            let to = Address::from_str(to)?;
            let amount = parse_amount(amount)?;
            ctx.commit(Operation::Mint {
                caller: ctx.caller,
                to,
                amount: amount.wei,
            })?;
            println!("Minted {} to {}", amount, to);
            println!("Total supply: {}", ctx.ledger.total_supply());
        }
        TokenCmd::Transfer { to, amount } => {
            let to = Address::from_str(to)?;
            let amount = parse_amount(amount)?;
            ctx.commit(Operation::Transfer {
                caller: ctx.caller,
                to,
                amount: amount.wei,
            })?;
            println!("Transferred {} to {}", amount, to);
        }
        TokenCmd::Approve { spender, amount } => {
            let spender = Address::from_str(spender)?;
            let amount = parse_amount(amount)?;
            ctx.commit(Operation::Approve {
                caller: ctx.caller,
                spender,
                amount: amount.wei,
            })?;
            println!("Allowance set: {} may spend {}", spender, amount);
        }
        TokenCmd::Allowance { owner, spender } => {
            let owner = Address::from_str(owner)?;
            let spender = Address::from_str(spender)?;
            println!("Allowance: {}", ctx.ledger.allowance_of(owner, spender));
        }
    }
    Ok(())
}
