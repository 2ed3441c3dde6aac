// crates/thkx-cli/src/commands/mod.rs
//
// Shared command context and amount parsing for the THKX CLI.

pub mod faucet;
pub mod governance;
pub mod info;
pub mod stake;
pub mod token;
pub mod treasury;

use thkx_core::{Address, Thkx, WEI_PER_THKX};
use thkx_ledger::{Operation, ThkxLedger};
use thkx_store::LedgerStore;

/// Everything a command needs: the loaded ledger, its store, the
/// authenticated caller, and the wall-clock `now` captured at startup.
pub struct Ctx {
    pub store: LedgerStore,
    pub ledger: ThkxLedger,
    pub caller: Address,
    pub now: u64,
}

impl Ctx {
    /// Apply an operation and journal it.
    pub fn commit(&mut self, op: Operation) -> Result<(), Box<dyn std::error::Error>> {
        match self.store.commit(&mut self.ledger, &op) {
            Ok(()) => {
                tracing::info!("Committed operation: {:?}", op);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Operation rejected: {}", e);
                Err(e.into())
            }
        }
    }
}

/// Parse a decimal THKX amount ("50", "1.5", "0.000000000000000001")
/// into wei, the way the original scripts used `parseUnits(x, 18)`.
pub fn parse_amount(s: &str) -> Result<Thkx, String> {
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(format!("invalid amount: {s:?}"));
    }
    if frac.len() > 18 {
        return Err(format!("amount {s:?} has more than 18 decimal places"));
    }
    let whole_part: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| format!("invalid amount: {s:?}"))?
    };
    let frac_part: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<18}");
        padded.parse().map_err(|_| format!("invalid amount: {s:?}"))?
    };
    let wei = whole_part
        .checked_mul(WEI_PER_THKX)
        .and_then(|w| w.checked_add(frac_part))
        .ok_or_else(|| format!("amount {s:?} is out of range"))?;
    Ok(Thkx::from_wei(wei))
}
