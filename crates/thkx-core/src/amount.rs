// crates/thkx-core/src/amount.rs
//
// THKX token amount type and fixed-point constants.
//
// The smallest unit of THKX is the "wei". 1 THKX = 10^18 wei.
// All internal accounting uses integer wei to avoid floating-point
// precision issues in economic calculations. Arithmetic is checked:
// overflow surfaces as `LedgerError::Overflow` rather than wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LedgerError;

/// Number of wei in one THKX. 1 THKX = 10^18 wei.
pub const WEI_PER_THKX: u128 = 1_000_000_000_000_000_000;

/// Type alias for wei — the smallest unit of THKX.
pub type Wei = u128;

/// A THKX token amount.
///
/// Wraps an amount in wei (the smallest denomination).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Thkx {
    /// Amount in wei (1 THKX = 10^18 wei).
    pub wei: Wei,
}

impl Thkx {
    /// Create an amount from a whole number of THKX.
    pub fn from_whole(amount: u64) -> Self {
        Self {
            wei: amount as u128 * WEI_PER_THKX,
        }
    }

    /// Create an amount from a wei value.
    pub fn from_wei(wei: Wei) -> Self {
        Self { wei }
    }

    /// Returns zero THKX.
    pub fn zero() -> Self {
        Self { wei: 0 }
    }

    /// True if the amount is zero wei.
    pub fn is_zero(&self) -> bool {
        self.wei == 0
    }

    /// Checked addition. Fails with `Overflow` on u128 overflow.
    pub fn checked_add(self, rhs: Thkx) -> Result<Thkx, LedgerError> {
        self.wei
            .checked_add(rhs.wei)
            .map(Thkx::from_wei)
            .ok_or(LedgerError::Overflow)
    }

    /// Checked subtraction. Fails with `Overflow` on underflow.
    pub fn checked_sub(self, rhs: Thkx) -> Result<Thkx, LedgerError> {
        self.wei
            .checked_sub(rhs.wei)
            .map(Thkx::from_wei)
            .ok_or(LedgerError::Overflow)
    }
}

impl fmt::Display for Thkx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.wei / WEI_PER_THKX;
        let frac = self.wei % WEI_PER_THKX;
        if frac == 0 {
            write!(f, "{} THKX", whole)
        } else {
            // Display up to 18 decimal places, trimming trailing zeros
            let frac_str = format!("{:018}", frac);
            let trimmed = frac_str.trim_end_matches('0');
            write!(f, "{}.{} THKX", whole, trimmed)
        }
    }
}

/// Checked `value * numerator / denominator` over wei amounts.
///
/// Used for basis-point fees and percentage caps. The intermediate product
/// is checked; a zero denominator or u128 overflow fails with `Overflow`.
pub fn mul_div(value: Wei, numerator: u128, denominator: u128) -> Result<Wei, LedgerError> {
    if denominator == 0 {
        return Err(LedgerError::Overflow);
    }
    value
        .checked_mul(numerator)
        .map(|p| p / denominator)
        .ok_or(LedgerError::Overflow)
}
