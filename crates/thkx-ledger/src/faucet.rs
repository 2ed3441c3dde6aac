// crates/thkx-ledger/src/faucet.rs
//
// Cooldown-gated faucet: a fixed amount per address per cooldown window,
// paid from the faucet's own token balance.
//
// The faucet is independent of the staking machinery; it only touches the
// token ledger and the pause guard. Settings changes are atomic and take
// effect for subsequent claims only — past `last_claimed` stamps are never
// rescaled.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use thkx_core::{Address, LedgerError, Thkx};

use crate::state::GlobalState;
use crate::token::TokenLedger;

/// The faucet distributor state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetDistributor {
    /// Token-ledger address holding the faucet's disbursable balance.
    address: Address,
    /// Amount paid per successful claim.
    claim_amount: Thkx,
    /// Seconds an address must wait between claims.
    claim_cooldown_secs: u64,
    /// Last successful claim time per address.
    last_claimed: HashMap<Address, u64>,
}

impl FaucetDistributor {
    /// Create a faucet custodied by `address`.
    pub fn new(address: Address, claim_amount: Thkx, claim_cooldown_secs: u64) -> Self {
        Self {
            address,
            claim_amount,
            claim_cooldown_secs,
            last_claimed: HashMap::new(),
        }
    }

    /// The faucet's own custody address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current per-claim amount.
    pub fn claim_amount(&self) -> Thkx {
        self.claim_amount
    }

    /// Current claim cooldown in seconds.
    pub fn claim_cooldown(&self) -> u64 {
        self.claim_cooldown_secs
    }

    /// Last successful claim time for `address`, if it ever claimed.
    pub fn last_claimed(&self, address: Address) -> Option<u64> {
        self.last_claimed.get(&address).copied()
    }

    /// Pay `claim_amount` to `caller` if its cooldown window has passed.
    ///
    /// # Errors
    /// - `SystemPaused` while the pause guard is engaged.
    /// - `CooldownActive` carrying the unlock time of the next claim.
    /// - `InsufficientFaucetBalance` if the faucet cannot cover the claim.
    pub fn claim(
        &mut self,
        token: &mut TokenLedger,
        global: &GlobalState,
        caller: Address,
        now: u64,
    ) -> Result<Thkx, LedgerError> {
        if global.paused {
            return Err(LedgerError::SystemPaused);
        }
        if let Some(&last) = self.last_claimed.get(&caller) {
            let unlock_at = last.saturating_add(self.claim_cooldown_secs);
            if now < unlock_at {
                return Err(LedgerError::CooldownActive { unlock_at });
            }
        }
        let balance = token.balance_of(self.address);
        if self.claim_amount.wei > balance.wei {
            return Err(LedgerError::InsufficientFaucetBalance {
                requested: self.claim_amount.wei,
                available: balance.wei,
            });
        }

        token.transfer(self.address, caller, self.claim_amount)?;
        self.last_claimed.insert(caller, now);
        Ok(self.claim_amount)
    }

    /// Update claim amount and cooldown atomically. Owner-gated by the
    /// facade; allowed while paused.
    ///
    /// # Errors
    /// `InvalidAmount` if the claim amount is zero.
    pub fn set_settings(
        &mut self,
        claim_amount: Thkx,
        claim_cooldown_secs: u64,
    ) -> Result<(), LedgerError> {
        if claim_amount.is_zero() {
            return Err(LedgerError::InvalidAmount(
                "faucet claim amount of zero".to_string(),
            ));
        }
        self.claim_amount = claim_amount;
        self.claim_cooldown_secs = claim_cooldown_secs;
        Ok(())
    }

    /// Move `amount` from `from` into the faucet's balance.
    pub fn fund(
        &self,
        token: &mut TokenLedger,
        from: Address,
        amount: Thkx,
    ) -> Result<(), LedgerError> {
        token.transfer(from, self.address, amount)
    }
}
