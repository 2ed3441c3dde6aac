// crates/thkx-ledger/src/treasury.rs
//
// Reward-pool treasury: owner deposits and capped, cooldown-gated owner
// withdrawals.
//
// Both operations stay available while the system is paused — replenishing
// or draining the pool is an operational action, not a staker path. The
// withdrawal cap is recomputed against the pool balance at call time, never
// against a historical snapshot.

use serde::{Deserialize, Serialize};

use thkx_core::amount::mul_div;
use thkx_core::{Address, LedgerError, Thkx};

use crate::state::{GlobalState, BPS_DENOMINATOR};
use crate::token::TokenLedger;

/// Custody and flow control for the reward pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardPoolTreasury {
    /// Token-ledger address holding the pool (shared with staked principal).
    vault: Address,
}

impl RewardPoolTreasury {
    /// Create a treasury custodied by `vault`.
    pub fn new(vault: Address) -> Self {
        Self { vault }
    }

    /// Current per-call withdrawal cap: `withdrawal_cap_bps` of the pool
    /// balance right now.
    pub fn withdrawal_cap(&self, global: &GlobalState) -> Result<Thkx, LedgerError> {
        mul_div(
            global.reward_pool.wei,
            global.policy.withdrawal_cap_bps,
            BPS_DENOMINATOR,
        )
        .map(Thkx::from_wei)
    }

    /// Earliest time the next owner withdrawal can succeed.
    pub fn next_withdrawal_at(&self, global: &GlobalState) -> u64 {
        global
            .last_owner_withdrawal
            .saturating_add(global.policy.withdrawal_cooldown_secs)
    }

    /// Deposit `amount` from the (pre-authenticated) owner into the pool.
    /// Allowed regardless of pause state.
    ///
    /// # Errors
    /// `InvalidAmount` (zero), `InsufficientBalance` if the owner lacks
    /// funds, `Overflow`.
    pub fn deposit(
        &self,
        token: &mut TokenLedger,
        global: &mut GlobalState,
        owner: Address,
        amount: Thkx,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount("deposit of zero".to_string()));
        }
        let new_pool = global.reward_pool.checked_add(amount)?;
        token.transfer(owner, self.vault, amount)?;
        global.reward_pool = new_pool;
        Ok(())
    }

    /// Withdraw `amount` from the pool to the owner. Two independent gates,
    /// both enforced regardless of pause state:
    /// 1. `amount` must not exceed `withdrawal_cap_bps` (20% by default) of
    ///    the pool at call time — `WithdrawalLimitExceeded` carries the cap.
    /// 2. A full cooldown (30 days by default) must have elapsed since the
    ///    last withdrawal — `CooldownActive` carries the unlock time.
    pub fn withdraw(
        &self,
        token: &mut TokenLedger,
        global: &mut GlobalState,
        owner: Address,
        amount: Thkx,
        now: u64,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount("withdrawal of zero".to_string()));
        }
        let cap = self.withdrawal_cap(global)?;
        if amount.wei > cap.wei {
            return Err(LedgerError::WithdrawalLimitExceeded {
                requested: amount.wei,
                cap: cap.wei,
            });
        }
        let unlock_at = self.next_withdrawal_at(global);
        if now < unlock_at {
            return Err(LedgerError::CooldownActive { unlock_at });
        }

        let new_pool = global.reward_pool.checked_sub(amount)?;
        token.transfer(self.vault, owner, amount)?;
        global.reward_pool = new_pool;
        global.last_owner_withdrawal = now;
        Ok(())
    }
}
