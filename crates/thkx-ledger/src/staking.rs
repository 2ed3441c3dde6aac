// crates/thkx-ledger/src/staking.rs
//
// Stake positions and the stake/unstake/emergency-withdraw transitions.
//
// Staked principal is custodied by a dedicated vault address on the token
// ledger, so `vault balance == total_staked + reward_pool` holds at every
// observable state. Settlement order on every stake-affecting operation:
// validate, compute accrual (pure), then mutate — a returned error always
// means no state changed.
//
// The early-unstake fee applies only while the position age is below
// `fee_exempt_after_secs`; the default of zero waives it entirely. Fee
// proceeds are retained by the reward pool.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use thkx_core::amount::mul_div;
use thkx_core::{Address, LedgerError, Thkx};

use crate::accrual::{accrue, advance_halving};
use crate::state::{GlobalState, BPS_DENOMINATOR};
use crate::token::TokenLedger;

/// One account's stake position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakePosition {
    /// Staked principal in wei.
    pub amount: Thkx,
    /// Unix time of the last stake-affecting event (stake, unstake,
    /// settlement). Accrual is computed from this point.
    pub stake_timestamp: u64,
    /// Settled but unclaimed rewards in wei.
    pub accrued_rewards: Thkx,
    /// When set, settled rewards are reinvested into `amount` instead of
    /// accumulating in `accrued_rewards`.
    pub auto_compound: bool,
}

impl StakePosition {
    fn new(now: u64) -> Self {
        Self {
            amount: Thkx::zero(),
            stake_timestamp: now,
            accrued_rewards: Thkx::zero(),
            auto_compound: false,
        }
    }
}

/// Result of a successful unstake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakeReceipt {
    /// Principal returned to the caller (after fee).
    pub principal: Thkx,
    /// Early-unstake fee withheld into the reward pool.
    pub fee: Thkx,
    /// Settled reward paid out alongside the principal.
    pub reward: Thkx,
}

/// Outcome of settling a position's pending accrual, before mutation.
struct Settlement {
    /// Newly accrued reward for the elapsed window.
    reward: Thkx,
    /// Portion reinvested into the principal (auto-compound on).
    compounded: Thkx,
    /// Portion added to `accrued_rewards` (auto-compound off).
    accrued: Thkx,
}

fn compute_settlement(
    position: &StakePosition,
    global: &GlobalState,
    now: u64,
) -> Result<Settlement, LedgerError> {
    let reward = accrue(position.amount, position.stake_timestamp, global, now)?;
    if position.auto_compound {
        Ok(Settlement {
            reward,
            compounded: reward,
            accrued: Thkx::zero(),
        })
    } else {
        Ok(Settlement {
            reward,
            compounded: Thkx::zero(),
            accrued: reward,
        })
    }
}

/// Per-account stake positions and the transitions over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeLedger {
    /// Token-ledger address custodying staked principal and the reward pool.
    vault: Address,
    /// Stake positions keyed by account address.
    accounts: HashMap<Address, StakePosition>,
}

impl StakeLedger {
    /// Create an empty stake ledger custodied by `vault`.
    pub fn new(vault: Address) -> Self {
        Self {
            vault,
            accounts: HashMap::new(),
        }
    }

    /// The vault address holding staked principal and the reward pool.
    pub fn vault(&self) -> Address {
        self.vault
    }

    /// The stake position for `address`, if any.
    pub fn position(&self, address: Address) -> Option<&StakePosition> {
        self.accounts.get(&address)
    }

    /// All stake positions (for snapshots and invariant checks).
    pub fn positions(&self) -> &HashMap<Address, StakePosition> {
        &self.accounts
    }

    /// Reward the position would settle if touched at `now`, without
    /// mutating anything. Zero for unknown accounts.
    pub fn pending_reward(
        &self,
        global: &GlobalState,
        address: Address,
        now: u64,
    ) -> Result<Thkx, LedgerError> {
        match self.accounts.get(&address) {
            Some(pos) => accrue(pos.amount, pos.stake_timestamp, global, now),
            None => Ok(Thkx::zero()),
        }
    }

    /// Stake `amount` for `caller`.
    ///
    /// Settles any pending reward first, then moves `amount` from the
    /// caller's balance into the vault and updates the position, the global
    /// total, and the stakers count (on the zero→nonzero transition).
    ///
    /// # Errors
    /// `SystemPaused`, `InvalidAmount` (zero), `InsufficientBalance`
    /// (caller funds, or reward pool too small to auto-compound), `Overflow`.
    pub fn stake(
        &mut self,
        token: &mut TokenLedger,
        global: &mut GlobalState,
        caller: Address,
        amount: Thkx,
        now: u64,
    ) -> Result<(), LedgerError> {
        if global.paused {
            return Err(LedgerError::SystemPaused);
        }
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount("stake of zero".to_string()));
        }
        let balance = token.balance_of(caller);
        if amount.wei > balance.wei {
            return Err(LedgerError::InsufficientBalance {
                requested: amount.wei,
                available: balance.wei,
            });
        }

        let existing = self.accounts.get(&caller);
        let settlement = match existing {
            Some(pos) => compute_settlement(pos, global, now)?,
            None => Settlement {
                reward: Thkx::zero(),
                compounded: Thkx::zero(),
                accrued: Thkx::zero(),
            },
        };
        if settlement.compounded.wei > global.reward_pool.wei {
            return Err(LedgerError::InsufficientBalance {
                requested: settlement.compounded.wei,
                available: global.reward_pool.wei,
            });
        }

        // All preconditions hold; mutate.
        advance_halving(global, now);
        token.transfer(caller, self.vault, amount)?;

        let position = self.accounts.entry(caller).or_insert_with(|| StakePosition::new(now));
        let was_zero = position.amount.is_zero();
        position.amount = position
            .amount
            .checked_add(settlement.compounded)?
            .checked_add(amount)?;
        position.accrued_rewards = position.accrued_rewards.checked_add(settlement.accrued)?;
        position.stake_timestamp = now;

        global.reward_pool = global.reward_pool.checked_sub(settlement.compounded)?;
        global.total_staked = global
            .total_staked
            .checked_add(settlement.compounded)?
            .checked_add(amount)?;
        if was_zero {
            global.stakers_count += 1;
        }
        Ok(())
    }

    /// Unstake `amount` for `caller`, paying out principal (minus any
    /// early-unstake fee) plus the settled reward in one transfer.
    ///
    /// # Errors
    /// `SystemPaused`, `InvalidAmount` (zero), `NoStakePosition`,
    /// `InsufficientBalance` (amount above stake, or reward pool too small
    /// for the settled payout), `Overflow`.
    pub fn unstake(
        &mut self,
        token: &mut TokenLedger,
        global: &mut GlobalState,
        caller: Address,
        amount: Thkx,
        now: u64,
    ) -> Result<UnstakeReceipt, LedgerError> {
        if global.paused {
            return Err(LedgerError::SystemPaused);
        }
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount("unstake of zero".to_string()));
        }
        let position = self
            .accounts
            .get(&caller)
            .ok_or_else(|| LedgerError::NoStakePosition(caller.to_hex()))?;
        if amount.wei > position.amount.wei {
            return Err(LedgerError::InsufficientBalance {
                requested: amount.wei,
                available: position.amount.wei,
            });
        }

        // Fee is judged on the position age before settlement refreshes it.
        let age = now.saturating_sub(position.stake_timestamp);
        let fee = if global.policy.fee_exempt_after_secs > 0
            && age < global.policy.fee_exempt_after_secs
        {
            Thkx::from_wei(mul_div(
                amount.wei,
                global.early_unstake_fee_bps,
                BPS_DENOMINATOR,
            )?)
        } else {
            Thkx::zero()
        };

        let settlement = compute_settlement(position, global, now)?;
        let reward_payout = position.accrued_rewards.checked_add(settlement.accrued)?;
        let pool_draw = settlement.compounded.checked_add(reward_payout)?;
        if pool_draw.wei > global.reward_pool.wei {
            return Err(LedgerError::InsufficientBalance {
                requested: pool_draw.wei,
                available: global.reward_pool.wei,
            });
        }
        let principal_out = amount.checked_sub(fee)?;
        let total_out = principal_out.checked_add(reward_payout)?;
        let vault_balance = token.balance_of(self.vault);
        if total_out.wei > vault_balance.wei {
            return Err(LedgerError::InsufficientBalance {
                requested: total_out.wei,
                available: vault_balance.wei,
            });
        }

        // All preconditions hold; mutate.
        advance_halving(global, now);
        if !total_out.is_zero() {
            token.transfer(self.vault, caller, total_out)?;
        }
        let position = match self.accounts.get_mut(&caller) {
            Some(p) => p,
            None => return Err(LedgerError::NoStakePosition(caller.to_hex())),
        };
        position.amount = position
            .amount
            .checked_add(settlement.compounded)?
            .checked_sub(amount)?;
        position.accrued_rewards = Thkx::zero();
        position.stake_timestamp = now;
        let remaining = position.amount;

        global.total_staked = global
            .total_staked
            .checked_add(settlement.compounded)?
            .checked_sub(amount)?;
        global.reward_pool = global
            .reward_pool
            .checked_sub(pool_draw)?
            .checked_add(fee)?;
        if remaining.is_zero() {
            self.accounts.remove(&caller);
            global.stakers_count = global.stakers_count.saturating_sub(1);
        }

        Ok(UnstakeReceipt {
            principal: principal_out,
            fee,
            reward: reward_payout,
        })
    }

    /// Settle and pay out `caller`'s accumulated rewards without unstaking.
    /// With auto-compound on, the new accrual is reinvested and only
    /// previously accumulated rewards (from before the toggle) are paid.
    ///
    /// Returns the amount paid out (possibly zero).
    pub fn claim_rewards(
        &mut self,
        token: &mut TokenLedger,
        global: &mut GlobalState,
        caller: Address,
        now: u64,
    ) -> Result<Thkx, LedgerError> {
        if global.paused {
            return Err(LedgerError::SystemPaused);
        }
        let position = self
            .accounts
            .get(&caller)
            .ok_or_else(|| LedgerError::NoStakePosition(caller.to_hex()))?;

        let settlement = compute_settlement(position, global, now)?;
        let payout = position.accrued_rewards.checked_add(settlement.accrued)?;
        let pool_draw = settlement.compounded.checked_add(payout)?;
        if pool_draw.wei > global.reward_pool.wei {
            return Err(LedgerError::InsufficientBalance {
                requested: pool_draw.wei,
                available: global.reward_pool.wei,
            });
        }

        advance_halving(global, now);
        if !payout.is_zero() {
            token.transfer(self.vault, caller, payout)?;
        }
        let position = match self.accounts.get_mut(&caller) {
            Some(p) => p,
            None => return Err(LedgerError::NoStakePosition(caller.to_hex())),
        };
        position.amount = position.amount.checked_add(settlement.compounded)?;
        position.accrued_rewards = Thkx::zero();
        position.stake_timestamp = now;

        global.total_staked = global.total_staked.checked_add(settlement.compounded)?;
        global.reward_pool = global.reward_pool.checked_sub(pool_draw)?;
        Ok(payout)
    }

    /// Owner escape hatch: zero the target's stake and accrued rewards
    /// unconditionally and return the raw principal, bypassing fees,
    /// settlement, and the pause guard (it must work mid-incident).
    pub fn emergency_withdraw(
        &mut self,
        token: &mut TokenLedger,
        global: &mut GlobalState,
        target: Address,
    ) -> Result<Thkx, LedgerError> {
        let principal = self
            .accounts
            .get(&target)
            .map(|p| p.amount)
            .ok_or_else(|| LedgerError::NoStakePosition(target.to_hex()))?;

        let vault_balance = token.balance_of(self.vault);
        if principal.wei > vault_balance.wei {
            return Err(LedgerError::InsufficientBalance {
                requested: principal.wei,
                available: vault_balance.wei,
            });
        }

        self.accounts.remove(&target);
        global.total_staked = global.total_staked.checked_sub(principal)?;
        if !principal.is_zero() {
            global.stakers_count = global.stakers_count.saturating_sub(1);
            token.transfer(self.vault, target, principal)?;
        }
        Ok(principal)
    }

    /// Toggle auto-compound for `caller`'s position. Does not settle; only
    /// future settlements change behavior.
    pub fn set_auto_compound(&mut self, caller: Address, enabled: bool) -> Result<(), LedgerError> {
        let position = self
            .accounts
            .get_mut(&caller)
            .ok_or_else(|| LedgerError::NoStakePosition(caller.to_hex()))?;
        position.auto_compound = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LedgerConfig;

    const DAY: u64 = 24 * 60 * 60;
    const T0: u64 = 1_700_000_000;

    fn addr(last: u8) -> Address {
        let mut b = [0u8; 20];
        b[19] = last;
        Address(b)
    }

    fn vault() -> Address {
        addr(0xee)
    }

    fn setup(rate: u128) -> (TokenLedger, GlobalState, StakeLedger) {
        let mut token = TokenLedger::new();
        token.mint(addr(1), Thkx::from_whole(1_000)).unwrap();
        let policy = LedgerConfig {
            initial_reward_rate: rate,
            ..LedgerConfig::default()
        };
        let global = GlobalState::new(policy, T0);
        let staking = StakeLedger::new(vault());
        (token, global, staking)
    }

    fn check_invariants(global: &GlobalState, staking: &StakeLedger) {
        let sum: u128 = staking.positions().values().map(|p| p.amount.wei).sum();
        assert_eq!(global.total_staked.wei, sum);
        let nonzero = staking
            .positions()
            .values()
            .filter(|p| !p.amount.is_zero())
            .count() as u64;
        assert_eq!(global.stakers_count, nonzero);
    }

    #[test]
    fn test_stake_moves_balance_into_vault() {
        let (mut token, mut global, mut staking) = setup(500);
        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(50), T0)
            .unwrap();
        assert_eq!(token.balance_of(addr(1)), Thkx::from_whole(950));
        assert_eq!(token.balance_of(vault()), Thkx::from_whole(50));
        assert_eq!(global.total_staked, Thkx::from_whole(50));
        assert_eq!(global.stakers_count, 1);
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_stake_zero_rejected() {
        let (mut token, mut global, mut staking) = setup(500);
        assert!(matches!(
            staking.stake(&mut token, &mut global, addr(1), Thkx::zero(), T0),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_stake_over_balance_rejected() {
        let (mut token, mut global, mut staking) = setup(500);
        let err = staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(1_001), T0)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_stake_rejected_while_paused() {
        let (mut token, mut global, mut staking) = setup(500);
        global.paused = true;
        assert!(matches!(
            staking.stake(&mut token, &mut global, addr(1), Thkx::from_whole(10), T0),
            Err(LedgerError::SystemPaused)
        ));
    }

    #[test]
    fn test_immediate_unstake_round_trips_balance() {
        // Default policy waives the fee and no time elapses, so the full
        // principal comes back.
        let (mut token, mut global, mut staking) = setup(500);
        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(50), T0)
            .unwrap();
        let receipt = staking
            .unstake(&mut token, &mut global, addr(1), Thkx::from_whole(50), T0)
            .unwrap();
        assert_eq!(receipt.principal, Thkx::from_whole(50));
        assert_eq!(receipt.fee, Thkx::zero());
        assert_eq!(receipt.reward, Thkx::zero());
        assert_eq!(token.balance_of(addr(1)), Thkx::from_whole(1_000));
        assert_eq!(global.stakers_count, 0);
        assert!(staking.position(addr(1)).is_none());
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_unstake_pays_settled_reward_from_pool() {
        let (mut token, mut global, mut staking) = setup(10_000);
        // Fund the pool (as the treasury would).
        token.mint(vault(), Thkx::from_whole(100)).unwrap();
        global.reward_pool = Thkx::from_whole(100);

        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(50), T0)
            .unwrap();
        let now = T0 + 365 * DAY;
        let expected_reward = staking.pending_reward(&global, addr(1), now).unwrap();
        assert!(!expected_reward.is_zero());

        let receipt = staking
            .unstake(&mut token, &mut global, addr(1), Thkx::from_whole(50), now)
            .unwrap();
        assert_eq!(receipt.reward, expected_reward);
        assert_eq!(
            token.balance_of(addr(1)).wei,
            Thkx::from_whole(1_000).wei + expected_reward.wei
        );
        assert_eq!(
            global.reward_pool.wei,
            Thkx::from_whole(100).wei - expected_reward.wei
        );
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_unstake_fails_when_pool_cannot_cover_reward() {
        let (mut token, mut global, mut staking) = setup(10_000);
        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(50), T0)
            .unwrap();
        // Pool never funded: reward payout cannot be covered.
        let err = staking
            .unstake(
                &mut token,
                &mut global,
                addr(1),
                Thkx::from_whole(50),
                T0 + 365 * DAY,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        // Nothing changed.
        assert_eq!(global.total_staked, Thkx::from_whole(50));
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_early_unstake_fee_below_threshold() {
        // Zero reward rate keeps the payout math to the fee alone.
        let (mut token, mut global, mut staking) = setup(0);
        global.policy.fee_exempt_after_secs = 7 * DAY;
        global.early_unstake_fee_bps = 500; // 5%

        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(100), T0)
            .unwrap();
        let receipt = staking
            .unstake(&mut token, &mut global, addr(1), Thkx::from_whole(100), T0 + DAY)
            .unwrap();
        assert_eq!(receipt.fee, Thkx::from_whole(5));
        assert_eq!(receipt.principal, Thkx::from_whole(95));
        // Fee retained by the reward pool.
        assert_eq!(global.reward_pool.wei, Thkx::from_whole(5).wei - receipt.reward.wei);
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_unstake_after_threshold_waives_fee() {
        let (mut token, mut global, mut staking) = setup(0);
        global.policy.fee_exempt_after_secs = 7 * DAY;
        global.early_unstake_fee_bps = 500;

        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(100), T0)
            .unwrap();
        let receipt = staking
            .unstake(
                &mut token,
                &mut global,
                addr(1),
                Thkx::from_whole(100),
                T0 + 8 * DAY,
            )
            .unwrap();
        assert_eq!(receipt.fee, Thkx::zero());
        assert_eq!(receipt.principal, Thkx::from_whole(100));
    }

    #[test]
    fn test_partial_unstake_keeps_staker_counted() {
        let (mut token, mut global, mut staking) = setup(500);
        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(60), T0)
            .unwrap();
        staking
            .unstake(&mut token, &mut global, addr(1), Thkx::from_whole(20), T0)
            .unwrap();
        assert_eq!(global.stakers_count, 1);
        assert_eq!(global.total_staked, Thkx::from_whole(40));
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_auto_compound_reinvests_instead_of_accruing() {
        let (mut token, mut global, mut staking) = setup(10_000);
        token.mint(vault(), Thkx::from_whole(1_000)).unwrap();
        global.reward_pool = Thkx::from_whole(1_000);

        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(100), T0)
            .unwrap();
        staking.set_auto_compound(addr(1), true).unwrap();

        let now = T0 + 30 * DAY;
        let reward = staking.pending_reward(&global, addr(1), now).unwrap();
        // Touch the position with a further stake: settlement compounds.
        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(10), now)
            .unwrap();

        let pos = staking.position(addr(1)).unwrap();
        assert_eq!(pos.amount.wei, Thkx::from_whole(110).wei + reward.wei);
        assert_eq!(pos.accrued_rewards, Thkx::zero());
        assert_eq!(global.reward_pool.wei, Thkx::from_whole(1_000).wei - reward.wei);
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_claim_rewards_pays_and_resets() {
        let (mut token, mut global, mut staking) = setup(10_000);
        token.mint(vault(), Thkx::from_whole(100)).unwrap();
        global.reward_pool = Thkx::from_whole(100);

        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(100), T0)
            .unwrap();
        let now = T0 + 90 * DAY;
        let expected = staking.pending_reward(&global, addr(1), now).unwrap();
        let paid = staking
            .claim_rewards(&mut token, &mut global, addr(1), now)
            .unwrap();
        assert_eq!(paid, expected);
        let pos = staking.position(addr(1)).unwrap();
        assert_eq!(pos.accrued_rewards, Thkx::zero());
        assert_eq!(pos.stake_timestamp, now);
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_emergency_withdraw_ignores_pause_and_forfeits_rewards() {
        let (mut token, mut global, mut staking) = setup(10_000);
        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(50), T0)
            .unwrap();
        global.paused = true;

        let principal = staking
            .emergency_withdraw(&mut token, &mut global, addr(1))
            .unwrap();
        assert_eq!(principal, Thkx::from_whole(50));
        assert_eq!(token.balance_of(addr(1)), Thkx::from_whole(1_000));
        assert_eq!(global.total_staked, Thkx::zero());
        assert_eq!(global.stakers_count, 0);
        assert!(staking.position(addr(1)).is_none());
        check_invariants(&global, &staking);
    }

    #[test]
    fn test_emergency_withdraw_unknown_account() {
        let (mut token, mut global, mut staking) = setup(500);
        assert!(matches!(
            staking.emergency_withdraw(&mut token, &mut global, addr(7)),
            Err(LedgerError::NoStakePosition(_))
        ));
    }

    #[test]
    fn test_set_auto_compound_requires_position() {
        let (_, _, mut staking) = setup(500);
        assert!(matches!(
            staking.set_auto_compound(addr(1), true),
            Err(LedgerError::NoStakePosition(_))
        ));
    }

    #[test]
    fn test_settlement_advances_halving_once() {
        let (mut token, mut global, mut staking) = setup(8_000);
        staking
            .stake(&mut token, &mut global, addr(1), Thkx::from_whole(10), T0)
            .unwrap();
        let interval = global.halving_interval_secs;
        let now = T0 + interval + DAY;
        token.mint(vault(), Thkx::from_whole(1_000)).unwrap();
        global.reward_pool = Thkx::from_whole(1_000);

        staking
            .claim_rewards(&mut token, &mut global, addr(1), now)
            .unwrap();
        assert_eq!(global.reward_rate, 4_000);
        assert_eq!(global.last_halving_time, T0 + interval);

        // A second settlement in the same window does not halve again.
        staking
            .claim_rewards(&mut token, &mut global, addr(1), now + 1)
            .unwrap();
        assert_eq!(global.reward_rate, 4_000);
    }
}
