// crates/thkx-ledger/src/ledger.rs
//
// The `ThkxLedger` facade: one value wiring the token ledger, stake ledger,
// treasury, governance timelock, faucet, and pause guard together, and
// enforcing caller authentication (owner vs. arbitrary account) on every
// operation. The adapter layer hands it a pre-authenticated caller address
// and a trusted `now`; the facade routes the call and nothing else.
//
// Pause semantics: `pause`/`unpause` flip the guard (idempotently);
// emergency withdrawal, treasury deposits/withdrawals, governance, and
// faucet-settings changes stay available while paused so incident response
// is never locked out.

use serde::{Deserialize, Serialize};

use thkx_core::{Address, LedgerError, Thkx};

use crate::faucet::FaucetDistributor;
use crate::governance::{GovernanceTimelock, RateProposal};
use crate::staking::{StakeLedger, StakePosition, UnstakeReceipt};
use crate::state::{GlobalState, LedgerConfig};
use crate::token::TokenLedger;
use crate::treasury::RewardPoolTreasury;

/// Reserved custody address for staked principal and the reward pool.
pub const STAKING_VAULT: Address = Address([0xfe; 20]);

/// Reserved custody address for the faucet's disbursable balance.
pub const FAUCET_VAULT: Address = Address([0xfa; 20]);

/// Read-only summary matching the original `getContractInfo()` tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub total_staked: Thkx,
    pub reward_rate: u128,
    pub halving_interval_secs: u64,
    pub last_halving_time: u64,
    pub early_unstake_fee_bps: u128,
    pub reward_pool: Thkx,
    pub stakers_count: u64,
    pub paused: bool,
}

/// Read-only view of one stake position at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeInfo {
    pub amount: Thkx,
    pub stake_timestamp: u64,
    pub accrued_rewards: Thkx,
    /// Reward the position would settle if touched now.
    pub pending_reward: Thkx,
    pub auto_compound: bool,
}

/// The complete THKX ledger state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThkxLedger {
    owner: Address,
    token: TokenLedger,
    global: GlobalState,
    staking: StakeLedger,
    treasury: RewardPoolTreasury,
    governance: GovernanceTimelock,
    faucet: FaucetDistributor,
}

impl ThkxLedger {
    /// Create a genesis ledger owned by `owner` at time `now`.
    pub fn new(owner: Address, policy: LedgerConfig, now: u64) -> Self {
        let faucet = FaucetDistributor::new(
            FAUCET_VAULT,
            Thkx::from_wei(policy.faucet_claim_amount_wei),
            policy.faucet_claim_cooldown_secs,
        );
        Self {
            owner,
            token: TokenLedger::new(),
            global: GlobalState::new(policy, now),
            staking: StakeLedger::new(STAKING_VAULT),
            treasury: RewardPoolTreasury::new(STAKING_VAULT),
            governance: GovernanceTimelock::new(),
            faucet,
        }
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), LedgerError> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized(caller.to_hex()));
        }
        Ok(())
    }

    /// The custody vaults exist only as balance-sheet entries; no external
    /// identity may act as (or receive for) one through the call surface.
    fn ensure_unreserved(address: Address) -> Result<(), LedgerError> {
        if address == STAKING_VAULT || address == FAUCET_VAULT {
            return Err(LedgerError::InvalidAddress(format!(
                "{} is a reserved custody address",
                address.to_hex()
            )));
        }
        Ok(())
    }

    // ---- token operations -------------------------------------------------

    /// Mint new supply (owner-only; genesis and replenishment).
    pub fn mint(&mut self, caller: Address, to: Address, amount: Thkx) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        Self::ensure_unreserved(to)?;
        self.token.mint(to, amount)
    }

    /// Plain balance transfer from the caller.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: Thkx) -> Result<(), LedgerError> {
        Self::ensure_unreserved(caller)?;
        Self::ensure_unreserved(to)?;
        self.token.transfer(caller, to, amount)
    }

    /// Authorize `spender` over the caller's balance.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Thkx,
    ) -> Result<(), LedgerError> {
        Self::ensure_unreserved(caller)?;
        Self::ensure_unreserved(spender)?;
        self.token.approve(caller, spender, amount);
        Ok(())
    }

    /// Spend a previously granted allowance.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Thkx,
    ) -> Result<(), LedgerError> {
        Self::ensure_unreserved(caller)?;
        Self::ensure_unreserved(from)?;
        Self::ensure_unreserved(to)?;
        self.token.transfer_from(caller, from, to, amount)
    }

    // ---- staking ----------------------------------------------------------

    pub fn stake(&mut self, caller: Address, amount: Thkx, now: u64) -> Result<(), LedgerError> {
        Self::ensure_unreserved(caller)?;
        self.staking
            .stake(&mut self.token, &mut self.global, caller, amount, now)
    }

    pub fn unstake(
        &mut self,
        caller: Address,
        amount: Thkx,
        now: u64,
    ) -> Result<UnstakeReceipt, LedgerError> {
        self.staking
            .unstake(&mut self.token, &mut self.global, caller, amount, now)
    }

    pub fn claim_rewards(&mut self, caller: Address, now: u64) -> Result<Thkx, LedgerError> {
        self.staking
            .claim_rewards(&mut self.token, &mut self.global, caller, now)
    }

    /// Owner-only incident escape hatch; works while paused.
    pub fn emergency_withdraw(
        &mut self,
        caller: Address,
        target: Address,
    ) -> Result<Thkx, LedgerError> {
        self.ensure_owner(caller)?;
        self.staking
            .emergency_withdraw(&mut self.token, &mut self.global, target)
    }

    pub fn set_auto_compound(&mut self, caller: Address, enabled: bool) -> Result<(), LedgerError> {
        self.staking.set_auto_compound(caller, enabled)
    }

    // ---- treasury ---------------------------------------------------------

    /// Owner-only reward-pool deposit; allowed while paused.
    pub fn deposit_rewards(&mut self, caller: Address, amount: Thkx) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        self.treasury
            .deposit(&mut self.token, &mut self.global, caller, amount)
    }

    /// Owner-only capped, cooldown-gated reward-pool withdrawal.
    pub fn withdraw_rewards(
        &mut self,
        caller: Address,
        amount: Thkx,
        now: u64,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        self.treasury
            .withdraw(&mut self.token, &mut self.global, caller, amount, now)
    }

    // ---- governance -------------------------------------------------------

    pub fn propose_reward_rate(
        &mut self,
        caller: Address,
        new_rate: u128,
        now: u64,
    ) -> Result<RateProposal, LedgerError> {
        self.ensure_owner(caller)?;
        Ok(self.governance.propose(&self.global, new_rate, now))
    }

    pub fn execute_reward_rate(
        &mut self,
        caller: Address,
        new_rate: u128,
        now: u64,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        self.governance.execute(&mut self.global, new_rate, now)
    }

    // ---- pause guard ------------------------------------------------------

    /// Engage the pause guard (idempotent).
    pub fn pause(&mut self, caller: Address) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        self.global.paused = true;
        Ok(())
    }

    /// Release the pause guard (idempotent).
    pub fn unpause(&mut self, caller: Address) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        self.global.paused = false;
        Ok(())
    }

    // ---- faucet -----------------------------------------------------------

    pub fn claim_tokens(&mut self, caller: Address, now: u64) -> Result<Thkx, LedgerError> {
        Self::ensure_unreserved(caller)?;
        self.faucet.claim(&mut self.token, &self.global, caller, now)
    }

    /// Owner-only atomic faucet reconfiguration; allowed while paused.
    pub fn set_faucet_settings(
        &mut self,
        caller: Address,
        claim_amount: Thkx,
        claim_cooldown_secs: u64,
    ) -> Result<(), LedgerError> {
        self.ensure_owner(caller)?;
        self.faucet.set_settings(claim_amount, claim_cooldown_secs)
    }

    /// Top up the faucet's balance from the caller.
    pub fn fund_faucet(&mut self, caller: Address, amount: Thkx) -> Result<(), LedgerError> {
        Self::ensure_unreserved(caller)?;
        self.faucet.fund(&mut self.token, caller, amount)
    }

    // ---- read-only accessors ----------------------------------------------

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn balance_of(&self, address: Address) -> Thkx {
        self.token.balance_of(address)
    }

    pub fn allowance_of(&self, owner: Address, spender: Address) -> Thkx {
        self.token.allowance_of(owner, spender)
    }

    pub fn total_supply(&self) -> Thkx {
        self.token.total_supply()
    }

    pub fn reward_pool(&self) -> Thkx {
        self.global.reward_pool
    }

    pub fn contract_info(&self) -> ContractInfo {
        ContractInfo {
            total_staked: self.global.total_staked,
            reward_rate: self.global.reward_rate,
            halving_interval_secs: self.global.halving_interval_secs,
            last_halving_time: self.global.last_halving_time,
            early_unstake_fee_bps: self.global.early_unstake_fee_bps,
            reward_pool: self.global.reward_pool,
            stakers_count: self.global.stakers_count,
            paused: self.global.paused,
        }
    }

    /// The stake position for `address` with its pending accrual at `now`.
    pub fn stake_info(&self, address: Address, now: u64) -> Result<Option<StakeInfo>, LedgerError> {
        let Some(position) = self.staking.position(address) else {
            return Ok(None);
        };
        let pending = self.staking.pending_reward(&self.global, address, now)?;
        Ok(Some(StakeInfo {
            amount: position.amount,
            stake_timestamp: position.stake_timestamp,
            accrued_rewards: position.accrued_rewards,
            pending_reward: pending,
            auto_compound: position.auto_compound,
        }))
    }

    pub fn last_claimed(&self, address: Address) -> Option<u64> {
        self.faucet.last_claimed(address)
    }

    pub fn claim_cooldown(&self) -> u64 {
        self.faucet.claim_cooldown()
    }

    pub fn claim_amount(&self) -> Thkx {
        self.faucet.claim_amount()
    }

    pub fn rate_proposal(&self) -> Option<&RateProposal> {
        self.governance.proposal()
    }

    /// Predicate the adapter polls instead of blocking on the timelock.
    pub fn is_rate_executable(&self, now: u64) -> bool {
        self.governance.is_executable(now)
    }

    pub fn global(&self) -> &GlobalState {
        &self.global
    }

    pub fn positions(&self) -> &std::collections::HashMap<Address, StakePosition> {
        self.staking.positions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000;

    fn addr(last: u8) -> Address {
        let mut b = [0u8; 20];
        b[19] = last;
        Address(b)
    }

    fn owner() -> Address {
        addr(1)
    }

    fn genesis() -> ThkxLedger {
        let mut ledger = ThkxLedger::new(owner(), LedgerConfig::default(), T0);
        ledger
            .mint(owner(), owner(), Thkx::from_whole(700_000_000))
            .unwrap();
        ledger
    }

    #[test]
    fn test_owner_only_operations_reject_others() {
        let mut ledger = genesis();
        let stranger = addr(9);
        assert!(matches!(
            ledger.mint(stranger, stranger, Thkx::from_whole(1)),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.deposit_rewards(stranger, Thkx::from_whole(1)),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.withdraw_rewards(stranger, Thkx::from_whole(1), T0),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.propose_reward_rate(stranger, 500, T0),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.execute_reward_rate(stranger, 500, T0),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.pause(stranger),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.emergency_withdraw(stranger, addr(2)),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.set_faucet_settings(stranger, Thkx::from_whole(1), 60),
            Err(LedgerError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_pause_is_idempotent_and_gates_staker_paths() {
        let mut ledger = genesis();
        ledger.pause(owner()).unwrap();
        ledger.pause(owner()).unwrap(); // no-op, not an error
        assert!(ledger.contract_info().paused);

        assert!(matches!(
            ledger.stake(owner(), Thkx::from_whole(1), T0),
            Err(LedgerError::SystemPaused)
        ));
        assert!(matches!(
            ledger.claim_tokens(addr(5), T0),
            Err(LedgerError::SystemPaused)
        ));

        ledger.unpause(owner()).unwrap();
        ledger.unpause(owner()).unwrap();
        assert!(!ledger.contract_info().paused);
        assert!(ledger.stake(owner(), Thkx::from_whole(1), T0).is_ok());
    }

    #[test]
    fn test_paused_system_still_allows_incident_paths() {
        let mut ledger = genesis();
        ledger.stake(owner(), Thkx::from_whole(50), T0).unwrap();
        ledger.pause(owner()).unwrap();

        // Emergency withdrawal, treasury flows, and governance all proceed.
        assert!(ledger.deposit_rewards(owner(), Thkx::from_whole(100)).is_ok());
        assert!(ledger
            .withdraw_rewards(owner(), Thkx::from_whole(10), T0)
            .is_ok());
        assert!(ledger.propose_reward_rate(owner(), 250, T0).is_ok());
        assert!(ledger
            .set_faucet_settings(owner(), Thkx::from_whole(10), 60)
            .is_ok());
        let principal = ledger.emergency_withdraw(owner(), owner()).unwrap();
        assert_eq!(principal, Thkx::from_whole(50));
    }

    #[test]
    fn test_contract_info_tuple_shape() {
        let mut ledger = genesis();
        ledger.stake(owner(), Thkx::from_whole(25), T0).unwrap();
        ledger.deposit_rewards(owner(), Thkx::from_whole(1_000)).unwrap();

        let info = ledger.contract_info();
        assert_eq!(info.total_staked, Thkx::from_whole(25));
        assert_eq!(info.reward_rate, 500);
        assert_eq!(info.reward_pool, Thkx::from_whole(1_000));
        assert_eq!(info.stakers_count, 1);
        assert!(!info.paused);
    }

    #[test]
    fn test_stake_info_reports_pending_accrual() {
        let mut ledger = genesis();
        ledger.stake(owner(), Thkx::from_whole(100), T0).unwrap();
        let info = ledger
            .stake_info(owner(), T0 + 86_400)
            .unwrap()
            .expect("position exists");
        assert_eq!(info.amount, Thkx::from_whole(100));
        assert!(!info.pending_reward.is_zero());
        assert!(!info.auto_compound);
        assert!(ledger.stake_info(addr(9), T0).unwrap().is_none());
    }

    #[test]
    fn test_reserved_custody_addresses_rejected_as_accounts() {
        let mut ledger = genesis();
        ledger.stake(owner(), Thkx::from_whole(50), T0).unwrap();
        ledger.fund_faucet(owner(), Thkx::from_whole(1_000)).unwrap();

        for vault in [STAKING_VAULT, FAUCET_VAULT] {
            // Vaults cannot spend their custody balances as callers.
            assert!(matches!(
                ledger.transfer(vault, addr(9), Thkx::from_whole(1)),
                Err(LedgerError::InvalidAddress(_))
            ));
            assert!(matches!(
                ledger.approve(vault, addr(9), Thkx::from_whole(1)),
                Err(LedgerError::InvalidAddress(_))
            ));
            assert!(matches!(
                ledger.stake(vault, Thkx::from_whole(1), T0),
                Err(LedgerError::InvalidAddress(_))
            ));
            assert!(matches!(
                ledger.fund_faucet(vault, Thkx::from_whole(1)),
                Err(LedgerError::InvalidAddress(_))
            ));
            assert!(matches!(
                ledger.claim_tokens(vault, T0),
                Err(LedgerError::InvalidAddress(_))
            ));
            // Nor be named as recipient, spender, or allowance source.
            assert!(matches!(
                ledger.mint(owner(), vault, Thkx::from_whole(1)),
                Err(LedgerError::InvalidAddress(_))
            ));
            assert!(matches!(
                ledger.transfer(owner(), vault, Thkx::from_whole(1)),
                Err(LedgerError::InvalidAddress(_))
            ));
            assert!(matches!(
                ledger.transfer_from(addr(9), vault, addr(9), Thkx::from_whole(1)),
                Err(LedgerError::InvalidAddress(_))
            ));
        }
        // Custody balances are untouched by the rejected calls.
        assert_eq!(ledger.balance_of(STAKING_VAULT), Thkx::from_whole(50));
        assert_eq!(ledger.balance_of(FAUCET_VAULT), Thkx::from_whole(1_000));
    }

    #[test]
    fn test_faucet_surface_through_facade() {
        let mut ledger = genesis();
        ledger.fund_faucet(owner(), Thkx::from_whole(1_000)).unwrap();
        assert_eq!(ledger.claim_amount(), Thkx::from_whole(100));
        assert_eq!(ledger.claim_cooldown(), 43_200);

        let paid = ledger.claim_tokens(addr(3), T0).unwrap();
        assert_eq!(paid, Thkx::from_whole(100));
        assert_eq!(ledger.last_claimed(addr(3)), Some(T0));
    }

    #[test]
    fn test_timelocked_rate_change_end_to_end() {
        let mut ledger = genesis();
        ledger.propose_reward_rate(owner(), 500, T0).unwrap();
        assert!(!ledger.is_rate_executable(T0 + 86_399));
        assert!(matches!(
            ledger.execute_reward_rate(owner(), 500, T0 + 86_399),
            Err(LedgerError::TimelockNotElapsed { .. })
        ));
        ledger.execute_reward_rate(owner(), 500, T0 + 86_400).unwrap();
        assert_eq!(ledger.contract_info().reward_rate, 500);
        assert!(ledger.rate_proposal().is_none());
    }
}
