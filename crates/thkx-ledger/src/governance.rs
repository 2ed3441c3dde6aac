// crates/thkx-ledger/src/governance.rs
//
// Timelocked reward-rate governance.
//
// A rate change is a two-step flow: propose, wait out the delay, execute
// with the exact proposed value. Execution with a different value fails
// (no bait-and-switch), and a new proposal supersedes any unexpired one.
// The core never waits — `is_executable(now)` is the predicate callers poll
// before issuing the state-changing execute call.

use serde::{Deserialize, Serialize};

use thkx_core::LedgerError;

use crate::state::GlobalState;

/// A pending reward-rate proposal. At most one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateProposal {
    /// The rate to apply on execution.
    pub proposed_rate: u128,
    /// When the proposal was recorded.
    pub proposed_at: u64,
    /// Earliest time execution can succeed.
    pub min_executable_at: u64,
}

/// Delayed proposal/execution of reward-rate changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GovernanceTimelock {
    proposal: Option<RateProposal>,
}

impl GovernanceTimelock {
    /// Create a timelock with no pending proposal.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending proposal, if any.
    pub fn proposal(&self) -> Option<&RateProposal> {
        self.proposal.as_ref()
    }

    /// True once a pending proposal's delay has elapsed at `now`.
    pub fn is_executable(&self, now: u64) -> bool {
        self.proposal
            .map(|p| now >= p.min_executable_at)
            .unwrap_or(false)
    }

    /// Record a proposal for `new_rate`, superseding any unexpired one.
    /// Available regardless of pause state.
    pub fn propose(&mut self, global: &GlobalState, new_rate: u128, now: u64) -> RateProposal {
        let proposal = RateProposal {
            proposed_rate: new_rate,
            proposed_at: now,
            min_executable_at: now.saturating_add(global.policy.timelock_delay_secs),
        };
        self.proposal = Some(proposal);
        proposal
    }

    /// Apply the pending proposal to the global rate and clear it.
    ///
    /// # Errors
    /// - `NoActiveProposal` if nothing is pending.
    /// - `RateMismatch` if `new_rate` differs from the proposed value.
    /// - `TimelockNotElapsed` if called before `min_executable_at`,
    ///   even by one second.
    pub fn execute(
        &mut self,
        global: &mut GlobalState,
        new_rate: u128,
        now: u64,
    ) -> Result<(), LedgerError> {
        let proposal = self.proposal.ok_or(LedgerError::NoActiveProposal)?;
        if proposal.proposed_rate != new_rate {
            return Err(LedgerError::RateMismatch {
                proposed: proposal.proposed_rate,
                requested: new_rate,
            });
        }
        if now < proposal.min_executable_at {
            return Err(LedgerError::TimelockNotElapsed {
                executable_at: proposal.min_executable_at,
            });
        }
        // An executed rate starts a fresh rate epoch: subsequent halvings
        // shift the new value, and accrual reconstructs from it.
        global.reward_rate = new_rate;
        global.base_reward_rate = new_rate;
        global.halvings_since_base = 0;
        self.proposal = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LedgerConfig;

    const T0: u64 = 1_700_000_000;
    const DAY: u64 = 24 * 60 * 60;

    fn state() -> GlobalState {
        GlobalState::new(LedgerConfig::default(), T0)
    }

    #[test]
    fn test_propose_records_executable_time() {
        let global = state();
        let mut timelock = GovernanceTimelock::new();
        let p = timelock.propose(&global, 500, T0);
        assert_eq!(p.min_executable_at, T0 + DAY);
        assert!(!timelock.is_executable(T0 + DAY - 1));
        assert!(timelock.is_executable(T0 + DAY));
    }

    #[test]
    fn test_execute_after_delay() {
        let mut global = state();
        let mut timelock = GovernanceTimelock::new();
        timelock.propose(&global, 500, T0);
        timelock.execute(&mut global, 500, T0 + DAY).unwrap();
        assert_eq!(global.reward_rate, 500);
        assert!(timelock.proposal().is_none());
    }

    #[test]
    fn test_execute_resets_rate_epoch() {
        let mut global = state();
        // Two halvings into the current epoch.
        global.halvings_since_base = 2;
        global.reward_rate = 125;

        let mut timelock = GovernanceTimelock::new();
        timelock.propose(&global, 750, T0);
        timelock.execute(&mut global, 750, T0 + DAY).unwrap();
        assert_eq!(global.reward_rate, 750);
        assert_eq!(global.base_reward_rate, 750);
        assert_eq!(global.halvings_since_base, 0);
    }

    #[test]
    fn test_execute_one_second_early_rejected() {
        let mut global = state();
        let mut timelock = GovernanceTimelock::new();
        timelock.propose(&global, 500, T0);
        let err = timelock.execute(&mut global, 500, T0 + DAY - 1).unwrap_err();
        assert_eq!(
            err,
            LedgerError::TimelockNotElapsed {
                executable_at: T0 + DAY
            }
        );
    }

    #[test]
    fn test_execute_different_rate_rejected() {
        let mut global = state();
        let mut timelock = GovernanceTimelock::new();
        timelock.propose(&global, 500, T0);
        let err = timelock.execute(&mut global, 501, T0 + DAY).unwrap_err();
        assert_eq!(
            err,
            LedgerError::RateMismatch {
                proposed: 500,
                requested: 501
            }
        );
        // Proposal survives a failed execution.
        assert!(timelock.proposal().is_some());
    }

    #[test]
    fn test_execute_without_proposal_rejected() {
        let mut global = state();
        let mut timelock = GovernanceTimelock::new();
        assert_eq!(
            timelock.execute(&mut global, 500, T0).unwrap_err(),
            LedgerError::NoActiveProposal
        );
    }

    #[test]
    fn test_new_proposal_supersedes_old() {
        let mut global = state();
        let mut timelock = GovernanceTimelock::new();
        timelock.propose(&global, 500, T0);
        timelock.propose(&global, 750, T0 + 3600);

        // The superseded rate can no longer be executed.
        let err = timelock
            .execute(&mut global, 500, T0 + 2 * DAY)
            .unwrap_err();
        assert!(matches!(err, LedgerError::RateMismatch { .. }));
        // The superseding one runs on its own clock.
        timelock
            .execute(&mut global, 750, T0 + 3600 + DAY)
            .unwrap();
        assert_eq!(global.reward_rate, 750);
    }
}
