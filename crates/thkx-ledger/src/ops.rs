// crates/thkx-ledger/src/ops.rs
//
// Serializable operation records for the audit journal.
//
// Every mutating call on `ThkxLedger` has a corresponding `Operation`
// variant carrying the authenticated caller and, where time matters, the
// trusted `now`. Replaying the journal through `ThkxLedger::apply` against
// a genesis (or snapshot) state reproduces the exact same ledger, which is
// what makes point-in-time audit possible.

use serde::{Deserialize, Serialize};

use thkx_core::{Address, LedgerError, Thkx, Wei};

use crate::ledger::ThkxLedger;

/// One logged mutating call. Amounts are recorded in wei.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Mint { caller: Address, to: Address, amount: Wei },
    Transfer { caller: Address, to: Address, amount: Wei },
    Approve { caller: Address, spender: Address, amount: Wei },
    TransferFrom { caller: Address, from: Address, to: Address, amount: Wei },
    Stake { caller: Address, amount: Wei, now: u64 },
    Unstake { caller: Address, amount: Wei, now: u64 },
    ClaimRewards { caller: Address, now: u64 },
    EmergencyWithdraw { caller: Address, target: Address },
    SetAutoCompound { caller: Address, enabled: bool },
    DepositRewards { caller: Address, amount: Wei },
    WithdrawRewards { caller: Address, amount: Wei, now: u64 },
    ProposeRewardRate { caller: Address, new_rate: u128, now: u64 },
    ExecuteRewardRate { caller: Address, new_rate: u128, now: u64 },
    Pause { caller: Address },
    Unpause { caller: Address },
    ClaimTokens { caller: Address, now: u64 },
    SetFaucetSettings { caller: Address, claim_amount: Wei, claim_cooldown_secs: u64 },
    FundFaucet { caller: Address, amount: Wei },
}

impl ThkxLedger {
    /// Apply one journal record. Deterministic: the same record sequence
    /// over the same genesis state always produces the same ledger.
    pub fn apply(&mut self, op: &Operation) -> Result<(), LedgerError> {
        match *op {
            Operation::Mint { caller, to, amount } => self.mint(caller, to, Thkx::from_wei(amount)),
            Operation::Transfer { caller, to, amount } => {
                self.transfer(caller, to, Thkx::from_wei(amount))
            }
            Operation::Approve { caller, spender, amount } => {
                self.approve(caller, spender, Thkx::from_wei(amount))
            }
            Operation::TransferFrom { caller, from, to, amount } => {
                self.transfer_from(caller, from, to, Thkx::from_wei(amount))
            }
            Operation::Stake { caller, amount, now } => {
                self.stake(caller, Thkx::from_wei(amount), now)
            }
            Operation::Unstake { caller, amount, now } => {
                self.unstake(caller, Thkx::from_wei(amount), now).map(|_| ())
            }
            Operation::ClaimRewards { caller, now } => self.claim_rewards(caller, now).map(|_| ()),
            Operation::EmergencyWithdraw { caller, target } => {
                self.emergency_withdraw(caller, target).map(|_| ())
            }
            Operation::SetAutoCompound { caller, enabled } => {
                self.set_auto_compound(caller, enabled)
            }
            Operation::DepositRewards { caller, amount } => {
                self.deposit_rewards(caller, Thkx::from_wei(amount))
            }
            Operation::WithdrawRewards { caller, amount, now } => {
                self.withdraw_rewards(caller, Thkx::from_wei(amount), now)
            }
            Operation::ProposeRewardRate { caller, new_rate, now } => {
                self.propose_reward_rate(caller, new_rate, now).map(|_| ())
            }
            Operation::ExecuteRewardRate { caller, new_rate, now } => {
                self.execute_reward_rate(caller, new_rate, now)
            }
            Operation::Pause { caller } => self.pause(caller),
            Operation::Unpause { caller } => self.unpause(caller),
            Operation::ClaimTokens { caller, now } => self.claim_tokens(caller, now).map(|_| ()),
            Operation::SetFaucetSettings { caller, claim_amount, claim_cooldown_secs } => {
                self.set_faucet_settings(caller, Thkx::from_wei(claim_amount), claim_cooldown_secs)
            }
            Operation::FundFaucet { caller, amount } => {
                self.fund_faucet(caller, Thkx::from_wei(amount))
            }
        }
    }
}
