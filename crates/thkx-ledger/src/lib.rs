// crates/thkx-ledger/src/lib.rs
//
// thkx-ledger: the THKX ledger state machine — fungible balances, staking
// with time-and-rate reward accrual and halving, the reward-pool treasury,
// the timelocked rate-governance flow, and the cooldown-gated faucet.
//
// The crate is a strictly sequential state machine: every operation is a
// synchronous transition that validates its preconditions before mutating
// anything, and `now` is always supplied by the caller so transitions stay
// deterministic and replayable. Network transport, signing, and persistence
// live in the adapter crates.

pub mod accrual;
pub mod faucet;
pub mod governance;
pub mod ledger;
pub mod ops;
pub mod staking;
pub mod state;
pub mod token;
pub mod treasury;

// Re-export key types for ergonomic access from downstream crates.
pub use accrual::{accrue, advance_halving};
pub use faucet::FaucetDistributor;
pub use governance::{GovernanceTimelock, RateProposal};
pub use ledger::{ContractInfo, StakeInfo, ThkxLedger, FAUCET_VAULT, STAKING_VAULT};
pub use ops::Operation;
pub use staking::{StakeLedger, StakePosition, UnstakeReceipt};
pub use state::{GlobalState, LedgerConfig};
pub use token::TokenLedger;
pub use treasury::RewardPoolTreasury;
