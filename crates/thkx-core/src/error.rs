// crates/thkx-core/src/error.rs
//
// Ledger-wide error types.
//
// Every validation failure is detected before any state mutation, so a
// returned error always means "nothing changed". Variants carry the data a
// caller needs to act on the failure (unlock times, computed caps) rather
// than pre-formatted strings alone.

use thiserror::Error;

/// Protocol-wide error type for the THKX ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A non-owner called an owner-only operation.
    #[error("Unauthorized: caller {0} is not the contract owner")]
    Unauthorized(String),

    /// A pause-gated operation was called while the system is paused.
    #[error("System is paused")]
    SystemPaused,

    /// The source account lacks the funds for a transfer or stake.
    #[error("Insufficient balance: requested {requested} wei but only {available} wei available")]
    InsufficientBalance { requested: u128, available: u128 },

    /// The faucet's own balance cannot cover a claim.
    #[error("Insufficient faucet balance: claim of {requested} wei exceeds faucet balance of {available} wei")]
    InsufficientFaucetBalance { requested: u128, available: u128 },

    /// Zero or otherwise malformed amount.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Owner withdrawal above the per-call percentage cap.
    #[error("Withdrawal limit exceeded: requested {requested} wei but the current cap is {cap} wei")]
    WithdrawalLimitExceeded { requested: u128, cap: u128 },

    /// A time-gated operation retried before its window opened.
    /// Carries the earliest Unix timestamp (seconds) at which a retry can succeed.
    #[error("Cooldown active: retry at or after t={unlock_at}")]
    CooldownActive { unlock_at: u64 },

    /// Rate execution with no proposal on record.
    #[error("No active rate proposal")]
    NoActiveProposal,

    /// Rate execution whose value differs from the proposed one.
    #[error("Rate mismatch: proposal is for rate {proposed}, execution requested rate {requested}")]
    RateMismatch { proposed: u128, requested: u128 },

    /// Rate execution before the timelock delay elapsed.
    /// Carries the earliest Unix timestamp (seconds) at which execution can succeed.
    #[error("Timelock not elapsed: executable at or after t={executable_at}")]
    TimelockNotElapsed { executable_at: u64 },

    /// Arithmetic overflow or underflow in a balance computation.
    #[error("Arithmetic overflow")]
    Overflow,

    /// The target account has no stake position.
    #[error("No stake position for account {0}")]
    NoStakePosition(String),

    /// A string could not be parsed as an address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
