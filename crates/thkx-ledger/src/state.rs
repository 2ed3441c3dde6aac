// crates/thkx-ledger/src/state.rs
//
// Global ledger state and policy configuration.
//
// `GlobalState` is the singleton the staking, treasury, and governance
// components mutate. It is always passed by reference into each operation's
// transition function — never held as ambient/static state — so transitions
// stay pure and unit-testable.
//
// `LedgerConfig` exposes the thresholds the original deployment left as
// open parameters (early-unstake fee trigger duration, halving cadence,
// withdrawal cap and cooldown, timelock delay, reward-rate normalization).

use serde::{Deserialize, Serialize};

use thkx_core::Thkx;

/// Seconds in one non-leap year, used to normalize annualized reward rates.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Basis-point denominator: 10,000 bps = 100%.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Policy parameters fixed at genesis (or loaded from configuration).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Reward rate at genesis, in basis points of annual yield
    /// (500 = 5% per year on staked principal).
    #[serde(default = "default_initial_reward_rate")]
    pub initial_reward_rate: u128,

    /// Seconds between reward-rate halvings.
    #[serde(default = "default_halving_interval_secs")]
    pub halving_interval_secs: u64,

    /// Fee charged on early unstakes, in basis points of the principal.
    #[serde(default = "default_early_unstake_fee_bps")]
    pub early_unstake_fee_bps: u128,

    /// Position age (seconds) below which the early-unstake fee applies.
    /// Zero means the fee is always waived.
    #[serde(default)]
    pub fee_exempt_after_secs: u64,

    /// Delay between proposing and executing a reward-rate change.
    #[serde(default = "default_timelock_delay_secs")]
    pub timelock_delay_secs: u64,

    /// Per-call cap on owner reward-pool withdrawals, in basis points of
    /// the pool balance at call time (2,000 = 20%).
    #[serde(default = "default_withdrawal_cap_bps")]
    pub withdrawal_cap_bps: u128,

    /// Minimum seconds between owner reward-pool withdrawals.
    #[serde(default = "default_withdrawal_cooldown_secs")]
    pub withdrawal_cooldown_secs: u64,

    /// Denominator normalizing `stake × rate × seconds` into wei.
    /// The default (10,000 bps × seconds-per-year) makes the rate an
    /// annualized basis-point yield.
    #[serde(default = "default_reward_denominator")]
    pub reward_denominator: u128,

    /// Faucet payout per claim at genesis, in wei.
    #[serde(default = "default_faucet_claim_amount_wei")]
    pub faucet_claim_amount_wei: u128,

    /// Faucet claim cooldown at genesis, in seconds.
    #[serde(default = "default_faucet_claim_cooldown_secs")]
    pub faucet_claim_cooldown_secs: u64,
}

fn default_initial_reward_rate() -> u128 {
    500
}

fn default_halving_interval_secs() -> u64 {
    // 180 days
    180 * 24 * 60 * 60
}

fn default_early_unstake_fee_bps() -> u128 {
    500
}

fn default_timelock_delay_secs() -> u64 {
    // 24 hours
    24 * 60 * 60
}

fn default_withdrawal_cap_bps() -> u128 {
    2_000
}

fn default_withdrawal_cooldown_secs() -> u64 {
    // 30 days
    30 * 24 * 60 * 60
}

fn default_reward_denominator() -> u128 {
    BPS_DENOMINATOR * SECONDS_PER_YEAR as u128
}

fn default_faucet_claim_amount_wei() -> u128 {
    // 100 THKX
    100 * 1_000_000_000_000_000_000
}

fn default_faucet_claim_cooldown_secs() -> u64 {
    // 12 hours
    43_200
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_reward_rate: default_initial_reward_rate(),
            halving_interval_secs: default_halving_interval_secs(),
            early_unstake_fee_bps: default_early_unstake_fee_bps(),
            fee_exempt_after_secs: 0,
            timelock_delay_secs: default_timelock_delay_secs(),
            withdrawal_cap_bps: default_withdrawal_cap_bps(),
            withdrawal_cooldown_secs: default_withdrawal_cooldown_secs(),
            reward_denominator: default_reward_denominator(),
            faucet_claim_amount_wei: default_faucet_claim_amount_wei(),
            faucet_claim_cooldown_secs: default_faucet_claim_cooldown_secs(),
        }
    }
}

/// The singleton global ledger state.
///
/// Invariants maintained by `StakeLedger`:
/// - `total_staked` equals the sum of all stake positions.
/// - `stakers_count` equals the number of accounts with nonzero stake,
///   changed only on the zero↔nonzero transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalState {
    /// Sum of all stake positions, in wei.
    pub total_staked: Thkx,
    /// Current reward rate (annualized basis points, see `LedgerConfig`).
    /// Always equals `base_reward_rate >> halvings_since_base`.
    pub reward_rate: u128,
    /// Rate at the start of the current rate epoch (genesis, or the last
    /// executed governance change). Halving shifts this value, never the
    /// already-halved `reward_rate`, so rates for segments before
    /// `last_halving_time` reconstruct exactly even when halving dropped
    /// low bits (5 halves to 2, but doubling 2 back would give 4).
    pub base_reward_rate: u128,
    /// Halvings applied since the current rate epoch began.
    pub halvings_since_base: u64,
    /// Seconds between halvings.
    pub halving_interval_secs: u64,
    /// Unix time of the last recorded halving boundary.
    pub last_halving_time: u64,
    /// Early-unstake fee in basis points of principal.
    pub early_unstake_fee_bps: u128,
    /// Reward-pool treasury balance, in wei (custodied by the staking vault).
    pub reward_pool: Thkx,
    /// Number of accounts with nonzero stake.
    pub stakers_count: u64,
    /// Pause guard: while true, stake/unstake/claims are rejected.
    pub paused: bool,
    /// Unix time of the last owner reward-pool withdrawal (0 = never).
    pub last_owner_withdrawal: u64,
    /// Policy parameters fixed at genesis.
    pub policy: LedgerConfig,
}

impl GlobalState {
    /// Create the genesis global state at time `now`.
    pub fn new(policy: LedgerConfig, now: u64) -> Self {
        Self {
            total_staked: Thkx::zero(),
            reward_rate: policy.initial_reward_rate,
            base_reward_rate: policy.initial_reward_rate,
            halvings_since_base: 0,
            halving_interval_secs: policy.halving_interval_secs,
            last_halving_time: now,
            early_unstake_fee_bps: policy.early_unstake_fee_bps,
            reward_pool: Thkx::zero(),
            stakers_count: 0,
            paused: false,
            last_owner_withdrawal: 0,
            policy,
        }
    }
}
