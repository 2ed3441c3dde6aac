// crates/thkx-ledger/src/accrual.rs
//
// Time-and-rate reward accrual with halving.
//
// Accrual is segment-and-sum: the elapsed window is split at every halving
// boundary it crosses, and each segment earns at the rate in force during
// that segment (`rate / 2^k` for the k-th interval past the last recorded
// halving). A single average-rate shortcut would drift whenever more than
// one halving falls between two settlements.
//
// `advance_halving` is the only mutation here: it folds whole elapsed
// intervals into the global state (halving the rate and moving
// `last_halving_time` forward). It is idempotent within a boundary window.
// Because any account may settle long after the global clock has advanced,
// `accrue` also reconstructs rates for segments *before*
// `last_halving_time`. Every rate is derived by shifting
// `base_reward_rate` (the rate at the start of the current rate epoch),
// never by doubling the already-halved current rate back up, so odd rates
// reconstruct exactly (5 halves to 2; doubling 2 back would give 4).

use thkx_core::{LedgerError, Thkx, Wei};

use crate::state::GlobalState;

/// Reward for one constant-rate segment: `stake × rate × secs / denominator`.
fn segment_reward(stake: Wei, rate: u128, secs: u64, denominator: u128) -> Result<Wei, LedgerError> {
    if denominator == 0 {
        return Err(LedgerError::Overflow);
    }
    stake
        .checked_mul(rate)
        .and_then(|p| p.checked_mul(secs as u128))
        .map(|p| p / denominator)
        .ok_or(LedgerError::Overflow)
}

/// Effective rate `k` intervals away from `last_halving_time`.
///
/// The rate is always `base_rate` shifted by the total halvings at that
/// point in the epoch (`halvings_since_base + k`); negative `k` reaches
/// back into windows before the last recorded halving. A segment predating
/// the rate epoch itself clamps to the base rate.
fn rate_at(base_rate: u128, halvings_since_base: u64, k: i128) -> u128 {
    let idx = halvings_since_base as i128 + k;
    if idx <= 0 {
        base_rate
    } else if idx >= 128 {
        0
    } else {
        base_rate >> (idx as u32)
    }
}

/// Compute the reward accrued by a position of `stake` wei between
/// `stake_timestamp` and `now`, crossing any number of halving boundaries.
///
/// Pure: reads global state, mutates nothing. Call `advance_halving`
/// afterwards to fold crossed boundaries into the global state.
pub fn accrue(
    stake: Thkx,
    stake_timestamp: u64,
    global: &GlobalState,
    now: u64,
) -> Result<Thkx, LedgerError> {
    if stake.is_zero() || now <= stake_timestamp || global.base_reward_rate == 0 {
        return Ok(Thkx::zero());
    }
    let denominator = global.policy.reward_denominator;
    let interval = global.halving_interval_secs;
    if interval == 0 {
        // Halving disabled: a single flat segment.
        let secs = now - stake_timestamp;
        return segment_reward(stake.wei, global.reward_rate, secs, denominator).map(Thkx::from_wei);
    }

    let anchor = global.last_halving_time as i128;
    let step = interval as i128;
    let end = now as i128;
    let mut cursor = stake_timestamp as i128;
    let mut total: Wei = 0;

    while cursor < end {
        let k = (cursor - anchor).div_euclid(step);
        let boundary = anchor + (k + 1) * step;
        let segment_end = end.min(boundary);
        let secs = (segment_end - cursor) as u64;
        let rate = rate_at(global.base_reward_rate, global.halvings_since_base, k);
        if rate == 0 && k >= 0 {
            // Every later segment is zero as well.
            break;
        }
        let reward = segment_reward(stake.wei, rate, secs, denominator)?;
        total = total.checked_add(reward).ok_or(LedgerError::Overflow)?;
        cursor = segment_end;
    }

    Ok(Thkx::from_wei(total))
}

/// Fold whole elapsed halving intervals into the global state.
///
/// Bumps `halvings_since_base` once per crossed interval, rederives
/// `reward_rate` from the epoch base rate, and advances `last_halving_time`
/// by the same number of whole intervals. Returns the number of halvings
/// applied; a second call in the same boundary window returns 0 and changes
/// nothing.
pub fn advance_halving(global: &mut GlobalState, now: u64) -> u64 {
    if global.halving_interval_secs == 0 || now <= global.last_halving_time {
        return 0;
    }
    let elapsed = now - global.last_halving_time;
    let crossings = elapsed / global.halving_interval_secs;
    if crossings == 0 {
        return 0;
    }
    global.halvings_since_base = global.halvings_since_base.saturating_add(crossings);
    global.reward_rate = rate_at(global.base_reward_rate, global.halvings_since_base, 0);
    global.last_halving_time += crossings * global.halving_interval_secs;
    crossings
}
