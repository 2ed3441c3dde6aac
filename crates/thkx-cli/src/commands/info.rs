// crates/thkx-cli/src/commands/info.rs
//
// `thkx info` — print the ledger summary the way the original
// getContractInfo script did.

use chrono::DateTime;

use super::Ctx;

/// Render a Unix timestamp for display (UTC).
pub fn format_timestamp(ts: u64) -> String {
    match DateTime::from_timestamp(ts as i64, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("t={ts}"),
    }
}

/// Run the info command.
pub fn run(ctx: &Ctx) -> Result<(), Box<dyn std::error::Error>> {
    let info = ctx.ledger.contract_info();
    let days = info.halving_interval_secs / (24 * 60 * 60);

    println!("=== THKX Staking Contract Info ===");
    println!("Total Staked: {}", info.total_staked);
    println!("Reward Rate: {}", info.reward_rate);
    println!("Halving Interval: {} days", days);
    println!("Last Halving Time: {}", format_timestamp(info.last_halving_time));
    println!("Early Unstake Fee: {} bps", info.early_unstake_fee_bps);
    println!("Reward Pool: {}", info.reward_pool);
    println!("Total Stakers: {} users", info.stakers_count);
    println!(
        "Contract Status: {}",
        if info.paused { "Paused" } else { "Active" }
    );
    Ok(())
}
