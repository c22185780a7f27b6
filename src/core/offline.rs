//! Offline catch-up.
//!
//! Time spent away is converted into battle ticks at a reduced rate and
//! banked on the clock. The game replays banked ticks through the same path
//! as live ticks, so an away session is indistinguishable from play.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::constants::FRAME_MS;

/// Summary of one catch-up pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatchUpReport {
    pub away_seconds: i64,
    pub ticks_banked: u64,
    pub ticks_replayed: u64,
    /// True when the away time was worth more than the cap.
    pub capped: bool,
}

/// Ticks owed for `away_ms` of absence, before the cap is applied.
pub fn uncapped_catch_up_ticks(away_ms: u64, tick_divider: u32, efficiency_divider: u64) -> u64 {
    let tick_ms = FRAME_MS * tick_divider.max(1) as u64;
    away_ms / tick_ms / efficiency_divider.max(1)
}

/// Ticks owed for `away_ms` of absence, capped at `cap`.
pub fn catch_up_ticks(away_ms: u64, tick_divider: u32, efficiency_divider: u64, cap: u64) -> u64 {
    uncapped_catch_up_ticks(away_ms, tick_divider, efficiency_divider).min(cap)
}

/// Milliseconds between `last_active_ms` and `now_ms`. `None` when there is
/// no previous activity or the clock went backwards.
pub fn away_millis(last_active_ms: i64, now_ms: i64) -> Option<u64> {
    if last_active_ms <= 0 || now_ms <= last_active_ms {
        return None;
    }
    Some((now_ms - last_active_ms) as u64)
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
