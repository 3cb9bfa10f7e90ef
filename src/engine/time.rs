//! Time allocation.
//!
//! Converts a clock (fixed move time, or remaining time plus increment and
//! an optional moves-to-go count) into a single millisecond budget for the
//! next search.

use std::time::Duration;

use crate::board::Color;

/// Moves-to-go estimate when the clock does not give one
pub const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Below this much usable time the budget is cut sharply (in ms)
const PANIC_THRESHOLD_MS: u64 = 5000;

/// Never plan for fewer remaining moves than this
const MIN_MOVES_TO_GO: u64 = 10;

/// Safety margin added to overhead for critical time detection
const CRITICAL_TIME_MARGIN_MS: u64 = 50;

/// Panic mode: divisor of usable time
const PANIC_FRACTION: u64 = 20;

/// Clock thresholds for moves-to-go estimation (in ms)
const LONG_TIME_CONTROL_MS: u64 = 300_000;
const MEDIUM_TIME_CONTROL_MS: u64 = 60_000;

const LONG_MOVES_ESTIMATE: u64 = 40;
const SHORT_MOVES_ESTIMATE: u64 = 25;

/// Tunables for the budget computation.
#[derive(Debug, Clone, Copy)]
pub struct TimeConfig {
    /// Time reserved per move for communication latency
    pub move_overhead_ms: u64,
    /// Upper bound on the budget as a percentage of usable time
    pub max_time_percent: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            move_overhead_ms: 50,
            max_time_percent: 50,
        }
    }
}

/// Time control settings for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// No time limit
    #[default]
    Infinite,
    /// Fixed time per move
    MoveTime { time_ms: u64 },
    /// Remaining time and increment for each side
    Clock {
        white_ms: u64,
        black_ms: u64,
        white_inc_ms: u64,
        black_inc_ms: u64,
        moves_to_go: Option<u64>,
    },
}

impl TimeControl {
    /// Fixed move time from a `Duration`.
    #[must_use]
    pub fn move_time(time: Duration) -> Self {
        TimeControl::MoveTime {
            time_ms: time.as_millis() as u64,
        }
    }

    /// Same clock and increment for both sides.
    #[must_use]
    pub fn symmetric(time_left: Duration, inc: Duration, moves_to_go: Option<u64>) -> Self {
        let time_ms = time_left.as_millis() as u64;
        let inc_ms = inc.as_millis() as u64;
        TimeControl::Clock {
            white_ms: time_ms,
            black_ms: time_ms,
            white_inc_ms: inc_ms,
            black_inc_ms: inc_ms,
            moves_to_go,
        }
    }

    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite)
    }

    /// Budget for `side`'s next move with the default tunables; 0 means
    /// unlimited.
    #[must_use]
    pub fn budget_ms(&self, side: Color) -> u64 {
        self.budget_with(side, &TimeConfig::default())
    }

    /// Budget for `side`'s next move; 0 means unlimited.
    #[must_use]
    pub fn budget_with(&self, side: Color, config: &TimeConfig) -> u64 {
        match *self {
            TimeControl::Infinite => 0,
            // The caller asked for exactly this long
            TimeControl::MoveTime { time_ms } => time_ms.max(1),
            TimeControl::Clock {
                white_ms,
                black_ms,
                white_inc_ms,
                black_inc_ms,
                moves_to_go,
            } => {
                let (time_left_ms, inc_ms) = match side {
                    Color::White => (white_ms, white_inc_ms),
                    Color::Black => (black_ms, black_inc_ms),
                };
                clock_budget(time_left_ms, inc_ms, moves_to_go, config)
            }
        }
    }
}

fn clock_budget(time_left_ms: u64, inc_ms: u64, moves_to_go: Option<u64>, config: &TimeConfig) -> u64 {
    if time_left_ms <= config.move_overhead_ms.saturating_add(CRITICAL_TIME_MARGIN_MS) {
        return (time_left_ms / 2).max(1);
    }
    let safe_ms = time_left_ms - config.move_overhead_ms;

    if safe_ms < PANIC_THRESHOLD_MS {
        return (safe_ms / PANIC_FRACTION + inc_ms / 2).min(safe_ms / 4).max(1);
    }

    let moves_to_go = moves_to_go
        .unwrap_or(if safe_ms > LONG_TIME_CONTROL_MS {
            LONG_MOVES_ESTIMATE
        } else if safe_ms > MEDIUM_TIME_CONTROL_MS {
            DEFAULT_MOVES_TO_GO
        } else {
            SHORT_MOVES_ESTIMATE
        })
        .max(MIN_MOVES_TO_GO);

    let base = safe_ms / moves_to_go + inc_ms;
    let cap = safe_ms * config.max_time_percent / 100;
    base.min(cap).max(1)
}
