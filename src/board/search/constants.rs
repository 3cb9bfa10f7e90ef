//! Search constants.

use crate::board::MAX_PLY;

// ============================================================================
// SCORES
// ============================================================================

/// Larger than any evaluation; mate at ply `p` scores `INF - p`
pub const INF: i32 = 999_999;

/// Scores with absolute value above this are mate scores
pub const MATE_THRESHOLD: i32 = INF - MAX_PLY as i32;

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Hash move (from transposition table) - always tried first
pub const TT_MOVE_SCORE: i32 = 1 << 20;

// ============================================================================
// REDUCTIONS
// ============================================================================

/// Null-move depth reduction switches from 2 to 3 above this depth
pub const NULL_MOVE_DEEP_DEPTH: i32 = 6;

/// LMR reduction table dimensions (depth x move index)
pub const LMR_TABLE_SIZE: usize = 64;

// ============================================================================
// LIMITS
// ============================================================================

/// Wall-clock limit is polled when the node count is a multiple of this
pub const TIME_CHECK_INTERVAL: u64 = 1024;

/// Iteration cap when no depth limit is given
pub const DEFAULT_MAX_DEPTH: u32 = 64;
