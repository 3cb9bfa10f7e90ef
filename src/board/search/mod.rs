//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - Negamax alpha-beta with null move pruning and LMR
//! - Check extension and mate distance pruning
//! - Quiescence search with stand-pat
//! - Move ordering (hash move, placement delta)
//! - Transposition table for move ordering and cutoffs
//! - Draw detection (fifty-move rule, repetition)

mod alphabeta;
mod constants;
mod move_order;
mod params;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::tt::TranspositionTable;

use super::{Move, Position};
pub use constants::{INF, MATE_THRESHOLD};
pub use params::SearchParams;

/// Default transposition table size in MB
pub const DEFAULT_TT_MB: usize = 64;

/// Outcome of a search
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Best move of the last completed iteration; `None` only when the
    /// root has no legal moves
    pub best_move: Option<Move>,
    /// Score from the side to move's point of view
    pub score: i32,
    /// Depth of the last completed iteration
    pub depth: u32,
    /// Principal variation, starting with `best_move`
    pub pv: Vec<Move>,
    pub nodes: u64,
}

/// Statistics tracked during search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Main-search nodes
    pub nodes: u64,
    /// Quiescence nodes
    pub qnodes: u64,
    /// Main-search nodes handed to quiescence
    pub leaves: u64,
    /// Quiescence nodes that searched no move
    pub qleaves: u64,
    pub beta_cutoffs: u64,
    pub tt_hits: u64,
    pub seldepth: u32,
}

impl SearchStats {
    #[must_use]
    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.qnodes
    }
}

/// Search state persisted across searches
pub struct SearchState {
    /// Shared transposition table
    pub tt: Arc<TranspositionTable>,
    /// Statistics of the most recent search
    pub stats: SearchStats,
    pub params: SearchParams,
    generation: u16,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tt: Arc::new(TranspositionTable::new(tt_mb)),
            stats: SearchStats::default(),
            params: SearchParams::default(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    /// Forget everything learned in the previous game.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.stats = SearchStats::default();
        self.generation = 0;
        log::debug!("transposition table cleared");
    }

    /// Replace the table with a fresh one of `tt_mb` megabytes.
    pub fn resize(&mut self, tt_mb: usize) {
        self.tt = Arc::new(TranspositionTable::new(tt_mb));
        self.stats = SearchStats::default();
        log::debug!("transposition table resized to {tt_mb} MB");
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tt.hashfull_per_mille()
    }

    /// Get a clone of the shared table
    #[must_use]
    pub fn shared_tt(&self) -> Arc<TranspositionTable> {
        Arc::clone(&self.tt)
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TT_MB)
    }
}

// ============================================================================
// SEARCH API
// ============================================================================

/// Configuration for a search operation.
#[derive(Clone, Default)]
pub struct SearchConfig {
    /// Maximum depth to search (None = unlimited, capped at 64)
    pub max_depth: Option<u32>,
    /// Time limit in milliseconds (0 = unlimited)
    pub time_limit_ms: u64,
    /// Node limit (0 = unlimited)
    pub node_limit: u64,
    /// Hashes of the positions played before the root, oldest first
    pub history: Vec<u64>,
    /// Optional callback for iteration info
    pub info_callback: Option<SearchInfoCallback>,
}

impl SearchConfig {
    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    /// Create a time-limited search config
    #[must_use]
    pub fn time(time_limit_ms: u64) -> Self {
        SearchConfig {
            time_limit_ms,
            ..Default::default()
        }
    }

    /// Set node limit
    #[must_use]
    pub fn with_nodes(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    /// Set the game history used for repetition detection
    #[must_use]
    pub fn with_history(mut self, history: Vec<u64>) -> Self {
        self.history = history;
        self
    }

    /// Attach a callback for iteration info reporting.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("max_depth", &self.max_depth)
            .field("time_limit_ms", &self.time_limit_ms)
            .field("node_limit", &self.node_limit)
            .field("history", &self.history.len())
            .field("info_callback", &self.info_callback.is_some())
            .finish()
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub seldepth: u32,
    pub score: i32,
    /// Moves to mate, negative when the side to move is being mated
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

impl SearchIterationInfo {
    /// PV as space-separated coordinate moves
    #[must_use]
    pub fn pv_string(&self) -> String {
        self.pv
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;

/// Moves to mate for a mate score, `None` for ordinary scores
#[must_use]
pub fn mate_in(score: i32) -> Option<i32> {
    if score.abs() <= MATE_THRESHOLD {
        None
    } else if score > 0 {
        Some((INF - score + 1) / 2)
    } else {
        Some(-(INF + score) / 2)
    }
}

/// Run a search on `position` until a limit in `config` is hit or `stop`
/// is raised.
///
/// # Example
/// ```
/// use std::sync::atomic::AtomicBool;
/// use chess_core::board::{search_with, Position, SearchConfig, SearchState};
///
/// let pos: Position = "6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1".parse().unwrap();
/// let mut state = SearchState::new(1);
/// let result = search_with(&pos, &mut state, SearchConfig::depth(3), &AtomicBool::new(false));
/// assert_eq!(result.best_move.unwrap().to_string(), "e1e8");
/// ```
#[allow(clippy::needless_pass_by_value)] // Config is intentionally consumed
pub fn search_with(
    position: &Position,
    state: &mut SearchState,
    config: SearchConfig,
    stop: &AtomicBool,
) -> SearchResult {
    alphabeta::run(position, state, config, stop)
}

/// Depth-limited search with a fresh small table.
///
/// Returns the best move (`None` when there is no legal move) and its score
/// from the side to move's point of view. A position without legal moves
/// scores `-INF` when checkmated and 0 when stalemated.
#[must_use]
pub fn search(position: &Position, max_depth: u32) -> (Option<Move>, i32) {
    let mut state = SearchState::new(16);
    let result = search_with(
        position,
        &mut state,
        SearchConfig::depth(max_depth),
        &AtomicBool::new(false),
    );
    (result.best_move, result.score)
}
