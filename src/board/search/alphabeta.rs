//! Core search implementation.
//!
//! This module implements:
//! - Iterative deepening with aspiration windows
//! - Negamax alpha-beta, fail-soft
//! - Null move pruning
//! - Late move reductions (LMR) with full-depth re-search
//! - Check extension
//! - Mate distance pruning
//! - Quiescence search
//! - Repetition and fifty-move draws

mod iterative;
mod pruning;
mod quiescence;

pub(super) use iterative::run;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use crate::tt::BoundType;

use super::constants::{INF, LMR_TABLE_SIZE, MATE_THRESHOLD, TIME_CHECK_INTERVAL};
use super::move_order::score_moves;
use super::{SearchInfoCallback, SearchState};
use crate::board::{GenMode, Move, MoveList, Position, MAX_PLY};

/// Search context for a single search
pub(super) struct SearchContext<'a> {
    pub state: &'a mut SearchState,
    pub stop: &'a AtomicBool,
    pub start_time: Instant,
    pub time_limit_ms: u64,
    pub node_limit: u64,
    /// Main and quiescence nodes visited
    pub nodes: u64,
    /// Set once any limit trips; every frame then unwinds with 0
    pub stopped: bool,
    /// Hashes of the game before the root followed by the current path
    pub path: Vec<u64>,
    pub info_callback: Option<SearchInfoCallback>,
}

/// Convert a score to its table form: mate scores become relative to the
/// storing node.
#[inline]
pub(super) fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`] for a probe at `ply`
#[inline]
pub(super) fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Precomputed LMR table, `0.75 + ln(depth) * ln(move) / 2.25`
#[allow(clippy::cast_precision_loss)]
fn lmr_table() -> &'static [[i32; LMR_TABLE_SIZE]; LMR_TABLE_SIZE] {
    static TABLE: OnceLock<[[i32; LMR_TABLE_SIZE]; LMR_TABLE_SIZE]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = [[0i32; LMR_TABLE_SIZE]; LMR_TABLE_SIZE];
        for (depth, row) in t.iter_mut().enumerate().skip(1) {
            for (idx, cell) in row.iter_mut().enumerate().skip(1) {
                let val = 0.75 + (depth as f64).ln() * (idx as f64).ln() / 2.25;
                *cell = val.max(0.0) as i32;
            }
        }
        t
    })
}

#[inline]
fn lmr_reduction(depth: i32, move_idx: usize) -> i32 {
    let d = (depth.max(0) as usize).min(LMR_TABLE_SIZE - 1);
    let m = move_idx.min(LMR_TABLE_SIZE - 1);
    lmr_table()[d][m]
}

impl SearchContext<'_> {
    /// Check if we should stop searching
    #[inline]
    pub(super) fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.stop.load(Ordering::Relaxed)
            || (self.node_limit > 0 && self.nodes >= self.node_limit)
            || (self.time_limit_ms > 0
                && self.nodes % TIME_CHECK_INTERVAL == 0
                && self.start_time.elapsed().as_millis() as u64 >= self.time_limit_ms)
        {
            self.stopped = true;
        }
        self.stopped
    }

    #[inline]
    fn update_seldepth(&mut self, ply: usize) {
        let reached = ply as u32;
        if reached > self.state.stats.seldepth {
            self.state.stats.seldepth = reached;
        }
    }

    /// True if the position occurred earlier with the same side to move,
    /// looking back no further than the last irreversible move.
    pub(super) fn is_repetition(&self, pos: &Position) -> bool {
        let n = self.path.len();
        let window = (pos.half_move_clock() as usize).min(n);
        (2..=window)
            .step_by(2)
            .any(|back| self.path[n - back] == pos.hash())
    }

    fn store_tt(&self, pos: &Position, depth: i32, score: i32, bound: BoundType, mv: Option<Move>, ply: usize) {
        if self.stopped {
            return;
        }
        self.state.tt.store(
            pos.hash(),
            depth.max(0) as u32,
            score_to_tt(score, ply),
            bound,
            mv,
            self.state.generation,
        );
    }

    /// Negamax alpha-beta. Scores are from the side to move's point of
    /// view; mate at ply `p` is `INF - p`.
    pub(super) fn negamax(
        &mut self,
        pos: &Position,
        mut depth: i32,
        ply: usize,
        mut alpha: i32,
        mut beta: i32,
        allow_null: bool,
    ) -> i32 {
        self.nodes += 1;
        self.state.stats.nodes += 1;
        if self.should_stop() {
            return 0;
        }
        if alpha >= beta {
            return alpha;
        }
        if pos.is_fifty_move_draw() || self.is_repetition(pos) {
            return 0;
        }
        if ply >= MAX_PLY {
            return pos.evaluate();
        }
        self.update_seldepth(ply);

        let in_check = pos.in_check();
        if in_check {
            depth += 1;
        }
        if depth <= 0 {
            self.state.stats.leaves += 1;
            return self.quiescence(pos, ply, alpha, beta);
        }

        // Mate distance pruning
        alpha = alpha.max(-INF + ply as i32);
        beta = beta.min(INF - ply as i32 - 1);
        if alpha >= beta {
            return alpha;
        }

        let mut tt_move = None;
        if let Some(entry) = self.state.tt.probe(pos.hash()) {
            tt_move = entry.best_move();
            if self.state.params.tt_cutoffs && entry.depth() >= depth as u32 {
                let score = score_from_tt(entry.score(), ply);
                match entry.bound_type() {
                    BoundType::Exact => {
                        self.state.stats.tt_hits += 1;
                        return score;
                    }
                    BoundType::LowerBound => alpha = alpha.max(score),
                    BoundType::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    self.state.stats.tt_hits += 1;
                    return score;
                }
            }
        }

        if allow_null && !in_check {
            if let Some(score) = self.try_null_move(pos, depth, ply, beta) {
                return score;
            }
        }

        let mut moves = MoveList::new();
        pos.generate(GenMode::All, &mut moves);
        if moves.is_empty() {
            return if in_check { -INF + ply as i32 } else { 0 };
        }

        let mut scored = score_moves(pos, &moves, tt_move);
        let params = &self.state.params;
        let (lmr, lmr_min_depth, lmr_min_move) = (params.lmr, params.lmr_min_depth, params.lmr_min_move);

        let mut best_score = -INF;
        let mut best_move = None;
        let mut bound = BoundType::UpperBound;

        self.path.push(pos.hash());
        for i in 0..scored.len() {
            let Some(candidate) = scored.pick_best(i) else {
                break;
            };
            let mv = candidate.mv;
            let child = pos.apply_move(mv);

            let reduction = if lmr
                && depth > lmr_min_depth
                && i > lmr_min_move
                && mv.is_plain_quiet()
                && !in_check
            {
                lmr_reduction(depth, i).min(depth - 2)
            } else {
                0
            };

            let mut score = -self.negamax(&child, depth - 1 - reduction, ply + 1, -beta, -alpha, true);
            if reduction > 0 && score > alpha && !self.stopped {
                score = -self.negamax(&child, depth - 1, ply + 1, -beta, -alpha, true);
            }
            if self.stopped {
                self.path.pop();
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
                if score > alpha {
                    alpha = score;
                    bound = BoundType::Exact;
                    if alpha >= beta {
                        bound = BoundType::LowerBound;
                        self.state.stats.beta_cutoffs += 1;
                        break;
                    }
                }
            }
        }
        self.path.pop();

        self.store_tt(pos, depth, best_score, bound, best_move, ply);
        best_score
    }

    /// Walk hash moves from `pos`, keeping only legal ones and stopping at
    /// the first repeated position.
    pub(super) fn extract_pv(&self, pos: &Position, first: Move, max_len: usize) -> Vec<Move> {
        let mut pv = vec![first];
        let mut seen = vec![pos.hash()];
        let mut current = pos.apply_move(first);

        while pv.len() < max_len.max(1) {
            if seen.contains(&current.hash()) {
                break;
            }
            seen.push(current.hash());

            let Some(mv) = self.state.tt.probe(current.hash()).and_then(|e| e.best_move()) else {
                break;
            };
            if !current.legal_moves().contains(mv) {
                break;
            }
            pv.push(mv);
            current = current.apply_move(mv);
        }
        pv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tt_score_adjustment_is_reversible() {
        for score in [0, 150, -320, INF - 5, -(INF - 7)] {
            for ply in [0, 3, 17] {
                assert_eq!(score_from_tt(score_to_tt(score, ply), ply), score);
            }
        }
        // a mate found 3 plies below the storing node
        assert_eq!(score_to_tt(INF - 10, 7), INF - 3);
        assert_eq!(score_from_tt(INF - 3, 2), INF - 5);
    }

    #[test]
    fn lmr_grows_with_depth_and_move_number() {
        assert_eq!(lmr_reduction(1, 1), 0);
        assert!(lmr_reduction(10, 30) > lmr_reduction(3, 30));
        assert!(lmr_reduction(10, 30) > lmr_reduction(10, 3));
        assert_eq!(lmr_reduction(200, 500), lmr_reduction(63, 63));
    }
}
