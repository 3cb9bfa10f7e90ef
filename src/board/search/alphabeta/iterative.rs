use std::sync::atomic::AtomicBool;
use std::time::Instant;

use super::super::constants::{DEFAULT_MAX_DEPTH, INF};
use super::super::move_order::score_moves;
use super::super::{mate_in, SearchConfig, SearchIterationInfo, SearchResult, SearchState, SearchStats};
use super::SearchContext;
use crate::board::{Move, MoveList, Position};
use crate::tt::BoundType;

impl SearchContext<'_> {
    /// Search every root move at `depth`. Returns `None` if the search was
    /// stopped before the iteration finished.
    fn search_root(
        &mut self,
        pos: &Position,
        root_moves: &MoveList,
        mut depth: i32,
        mut alpha: i32,
        beta: i32,
    ) -> Option<(Move, i32)> {
        self.nodes += 1;
        self.state.stats.nodes += 1;

        let in_check = pos.in_check();
        if in_check {
            depth += 1;
        }

        let tt_move = self.state.tt.probe(pos.hash()).and_then(|e| e.best_move());
        let mut scored = score_moves(pos, root_moves, tt_move);

        let mut best_score = -INF;
        let mut best_move = None;
        let mut bound = BoundType::UpperBound;

        self.path.push(pos.hash());
        for i in 0..scored.len() {
            let Some(candidate) = scored.pick_best(i) else {
                break;
            };
            let mv = candidate.mv;
            let score = -self.negamax(&pos.apply_move(mv), depth - 1, 1, -beta, -alpha, true);
            if self.stopped {
                self.path.pop();
                return None;
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

        self.store_tt(pos, depth, best_score, bound, best_move, 0);
        best_move.map(|mv| (mv, best_score))
    }

    fn report(&self, depth: u32, score: i32, pv: &[Move]) {
        let time_ms = self.start_time.elapsed().as_millis() as u64;
        let nps = if time_ms > 0 {
            self.nodes * 1000 / time_ms
        } else {
            0
        };
        log::debug!(
            "depth {depth} score {score} nodes {} time {time_ms}ms pv {}",
            self.nodes,
            pv.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
        );

        if let Some(cb) = &self.info_callback {
            let info = SearchIterationInfo {
                depth,
                seldepth: self.state.stats.seldepth,
                score,
                mate_in: mate_in(score),
                nodes: self.nodes,
                nps,
                time_ms,
                hashfull: self.state.tt.hashfull_per_mille(),
                pv: pv.to_vec(),
            };
            cb(&info);
        }
    }

    /// Iterative deepening with aspiration windows. Only fully searched
    /// iterations contribute to the result.
    fn iterative_deepening(&mut self, pos: &Position, root_moves: &MoveList, max_depth: u32) -> SearchResult {
        let mut result = SearchResult::default();
        let window = self.state.params.aspiration_window;
        let (mut alpha, mut beta) = (-INF, INF);
        let mut depth = 1u32;

        while depth <= max_depth {
            let Some((mv, score)) = self.search_root(pos, root_moves, depth as i32, alpha, beta) else {
                break;
            };

            if score <= alpha {
                log::trace!("depth {depth}: fail low at {score}, widening alpha");
                alpha = -INF;
                continue;
            }
            if score >= beta {
                log::trace!("depth {depth}: fail high at {score}, widening beta");
                beta = INF;
                continue;
            }

            let pv = self.extract_pv(pos, mv, depth as usize);
            self.report(depth, score, &pv);
            result = SearchResult {
                best_move: Some(mv),
                score,
                depth,
                pv,
                nodes: self.nodes,
            };

            alpha = score.saturating_sub(window).max(-INF);
            beta = score.saturating_add(window).min(INF);
            depth += 1;
        }
        result
    }
}

/// Run a full search from `position`.
pub(in crate::board::search) fn run(
    position: &Position,
    state: &mut SearchState,
    config: SearchConfig,
    stop: &AtomicBool,
) -> SearchResult {
    state.generation = state.generation.wrapping_add(1);
    state.stats = SearchStats::default();

    let root_moves = position.legal_moves();
    if root_moves.is_empty() {
        let score = if position.in_check() { -INF } else { 0 };
        log::info!("no legal moves, score {score}");
        return SearchResult {
            score,
            ..SearchResult::default()
        };
    }

    let mut max_depth = config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH).clamp(1, DEFAULT_MAX_DEPTH);
    if root_moves.len() == 1 {
        max_depth = 1;
    }

    let SearchConfig {
        time_limit_ms,
        node_limit,
        history,
        info_callback,
        ..
    } = config;

    let mut ctx = SearchContext {
        state,
        stop,
        start_time: Instant::now(),
        time_limit_ms,
        node_limit,
        nodes: 0,
        stopped: false,
        path: history,
        info_callback,
    };

    let mut result = ctx.iterative_deepening(position, &root_moves, max_depth);
    if result.best_move.is_none() {
        // Stopped before depth 1 finished: fall back to the first ordered move
        let ordered = score_moves(position, &root_moves, None).pick_best(0).map(|s| s.mv);
        result.best_move = ordered.or_else(|| root_moves.first());
        result.pv = result.best_move.into_iter().collect();
    }
    result.nodes = ctx.nodes;

    let elapsed = ctx.start_time.elapsed().as_millis();
    log::info!(
        "bestmove {} score {} depth {} nodes {} time {elapsed}ms",
        result.best_move.map_or_else(|| "none".to_string(), |mv| mv.to_string()),
        result.score,
        result.depth,
        result.nodes
    );
    result
}
