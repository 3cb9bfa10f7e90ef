//! Quiescence search.
//!
//! Resolves captures and promotions below the main search horizon so that
//! leaves are only evaluated in quiet positions.

use super::super::move_order::score_moves;
use super::SearchContext;
use crate::board::{GenMode, MoveList, Piece, Position, MAX_PLY};

impl SearchContext<'_> {
    pub(super) fn quiescence(&mut self, pos: &Position, ply: usize, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        self.state.stats.qnodes += 1;
        if self.should_stop() {
            return 0;
        }
        if ply >= MAX_PLY {
            return pos.evaluate();
        }
        self.update_seldepth(ply);

        // Stand pat, even in check: only captures and promotions follow
        let stand_pat = pos.evaluate();
        if stand_pat >= beta {
            self.state.stats.qleaves += 1;
            return stand_pat;
        }
        alpha = alpha.max(stand_pat);
        let mut best_score = stand_pat;

        let mut moves = MoveList::new();
        pos.generate(GenMode::Quiescence, &mut moves);

        let mut scored = score_moves(pos, &moves, None);
        let mut searched = 0;
        for i in 0..scored.len() {
            let Some(candidate) = scored.pick_best(i) else {
                break;
            };
            let mv = candidate.mv;
            if matches!(mv.promotion(), Some(p) if p != Piece::Queen) {
                continue;
            }

            searched += 1;
            let score = -self.quiescence(&pos.apply_move(mv), ply + 1, -beta, -alpha);
            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    alpha = score;
                    if alpha >= beta {
                        self.state.stats.beta_cutoffs += 1;
                        break;
                    }
                }
            }
        }

        if searched == 0 {
            self.state.stats.qleaves += 1;
        }
        best_score
    }
}
