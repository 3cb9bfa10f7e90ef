//! Null move pruning.

use super::super::constants::NULL_MOVE_DEEP_DEPTH;
use super::SearchContext;
use crate::board::Position;

impl SearchContext<'_> {
    /// Give the opponent a free move; if a reduced search still fails high
    /// the node is cut. Returns the cutoff score when it applies.
    ///
    /// Unsound in zugzwang positions.
    pub(super) fn try_null_move(
        &mut self,
        pos: &Position,
        depth: i32,
        ply: usize,
        beta: i32,
    ) -> Option<i32> {
        let params = &self.state.params;
        if !params.null_move
            || ply == 0
            || depth < params.null_min_depth
            || !pos.has_non_pawn_material(pos.side_to_move())
            || pos.evaluate() < beta
        {
            return None;
        }

        let r = if depth > NULL_MOVE_DEEP_DEPTH { 3 } else { 2 };
        let child = pos.apply_null_move();

        // Nothing before a passed turn can repeat below it
        let saved_path = std::mem::take(&mut self.path);
        let score = -self.negamax(&child, depth - r - 1, ply + 1, -beta, -beta + 1, false);
        self.path = saved_path;

        if self.stopped {
            return None;
        }
        (score >= beta).then_some(beta)
    }
}
