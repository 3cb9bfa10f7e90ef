//! Move ordering for search.

use super::super::pst::mg_value;
use super::super::types::{ColoredPiece, Move, MoveList, Piece, ScoredMoveList};
use super::super::Position;
use super::constants::TT_MOVE_SCORE;

/// Placement gain of a move: the moving piece's table value at its
/// destination minus at its origin, plus whatever it captures, seen from
/// the mover.
pub(super) fn placement_delta(pos: &Position, mv: Move) -> i32 {
    let us = pos.side_to_move();
    let Some(mover) = pos.piece_at(mv.from()) else {
        return 0;
    };
    let landed = mv
        .promotion()
        .map_or(mover, |piece| ColoredPiece::new(us, piece));

    let mut delta = mg_value(landed, mv.to()) - mg_value(mover, mv.from());
    if mv.is_en_passant() {
        let victim = ColoredPiece::new(us.opponent(), Piece::Pawn);
        delta -= mg_value(victim, mv.to().offset(-us.forward()));
    } else if let Some(victim) = pos.piece_at(mv.to()) {
        delta -= mg_value(victim, mv.to());
    }
    delta * us.sign()
}

/// Score every move for selection; the hash move goes first.
pub(super) fn score_moves(
    pos: &Position,
    moves: &MoveList,
    tt_move: Option<Move>,
) -> ScoredMoveList {
    let mut scored = ScoredMoveList::new();
    for &mv in moves {
        let score = if Some(mv) == tt_move {
            TT_MOVE_SCORE
        } else {
            placement_delta(pos, mv)
        };
        scored.push(mv, score);
    }
    scored
}
