use super::super::attack_tables::king_attacks;
use super::super::types::{Bitboard, Move, MoveList, Square, KINGSIDE, QUEENSIDE};
use super::super::Position;
use super::GenMode;

impl Position {
    /// King steps onto squares the opponent does not attack. `danger` must
    /// have been computed with the king lifted off the board.
    pub(super) fn push_king_moves(
        &self,
        king: Square,
        danger: Bitboard,
        us_bb: Bitboard,
        them_bb: Bitboard,
        mode: GenMode,
        list: &mut MoveList,
    ) {
        let targets = king_attacks(king) & !(us_bb | danger);
        for to in targets & them_bb {
            list.push(Move::capture(king, to));
        }
        if mode == GenMode::All {
            for to in targets & !them_bb {
                list.push(Move::quiet(king, to));
            }
        }
    }

    /// Castling while not in check. The king and rook origins must be
    /// untouched, the path empty, and the king's path unattacked.
    pub(super) fn push_castles(&self, danger: Bitboard, all: Bitboard, list: &mut MoveList) {
        let us = self.side_to_move.index();

        let ks = &KINGSIDE[us];
        if (self.movements & ks.origins).is_empty()
            && ((all | (danger & !ks.ignore_danger)) & ks.blockers).is_empty()
        {
            list.push(Move::castle_kingside(ks.king_from, ks.king_to));
        }

        let qs = &QUEENSIDE[us];
        if (self.movements & qs.origins).is_empty()
            && ((all | (danger & !qs.ignore_danger)) & qs.blockers).is_empty()
        {
            list.push(Move::castle_queenside(qs.king_from, qs.king_to));
        }
    }
}
