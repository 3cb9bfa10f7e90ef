use super::super::attack_tables::{
    line, pawn_attacks, pawn_attacks_east, pawn_attacks_west, pawn_capture_origins,
};
use super::super::types::{Bitboard, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES};
use super::super::Position;
use super::{GenContext, GenMode};

/// Rank a pawn of `color` promotes from
#[inline]
pub(super) fn promotion_rank(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard::RANK_7,
        Color::Black => Bitboard::RANK_2,
    }
}

/// Rank a pawn of `color` lands on after a single push from its start rank
#[inline]
fn double_push_rank(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard::RANK_3,
        Color::Black => Bitboard::RANK_6,
    }
}

/// Emit one move per promotion piece, queen first.
pub(super) fn push_promotions(from: Square, to: Square, capture: bool, list: &mut MoveList) {
    for piece in PROMOTION_PIECES {
        let mv = if capture {
            Move::new_promotion_capture(from, to, piece)
        } else {
            Move::new_promotion(from, to, piece)
        };
        list.push(mv);
    }
}

impl Position {
    /// Pushes and captures for unpinned pawns, restricted to the context
    /// masks. Promotions are emitted in every mode.
    pub(super) fn push_pawn_moves(&self, ctx: &GenContext, list: &mut MoveList) {
        let us = ctx.us;
        let white = us == Color::White;
        let forward = us.forward();
        let pawns = self.pieces(us, Piece::Pawn) & !ctx.pinned;
        let promo_rank = promotion_rank(us);
        let (west_origin, east_origin) = pawn_capture_origins(us);

        let regular = pawns & !promo_rank;
        if ctx.mode == GenMode::All {
            let single = regular.shift_forward(white) & !ctx.all;
            let double = (single & double_push_rank(us)).shift_forward(white) & ctx.quiet_mask;
            for to in single & ctx.quiet_mask {
                list.push(Move::quiet(to.offset(-forward), to));
            }
            for to in double {
                list.push(Move::double_pawn_push(to.offset(-2 * forward), to));
            }
        }
        for to in pawn_attacks_west(regular, us) & ctx.capture_mask {
            list.push(Move::capture(to.offset(west_origin), to));
        }
        for to in pawn_attacks_east(regular, us) & ctx.capture_mask {
            list.push(Move::capture(to.offset(east_origin), to));
        }

        let promoting = pawns & promo_rank;
        if promoting.is_empty() {
            return;
        }
        for to in promoting.shift_forward(white) & ctx.quiet_mask {
            push_promotions(to.offset(-forward), to, false, list);
        }
        for to in pawn_attacks_west(promoting, us) & ctx.capture_mask {
            push_promotions(to.offset(west_origin), to, true, list);
        }
        for to in pawn_attacks_east(promoting, us) & ctx.capture_mask {
            push_promotions(to.offset(east_origin), to, true, list);
        }
    }

    /// A pinned pawn may still capture its pinner or advance along a
    /// vertical pin.
    pub(super) fn push_pinned_pawn(&self, from: Square, ctx: &GenContext, list: &mut MoveList) {
        let us = ctx.us;
        let pin_line = line(ctx.king, from);
        let promotes = promotion_rank(us).contains(from);

        for to in pawn_attacks(from, us) & ctx.them_bb & pin_line {
            if promotes {
                push_promotions(from, to, true, list);
            } else {
                list.push(Move::capture(from, to));
            }
        }

        let one = from.offset(us.forward());
        if ctx.all.contains(one) || !pin_line.contains(one) {
            return;
        }
        if promotes {
            push_promotions(from, one, false, list);
        } else if ctx.mode == GenMode::All {
            list.push(Move::quiet(from, one));
            if double_push_rank(us).contains(one) {
                let two = one.offset(us.forward());
                if !ctx.all.contains(two) {
                    list.push(Move::double_pawn_push(from, two));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::Position;
    use super::*;

    fn moves(fen: &str) -> Vec<String> {
        let pos: Position = fen.parse().expect("valid FEN");
        let mut moves: Vec<String> = pos.legal_moves().iter().map(ToString::to_string).collect();
        moves.sort();
        moves
    }

    #[test]
    fn promotion_offers_four_pieces() {
        let pos: Position = "3r3k/4P3/8/8/8/8/8/K7 w - - 0 1".parse().expect("valid FEN");
        let promos: Vec<Move> = pos
            .legal_moves()
            .iter()
            .copied()
            .filter(|m| m.is_promotion())
            .collect();
        assert_eq!(promos.len(), 8);
        assert_eq!(promos.iter().filter(|m| m.is_capture()).count(), 4);
    }

    #[test]
    fn quiescence_keeps_quiet_promotions() {
        let pos: Position = "7k/4P3/8/8/8/8/8/K7 w - - 0 1".parse().expect("valid FEN");
        let quiet = pos.quiescence_moves();
        assert_eq!(quiet.len(), 4);
        assert!(quiet.iter().all(|m| m.is_promotion()));
    }

    #[test]
    fn vertically_pinned_pawn_pushes() {
        let all = moves("4r2k/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert!(all.contains(&"e2e3".to_string()));
        assert!(all.contains(&"e2e4".to_string()));
    }

    #[test]
    fn diagonally_pinned_pawn_captures_pinner_only() {
        let all = moves("7k/8/8/8/8/2b5/3P4/4K3 w - - 0 1");
        let pawn: Vec<&String> = all.iter().filter(|m| m.starts_with("d2")).collect();
        assert_eq!(pawn, vec!["d2c3"]);
    }

    #[test]
    fn pinned_pawn_promotes_by_capturing_pinner() {
        // pawn on g7 pinned by the bishop on h8 against the king on a1
        let all = moves("4k2b/6P1/8/8/8/8/8/K7 w - - 0 1");
        let pawn: Vec<&String> = all.iter().filter(|m| m.starts_with("g7")).collect();
        assert_eq!(pawn, vec!["g7h8b", "g7h8n", "g7h8q", "g7h8r"]);
    }

    #[test]
    fn black_pawns_move_down() {
        let all = moves("4k3/3p4/8/8/8/8/8/4K3 b - - 0 1");
        assert!(all.contains(&"d7d6".to_string()));
        assert!(all.contains(&"d7d5".to_string()));
    }
}
