//! Legal move generation.
//!
//! Moves are generated strictly legal in one pass: king moves are filtered
//! against the opponent's attack set (computed with our king removed so that
//! sliders see through it), checkers and pinned pieces are found with one
//! x-ray scan from the king, and everything else is restricted to capture and
//! quiet masks derived from the check state.

mod kings;
mod pawns;
mod pieces;

use super::attack_tables::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, pawn_attacks_set,
    rook_attacks,
};
use super::types::{Bitboard, Color, Move, MoveList, Piece, Square};
use super::Position;

/// Which subset of the legal moves to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenMode {
    /// Every legal move
    All,
    /// Legal captures (en passant and king captures included) and
    /// promotions; no quiet king moves or castling
    Quiescence,
}

/// Per-call generation state shared by the piece generators.
pub(super) struct GenContext {
    pub us: Color,
    pub them: Color,
    pub king: Square,
    pub all: Bitboard,
    pub us_bb: Bitboard,
    pub them_bb: Bitboard,
    pub pinned: Bitboard,
    /// Squares a capture may land on
    pub capture_mask: Bitboard,
    /// Empty squares a non-capture may land on
    pub quiet_mask: Bitboard,
    pub mode: GenMode,
}

impl Position {
    /// Fill `list` with the legal moves of `mode` and return the pieces
    /// giving check to the side to move.
    pub fn generate(&self, mode: GenMode, list: &mut MoveList) -> Bitboard {
        list.clear();

        let us = self.side_to_move;
        let them = us.opponent();
        let us_bb = self.occupancy(us);
        let them_bb = self.occupancy(them);
        let all = us_bb | them_bb;
        let king = self.king_square(us);

        let danger = self.danger_squares(them, all ^ king.bitboard());
        self.push_king_moves(king, danger, us_bb, them_bb, mode, list);

        // Knights and pawns check directly. Sliders are found by looking from
        // the king through our own pieces: none in between means check,
        // exactly one means that piece is pinned.
        let mut checkers = (knight_attacks(king) & self.pieces(them, Piece::Knight))
            | (pawn_attacks(king, us) & self.pieces(them, Piece::Pawn));
        let mut pinned = Bitboard::EMPTY;
        let candidates = (rook_attacks(king, them_bb) & self.orthogonal_sliders(them))
            | (bishop_attacks(king, them_bb) & self.diagonal_sliders(them));
        for sq in candidates {
            let blockers = between(king, sq) & us_bb;
            if blockers.is_empty() {
                checkers |= sq.bitboard();
            } else if !blockers.has_many() {
                pinned |= blockers;
            }
        }

        let mut ctx = GenContext {
            us,
            them,
            king,
            all,
            us_bb,
            them_bb,
            pinned,
            capture_mask: them_bb,
            quiet_mask: !all,
            mode,
        };

        match checkers.popcount() {
            0 => {
                self.push_en_passant(&ctx, list);
                if mode == GenMode::All {
                    self.push_castles(danger, all, list);
                }
                self.push_pinned_moves(&ctx, list);
            }
            1 => {
                let checker = checkers.lsb();
                match self.piece_at(checker).map(|p| p.piece()) {
                    Some(Piece::Pawn | Piece::Knight) => {
                        let ep_victim = self.en_passant.map(|ep| ep.offset(-us.forward()));
                        if ep_victim == Some(checker) {
                            self.push_en_passant(&ctx, list);
                        }
                        self.push_checker_captures(&ctx, checker, list);
                        return checkers;
                    }
                    _ => {
                        // a lone slider check: the post-capture slider test
                        // accepts an en passant only if it blocks the ray
                        self.push_en_passant(&ctx, list);
                        ctx.capture_mask = checkers;
                        ctx.quiet_mask = between(king, checker);
                    }
                }
            }
            _ => return checkers,
        }

        self.push_piece_moves(&ctx, list);
        self.push_pawn_moves(&ctx, list);
        checkers
    }

    /// All legal moves
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        self.generate(GenMode::All, &mut list);
        list
    }

    /// Legal captures and promotions
    #[must_use]
    pub fn quiescence_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        self.generate(GenMode::Quiescence, &mut list);
        list
    }

    /// Look up the legal move with these squares and promotion piece.
    #[must_use]
    pub fn find_move(&self, from: Square, to: Square, promotion: Option<Piece>) -> Option<Move> {
        self.legal_moves()
            .into_iter()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion() == promotion)
    }

    /// Every square `by` attacks given `occ`
    pub(crate) fn danger_squares(&self, by: Color, occ: Bitboard) -> Bitboard {
        let mut danger = pawn_attacks_set(self.pieces(by, Piece::Pawn), by)
            | king_attacks(self.king_square(by));
        for sq in self.pieces(by, Piece::Knight) {
            danger |= knight_attacks(sq);
        }
        for sq in self.diagonal_sliders(by) {
            danger |= bishop_attacks(sq, occ);
        }
        for sq in self.orthogonal_sliders(by) {
            danger |= rook_attacks(sq, occ);
        }
        danger
    }

    /// Captures of a lone pawn or knight checker. Blocking is impossible.
    fn push_checker_captures(&self, ctx: &GenContext, checker: Square, list: &mut MoveList) {
        let capturers = self.attackers_from(checker, ctx.all, ctx.us) & !ctx.pinned;
        let promo_rank = pawns::promotion_rank(ctx.us);
        for from in capturers {
            if self.pieces(ctx.us, Piece::Pawn).contains(from) && promo_rank.contains(from) {
                pawns::push_promotions(from, checker, true, list);
            } else {
                list.push(Move::capture(from, checker));
            }
        }
    }

    /// En passant captures that leave our king safe from sliders. Pins and
    /// the rank discovery through both pawns are caught by re-testing the
    /// king on the post-capture occupancy. Callers rule out leaper checks.
    fn push_en_passant(&self, ctx: &GenContext, list: &mut MoveList) {
        let Some(ep) = self.en_passant else {
            return;
        };
        let captured = ep.offset(-ctx.us.forward());
        let capturers = pawn_attacks(ep, ctx.them) & self.pieces(ctx.us, Piece::Pawn);
        for from in capturers {
            let occ = ctx.all ^ from.bitboard() ^ captured.bitboard() ^ ep.bitboard();
            let exposed = (rook_attacks(ctx.king, occ) & self.orthogonal_sliders(ctx.them))
                | (bishop_attacks(ctx.king, occ) & self.diagonal_sliders(ctx.them));
            if exposed.is_empty() {
                list.push(Move::en_passant(from, ep));
            }
        }
    }
}
