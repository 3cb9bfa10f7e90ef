//! Position state: piece bitboards, mailbox, and the incremental hash and
//! evaluation that every mutation keeps in sync.
//!
//! Positions are values. `apply_move` returns a new position and never
//! touches the receiver, so search siblings cannot observe each other.

use std::fmt;

use super::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use super::pst::{eg_value, mg_value, phase_weight, TOTAL_PHASE};
use super::types::{
    Bitboard, CastlingRights, Color, ColoredPiece, Move, MoveKind, Piece, Square, KINGSIDE,
    QUEENSIDE,
};
use crate::zobrist::ZOBRIST;

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

#[derive(Clone)]
pub struct Position {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) mailbox: [Option<ColoredPiece>; 64],
    pub(crate) side_to_move: Color,
    /// Origin squares (king/rook) that have been vacated or captured on
    pub(crate) movements: Bitboard,
    pub(crate) en_passant: Option<Square>,
    pub(crate) hash: u64,
    pub(crate) half_move_clock: u32,
    pub(crate) full_move_count: u32,
    /// `TOTAL_PHASE` minus the phase weight of every piece on the board
    pub(crate) phase: i32,
    pub(crate) mg_score: i32,
    pub(crate) eg_score: i32,
}

impl Position {
    /// A board with no pieces, White to move. Only useful as a starting
    /// point for builders; it has no kings.
    pub(crate) fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            mailbox: [None; 64],
            side_to_move: Color::White,
            movements: Bitboard::EMPTY,
            en_passant: None,
            hash: 0,
            half_move_clock: 0,
            full_move_count: 1,
            phase: TOTAL_PHASE,
            mg_score: 0,
            eg_score: 0,
        }
    }

    /// The standard starting position
    #[must_use]
    pub fn startpos() -> Self {
        let mut pos = Position::empty();
        for (file, &piece) in BACK_RANK.iter().enumerate() {
            pos.set_piece(ColoredPiece::new(Color::White, piece), Square::from_index(file));
            pos.set_piece(
                ColoredPiece::new(Color::White, Piece::Pawn),
                Square::from_index(8 + file),
            );
            pos.set_piece(
                ColoredPiece::new(Color::Black, Piece::Pawn),
                Square::from_index(48 + file),
            );
            pos.set_piece(ColoredPiece::new(Color::Black, piece), Square::from_index(56 + file));
        }
        pos
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.mailbox[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// All pieces of one side
    #[inline]
    #[must_use]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.occupied[0] | self.occupied[1]
    }

    /// Bishops and queens of one side
    #[inline]
    #[must_use]
    pub fn diagonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, Piece::Bishop) | self.pieces(color, Piece::Queen)
    }

    /// Rooks and queens of one side
    #[inline]
    #[must_use]
    pub fn orthogonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, Piece::Rook) | self.pieces(color, Piece::Queen)
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, Piece::King).lsb()
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn half_move_clock(&self) -> u32 {
        self.half_move_clock
    }

    #[inline]
    #[must_use]
    pub fn full_move_count(&self) -> u32 {
        self.full_move_count
    }

    #[inline]
    #[must_use]
    pub fn movements(&self) -> Bitboard {
        self.movements
    }

    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        CastlingRights::from_movements(self.movements)
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> i32 {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn mg_score(&self) -> i32 {
        self.mg_score
    }

    #[inline]
    #[must_use]
    pub fn eg_score(&self) -> i32 {
        self.eg_score
    }

    // ------------------------------------------------------------------
    // Primitive mutators. Everything else is built from these three so the
    // hash and score bookkeeping lives in one place.
    // ------------------------------------------------------------------

    pub(crate) fn set_piece(&mut self, piece: ColoredPiece, sq: Square) {
        debug_assert!(self.mailbox[sq.index()].is_none(), "square {sq} occupied");
        let bit = sq.bitboard();
        let (c, p) = (piece.color().index(), piece.piece().index());
        self.pieces[c][p] |= bit;
        self.occupied[c] |= bit;
        self.mailbox[sq.index()] = Some(piece);
        self.hash ^= ZOBRIST.piece(piece, sq);
        self.mg_score += mg_value(piece, sq);
        self.eg_score += eg_value(piece, sq);
        self.phase -= phase_weight(piece.piece());
    }

    pub(crate) fn remove_piece(&mut self, sq: Square) {
        let Some(piece) = self.mailbox[sq.index()].take() else {
            debug_assert!(false, "no piece on {sq}");
            return;
        };
        let bit = sq.bitboard();
        let (c, p) = (piece.color().index(), piece.piece().index());
        self.pieces[c][p] ^= bit;
        self.occupied[c] ^= bit;
        self.hash ^= ZOBRIST.piece(piece, sq);
        self.mg_score -= mg_value(piece, sq);
        self.eg_score -= eg_value(piece, sq);
        self.phase += phase_weight(piece.piece());
    }

    pub(crate) fn move_piece_quiet(&mut self, from: Square, to: Square) {
        let Some(piece) = self.mailbox[from.index()].take() else {
            debug_assert!(false, "no piece on {from}");
            return;
        };
        debug_assert!(self.mailbox[to.index()].is_none(), "square {to} occupied");
        let mask = from.bitboard() | to.bitboard();
        let (c, p) = (piece.color().index(), piece.piece().index());
        self.pieces[c][p] ^= mask;
        self.occupied[c] ^= mask;
        self.mailbox[to.index()] = Some(piece);
        self.hash ^= ZOBRIST.piece(piece, from) ^ ZOBRIST.piece(piece, to);
        self.mg_score += mg_value(piece, to) - mg_value(piece, from);
        self.eg_score += eg_value(piece, to) - eg_value(piece, from);
    }

    pub(crate) fn set_en_passant(&mut self, sq: Square) {
        self.clear_en_passant();
        self.en_passant = Some(sq);
        self.hash ^= ZOBRIST.en_passant(sq);
    }

    pub(crate) fn clear_en_passant(&mut self) {
        if let Some(sq) = self.en_passant.take() {
            self.hash ^= ZOBRIST.en_passant(sq);
        }
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        if self.side_to_move != color {
            self.side_to_move = color;
            self.hash ^= ZOBRIST.side();
        }
    }

    // ------------------------------------------------------------------
    // Move application
    // ------------------------------------------------------------------

    /// Return the position after `mv`, which must be legal here.
    #[must_use]
    pub fn apply_move(&self, mv: Move) -> Position {
        if mv.is_null() {
            return self.apply_null_move();
        }

        let mut next = self.clone();
        let us = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());

        next.half_move_clock += 1;
        if us == Color::Black {
            next.full_move_count += 1;
        }
        next.movements |= from.bitboard() | to.bitboard();
        next.clear_en_passant();
        if self.pieces(us, Piece::Pawn).contains(from) {
            next.half_move_clock = 0;
        }

        match mv.kind() {
            MoveKind::Quiet => next.move_piece_quiet(from, to),
            MoveKind::DoublePawnPush => {
                next.move_piece_quiet(from, to);
                next.set_en_passant(from.offset(us.forward()));
            }
            MoveKind::KingCastle | MoveKind::QueenCastle => {
                let path = if mv.kind() == MoveKind::KingCastle {
                    &KINGSIDE[us.index()]
                } else {
                    &QUEENSIDE[us.index()]
                };
                next.move_piece_quiet(path.king_from, path.king_to);
                next.move_piece_quiet(path.rook_from, path.rook_to);
            }
            MoveKind::Capture => {
                next.half_move_clock = 0;
                next.remove_piece(to);
                next.move_piece_quiet(from, to);
            }
            MoveKind::EnPassant => {
                next.move_piece_quiet(from, to);
                next.remove_piece(to.offset(-us.forward()));
            }
            MoveKind::Promotion(piece) => {
                next.remove_piece(from);
                next.set_piece(ColoredPiece::new(us, piece), to);
            }
            MoveKind::PromotionCapture(piece) => {
                next.remove_piece(from);
                next.remove_piece(to);
                next.set_piece(ColoredPiece::new(us, piece), to);
            }
            MoveKind::Null => {}
        }

        next.side_to_move = us.opponent();
        next.hash ^= ZOBRIST.side();
        next
    }

    /// Pass the turn. Used by null-move pruning only.
    #[must_use]
    pub fn apply_null_move(&self) -> Position {
        let mut next = self.clone();
        next.half_move_clock += 1;
        next.clear_en_passant();
        next.side_to_move = self.side_to_move.opponent();
        next.hash ^= ZOBRIST.side();
        next
    }

    // ------------------------------------------------------------------
    // Attack queries
    // ------------------------------------------------------------------

    /// Pieces of `by` (king excluded) attacking `sq` with the given occupancy
    #[inline]
    #[must_use]
    pub fn attackers_from(&self, sq: Square, occ: Bitboard, by: Color) -> Bitboard {
        (pawn_attacks(sq, by.opponent()) & self.pieces(by, Piece::Pawn))
            | (knight_attacks(sq) & self.pieces(by, Piece::Knight))
            | (bishop_attacks(sq, occ) & self.diagonal_sliders(by))
            | (rook_attacks(sq, occ) & self.orthogonal_sliders(by))
    }

    /// Pieces of `by` attacking `sq`, king included
    #[inline]
    #[must_use]
    pub fn attackers_from_including_king(&self, sq: Square, occ: Bitboard, by: Color) -> Bitboard {
        self.attackers_from(sq, occ, by) | (king_attacks(sq) & self.pieces(by, Piece::King))
    }

    #[inline]
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.attackers_from_including_king(sq, self.occupied(), by)
            .is_nonempty()
    }

    /// Whether the side to move is in check, computed from scratch
    #[must_use]
    pub fn is_king_attacked(&self) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        let king = self.king_square(us);
        let occ = self.occupied();

        (pawn_attacks(king, us) & self.pieces(them, Piece::Pawn)).is_nonempty()
            || (knight_attacks(king) & self.pieces(them, Piece::Knight)).is_nonempty()
            || (bishop_attacks(king, occ) & self.diagonal_sliders(them)).is_nonempty()
            || (rook_attacks(king, occ) & self.orthogonal_sliders(them)).is_nonempty()
    }

    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.is_king_attacked()
    }

    /// Pieces currently giving check to the side to move
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        self.attackers_from(self.king_square(us), self.occupied(), us.opponent())
    }

    #[must_use]
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        (self.pieces(color, Piece::Knight)
            | self.diagonal_sliders(color)
            | self.pieces(color, Piece::Rook))
        .is_nonempty()
    }

    #[inline]
    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.half_move_clock >= 100
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Midgame/endgame blend of the incremental scores, White-positive
    #[inline]
    #[must_use]
    pub fn interpolated_score(&self) -> i32 {
        let phase = self.phase.clamp(0, TOTAL_PHASE);
        let p = (phase * 256 + TOTAL_PHASE / 2) / TOTAL_PHASE;
        (self.mg_score * (256 - p) + self.eg_score * p) / 256
    }

    /// Static evaluation from the side to move's point of view
    #[inline]
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        self.interpolated_score() * self.side_to_move.sign()
    }

    // ------------------------------------------------------------------
    // Verification helpers
    // ------------------------------------------------------------------

    /// Hash recomputed from the board
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let mut hash = ZOBRIST.side_for(self.side_to_move);
        for sq in Square::all() {
            if let Some(piece) = self.piece_at(sq) {
                hash ^= ZOBRIST.piece(piece, sq);
            }
        }
        if let Some(ep) = self.en_passant {
            hash ^= ZOBRIST.en_passant(ep);
        }
        hash
    }

    /// Check every internal invariant and describe the first violation.
    pub fn validate(&self) -> Result<(), String> {
        let mut union = Bitboard::EMPTY;
        for color in Color::BOTH {
            let mut side = Bitboard::EMPTY;
            for piece in Piece::ALL {
                let bb = self.pieces(color, piece);
                if (union & bb).is_nonempty() {
                    return Err(format!("{color} {piece:?} overlaps another bitboard"));
                }
                union |= bb;
                side |= bb;
            }
            if side != self.occupancy(color) {
                return Err(format!("{color} occupancy cache is stale"));
            }
            if self.pieces(color, Piece::King).popcount() != 1 {
                return Err(format!("{color} does not have exactly one king"));
            }
        }

        let (mut mg, mut eg, mut phase) = (0, 0, TOTAL_PHASE);
        for sq in Square::all() {
            match self.piece_at(sq) {
                Some(piece) => {
                    if !self.pieces(piece.color(), piece.piece()).contains(sq) {
                        return Err(format!("mailbox has {piece:?} on {sq}, bitboard does not"));
                    }
                    mg += mg_value(piece, sq);
                    eg += eg_value(piece, sq);
                    phase -= phase_weight(piece.piece());
                }
                None if union.contains(sq) => {
                    return Err(format!("bitboard has a piece on {sq}, mailbox is empty"));
                }
                None => {}
            }
        }

        if self.hash != self.compute_hash() {
            return Err("incremental hash differs from recomputed hash".to_string());
        }
        if (mg, eg, phase) != (self.mg_score, self.eg_score, self.phase) {
            return Err("incremental scores differ from recomputed scores".to_string());
        }
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +---+---+---+---+---+---+---+---+")?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8 {
                let sq = Square::from_index(rank * 8 + file);
                let c = self.piece_at(sq).map_or(' ', |p| p.to_fen_char());
                write!(f, " {c} |")?;
            }
            writeln!(f)?;
            writeln!(f, "  +---+---+---+---+---+---+---+---+")?;
        }
        writeln!(f, "    a   b   c   d   e   f   g   h")?;
        writeln!(f)?;
        writeln!(f, "FEN: {}", self.to_fen())?;
        write!(f, "Hash: {:016x}", self.hash)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}
