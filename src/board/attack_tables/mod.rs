//! Attack tables for move generation.
//!
//! Leaper attacks (knight, king, pawn) are plain per-square lookups. Slider
//! attacks use the obstruction-difference technique: for each of the four
//! line directions a square has a lower and an upper half-ray, and the
//! visible part of the line follows from the nearest blocker on each side
//! with one leading-zero count, one isolated-lsb and one subtraction. No
//! loops, no branches.

#![allow(clippy::inline_always)] // Performance-critical hot path functions

mod rays;
mod tables;

use rays::{line_attacks, ANTI_DIAGONAL, DIAGONAL, HORIZONTAL, LINE_MASKS, VERTICAL};
use tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};

use super::types::{Bitboard, Color, Piece, Square};

const NOT_FILE_A: u64 = !Bitboard::FILE_A.0;
const NOT_FILE_H: u64 = !Bitboard::FILE_H.0;

#[inline(always)]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.index()])
}

#[inline(always)]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.index()])
}

/// Squares a pawn of `color` standing on `sq` attacks
#[inline(always)]
#[must_use]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    Bitboard(PAWN_ATTACKS[color.index()][sq.index()])
}

/// Capture targets toward the a-file for a set of pawns
#[inline(always)]
#[must_use]
pub(crate) fn pawn_attacks_west(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard((pawns.0 & NOT_FILE_A) << 7),
        Color::Black => Bitboard((pawns.0 & NOT_FILE_A) >> 9),
    }
}

/// Capture targets toward the h-file for a set of pawns
#[inline(always)]
#[must_use]
pub(crate) fn pawn_attacks_east(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard((pawns.0 & NOT_FILE_H) << 9),
        Color::Black => Bitboard((pawns.0 & NOT_FILE_H) >> 7),
    }
}

/// Index offsets from a west/east capture target back to the capturing pawn
#[inline(always)]
#[must_use]
pub(crate) const fn pawn_capture_origins(color: Color) -> (i8, i8) {
    match color {
        Color::White => (-7, -9),
        Color::Black => (9, 7),
    }
}

/// Every square attacked by a set of pawns
#[inline(always)]
#[must_use]
pub fn pawn_attacks_set(pawns: Bitboard, color: Color) -> Bitboard {
    pawn_attacks_west(pawns, color) | pawn_attacks_east(pawns, color)
}

#[inline(always)]
#[must_use]
pub fn bishop_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    let masks = &*LINE_MASKS;
    let idx = sq.index();
    Bitboard(
        line_attacks(occ.0, &masks[DIAGONAL][idx]) | line_attacks(occ.0, &masks[ANTI_DIAGONAL][idx]),
    )
}

#[inline(always)]
#[must_use]
pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    let masks = &*LINE_MASKS;
    let idx = sq.index();
    Bitboard(
        line_attacks(occ.0, &masks[HORIZONTAL][idx]) | line_attacks(occ.0, &masks[VERTICAL][idx]),
    )
}

#[inline(always)]
#[must_use]
pub fn queen_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    bishop_attacks(sq, occ) | rook_attacks(sq, occ)
}

/// Attacks of a non-pawn piece on `sq` given occupancy
#[inline]
#[must_use]
pub fn piece_attacks(piece: Piece, sq: Square, occ: Bitboard) -> Bitboard {
    match piece {
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occ),
        Piece::Rook => rook_attacks(sq, occ),
        Piece::Queen => queen_attacks(sq, occ),
        Piece::King => king_attacks(sq),
        Piece::Pawn => {
            debug_assert!(false, "pawn attacks depend on color");
            Bitboard::EMPTY
        }
    }
}

/// Squares strictly between two squares that share a rank, file, diagonal
/// or anti-diagonal; empty otherwise
#[inline(always)]
#[must_use]
pub fn between(a: Square, b: Square) -> Bitboard {
    Bitboard(rays::between(a.index(), b.index()))
}

/// The whole line (edge to edge) through two aligned squares; empty otherwise
#[inline(always)]
#[must_use]
pub fn line(a: Square, b: Square) -> Bitboard {
    Bitboard(rays::line(a.index(), b.index()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares
            .iter()
            .fold(Bitboard::EMPTY, |acc, s| acc | sq(s).bitboard())
    }

    /// Slow ray walk used as a reference for the bit tricks
    fn walk(from: Square, occ: Bitboard, dirs: &[(i32, i32)]) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;
        for &(df, dr) in dirs {
            let mut cur = from;
            while let Some(next) = cur.shifted(df, dr) {
                attacks |= next.bitboard();
                if occ.contains(next) {
                    break;
                }
                cur = next;
            }
        }
        attacks
    }

    const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
    const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];

    #[test]
    fn rook_on_empty_board() {
        assert_eq!(rook_attacks(sq("a1"), Bitboard::EMPTY).popcount(), 14);
        assert_eq!(rook_attacks(sq("d4"), Bitboard::EMPTY).popcount(), 14);
    }

    #[test]
    fn bishop_on_empty_board() {
        assert_eq!(bishop_attacks(sq("a1"), Bitboard::EMPTY).popcount(), 7);
        assert_eq!(bishop_attacks(sq("d4"), Bitboard::EMPTY).popcount(), 13);
    }

    #[test]
    fn rook_stops_at_blockers() {
        let occ = bb(&["d6", "b4", "d2", "g4"]);
        let expected = bb(&["d5", "d6", "c4", "b4", "d3", "d2", "e4", "f4", "g4"]);
        assert_eq!(rook_attacks(sq("d4"), occ), expected);
    }

    #[test]
    fn sliders_match_ray_walk() {
        let occupancies = [
            Bitboard::EMPTY,
            Bitboard(0xFFFF_0000_0000_FFFF),
            Bitboard(0x0042_1800_2400_8100),
            Bitboard(0x8100_0000_0000_0081),
            Bitboard(0x00AA_5500_0055_AA00),
        ];
        for occ in occupancies {
            for from in Square::all() {
                assert_eq!(
                    rook_attacks(from, occ),
                    walk(from, occ, &ROOK_DIRS),
                    "rook {from} occ {:#x}",
                    occ.0
                );
                assert_eq!(
                    bishop_attacks(from, occ),
                    walk(from, occ, &BISHOP_DIRS),
                    "bishop {from} occ {:#x}",
                    occ.0
                );
            }
        }
    }

    #[test]
    fn knight_and_king_counts() {
        assert_eq!(knight_attacks(sq("a1")).popcount(), 2);
        assert_eq!(knight_attacks(sq("e4")).popcount(), 8);
        assert_eq!(king_attacks(sq("h8")).popcount(), 3);
        assert_eq!(king_attacks(sq("e4")).popcount(), 8);
    }

    #[test]
    fn pawn_attacks_respect_edges() {
        assert_eq!(pawn_attacks(sq("a2"), Color::White), bb(&["b3"]));
        assert_eq!(pawn_attacks(sq("h7"), Color::Black), bb(&["g6"]));
        assert_eq!(pawn_attacks(sq("e4"), Color::Black), bb(&["d3", "f3"]));
        assert_eq!(
            pawn_attacks_set(bb(&["a2", "h2"]), Color::White),
            bb(&["b3", "g3"])
        );
        assert_eq!(pawn_attacks_west(bb(&["e5"]), Color::Black), bb(&["d4"]));
        assert_eq!(pawn_attacks_east(bb(&["e5"]), Color::Black), bb(&["f4"]));
    }

    #[test]
    fn between_on_every_line_kind() {
        assert_eq!(between(sq("a1"), sq("a4")), bb(&["a2", "a3"]));
        assert_eq!(between(sq("b2"), sq("e2")), bb(&["c2", "d2"]));
        assert_eq!(between(sq("a1"), sq("d4")), bb(&["b2", "c3"]));
        assert_eq!(between(sq("h1"), sq("e4")), bb(&["g2", "f3"]));
        assert_eq!(between(sq("e4"), sq("h1")), bb(&["g2", "f3"]));
        assert_eq!(between(sq("a1"), sq("a2")), Bitboard::EMPTY);
    }

    #[test]
    fn between_unaligned_is_empty() {
        assert_eq!(between(sq("a1"), sq("b3")), Bitboard::EMPTY);
        assert_eq!(between(sq("c1"), sq("h5")), Bitboard::EMPTY);
        assert_eq!(line(sq("a1"), sq("b3")), Bitboard::EMPTY);
    }

    #[test]
    fn line_spans_whole_board() {
        assert_eq!(line(sq("c3"), sq("e5")).popcount(), 8);
        assert!(line(sq("c3"), sq("e5")).contains(sq("a1")));
        assert!(line(sq("c3"), sq("e5")).contains(sq("h8")));
        assert_eq!(line(sq("b1"), sq("b7")), Bitboard::FILE_B);
        assert_eq!(line(sq("a6"), sq("c8")).popcount(), 3);
    }
}
