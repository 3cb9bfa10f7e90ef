//! Castling rights type and the fixed castling geometry.
//!
//! Rights are never stored directly on a position. A position records which
//! king and rook origin squares have ever been vacated (its `movements`
//! bitboard); a right exists exactly when neither of its squares is in that
//! set.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::bitboard::Bitboard;
use super::piece::Color;
use super::square::Square;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// Static description of one castling move.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CastlePath {
    /// King and rook origin squares; any of them in `movements` forbids castling
    pub origins: Bitboard,
    /// Squares that must be empty and not attacked (subject to `ignore_danger`)
    pub blockers: Bitboard,
    /// Squares whose attack status does not matter (b-file on the long side)
    pub ignore_danger: Bitboard,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
}

const fn path(
    origins: u64,
    blockers: u64,
    ignore_danger: u64,
    squares: [Square; 4],
) -> CastlePath {
    CastlePath {
        origins: Bitboard(origins),
        blockers: Bitboard(blockers),
        ignore_danger: Bitboard(ignore_danger),
        king_from: squares[0],
        king_to: squares[1],
        rook_from: squares[2],
        rook_to: squares[3],
    }
}

/// Kingside castling per color (White, Black)
pub(crate) const KINGSIDE: [CastlePath; 2] = [
    path(
        0x90,
        0x60,
        0,
        [Square::E1, Square::G1, Square::H1, Square::F1],
    ),
    path(
        0x90 << 56,
        0x60 << 56,
        0,
        [Square::E8, Square::G8, Square::H8, Square::F8],
    ),
];

/// Queenside castling per color (White, Black)
pub(crate) const QUEENSIDE: [CastlePath; 2] = [
    path(
        0x11,
        0x0E,
        0x02,
        [Square::E1, Square::C1, Square::A1, Square::D1],
    ),
    path(
        0x11 << 56,
        0x0E << 56,
        0x02 << 56,
        [Square::E8, Square::C8, Square::A8, Square::D8],
    ),
];

/// Castling rights represented as a bitmask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// Derive rights from a `movements` bitboard.
    #[must_use]
    pub(crate) fn from_movements(movements: Bitboard) -> Self {
        let mut rights = CastlingRights::none();
        for color in Color::BOTH {
            if (movements & KINGSIDE[color.index()].origins).is_empty() {
                rights.set(color, true);
            }
            if (movements & QUEENSIDE[color.index()].origins).is_empty() {
                rights.set(color, false);
            }
        }
        rights
    }

    /// Check if a specific castling right is set
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    /// Set a specific castling right
    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

impl std::fmt::Display for CastlingRights {
    /// FEN castling field (`KQkq` subset or `-`)
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.has(color, kingside) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
