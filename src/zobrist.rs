//! Zobrist hashing for chess positions.
//!
//! A position hash is the XOR of one key per (piece, square) pair, the side
//! key when Black is to move, and the file key of the en passant target when
//! one is set. Castling state is not hashed separately.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Color, ColoredPiece, Square};

pub(crate) struct ZobristKeys {
    // piece_keys[color][piece_type][square_index]
    piece_keys: [[[u64; 64]; 6]; 2],
    black_to_move_key: u64,
    // en_passant_keys[file_index] (only file matters for EP target)
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64); // Use a fixed seed for reproducibility
        let mut piece_keys = [[[0; 64]; 6]; 2];
        let mut en_passant_keys = [0; 8];

        for color in &mut piece_keys {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, piece: ColoredPiece, sq: Square) -> u64 {
        self.piece_keys[piece.color().index()][piece.piece().index()][sq.index()]
    }

    #[inline]
    pub(crate) fn side(&self) -> u64 {
        self.black_to_move_key
    }

    #[inline]
    pub(crate) fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant_keys[sq.file()]
    }

    /// Side key contribution for the given side to move
    #[inline]
    pub(crate) fn side_for(&self, color: Color) -> u64 {
        match color {
            Color::White => 0,
            Color::Black => self.black_to_move_key,
        }
    }
}

// Built once on first use and immutable afterwards
pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);
