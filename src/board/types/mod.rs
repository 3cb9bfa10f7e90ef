//! Core chess types.
//!
//! This module contains the fundamental types used throughout the engine:
//! - `Piece`, `Color` and `ColoredPiece` - piece types and colors
//! - `Square` - compact board square representation (u8)
//! - `Bitboard` - 64-bit board representation
//! - `Move` and `MoveList` - move representation
//! - `CastlingRights` - castling state derived from vacated squares

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveKind, MoveList, MoveListIntoIter, ScoredMove, ScoredMoveList, MAX_PLY};
pub use piece::{Color, ColoredPiece, Piece};
pub use square::Square;

pub(crate) use castling::{CastlePath, KINGSIDE, QUEENSIDE};
pub(crate) use piece::PROMOTION_PIECES;
