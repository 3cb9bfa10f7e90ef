//! Bitboard chess engine core: legal move generation, a transposition
//! table and an iterative-deepening alpha-beta search.
//!
//! # Example
//! ```
//! use chess_core::board::{search, Position};
//!
//! let pos: Position = "6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1".parse().unwrap();
//! let (best, score) = search(&pos, 3);
//! assert_eq!(best.unwrap().to_string(), "e1e8");
//! assert!(score > chess_core::board::MATE_THRESHOLD);
//! ```

pub mod board;
pub mod engine;
pub mod tt;
mod zobrist;

pub use board::{Color, Move, Piece, Position, Square};
pub use engine::{Engine, EngineError, Game, TimeControl};
pub use tt::TranspositionTable;
