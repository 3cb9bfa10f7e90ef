//! Chess board representation and game logic.
//!
//! Uses bitboards for legal move generation and a copy-on-apply
//! [`Position`] so that search branches never share mutable state.
//!
//! # Example
//! ```
//! use chess_core::board::Position;
//!
//! let pos = Position::startpos();
//! let moves = pos.legal_moves();
//! assert_eq!(moves.len(), 20);
//!
//! let next = pos.apply_uci("e2e4").unwrap();
//! assert_eq!(next.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
//! ```

mod attack_tables;
mod error;
mod eval_terms;
mod fen;
mod movegen;
mod perft;
mod pst;
mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use attack_tables::{
    between, bishop_attacks, king_attacks, knight_attacks, line, pawn_attacks, pawn_attacks_set,
    piece_attacks, queen_attacks, rook_attacks,
};
pub use error::{FenError, MoveParseError, SquareError};
pub use eval_terms::{eval_report, EvalTerm};
pub use movegen::GenMode;
pub use state::{Position, START_FEN};
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, ColoredPiece, Move, MoveKind, MoveList,
    MoveListIntoIter, Piece, ScoredMove, ScoredMoveList, Square, MAX_PLY,
};

// Public API - search functions and configuration
pub use search::{
    mate_in, search, search_with, SearchConfig, SearchInfoCallback, SearchIterationInfo,
    SearchParams, SearchResult, SearchState, SearchStats, DEFAULT_TT_MB, INF, MATE_THRESHOLD,
};
