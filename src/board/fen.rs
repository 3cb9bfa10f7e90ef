use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::types::{
    Bitboard, CastlingRights, Color, ColoredPiece, Move, Piece, Square, KINGSIDE, QUEENSIDE,
};
use super::Position;

impl Position {
    /// Parse a position from FEN notation. The half-move clock and full-move
    /// number are optional and default to 0 and 1.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut pos = Position::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        // Piece placement, rank 8 first
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRank { rank: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 {
                        return Err(FenError::InvalidPiece { char: c });
                    }
                    file += skip as usize;
                    if file > 8 {
                        return Err(FenError::TooManyFiles { rank: rank_idx, files: file });
                    }
                    continue;
                }
                let piece = ColoredPiece::from_fen_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::TooManyFiles {
                        rank: rank_idx,
                        files: file + 1,
                    });
                }
                pos.set_piece(piece, Square::from_index(rank * 8 + file));
                file += 1;
            }
            if file < 8 {
                return Err(FenError::TooFewFiles { rank: rank_idx, files: file });
            }
        }

        for color in Color::BOTH {
            if pos.pieces(color, Piece::King).popcount() != 1 {
                return Err(FenError::MissingKing { color });
            }
        }

        match parts[1] {
            "w" => pos.set_side_to_move(Color::White),
            "b" => pos.set_side_to_move(Color::Black),
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        }

        // The side that just moved cannot have left its king en prise
        let waiting = pos.side_to_move().opponent();
        if pos.is_square_attacked(pos.king_square(waiting), pos.side_to_move()) {
            return Err(FenError::OpponentInCheck { color: waiting });
        }

        pos.movements = parse_castling(&pos, parts[2])?;

        if parts[3] != "-" {
            let ep = parse_en_passant(&pos, parts[3]).ok_or_else(|| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            pos.set_en_passant(ep);
        }

        if let Some(half) = parts.get(4) {
            pos.half_move_clock = half.parse().map_err(|_| FenError::InvalidClock {
                found: (*half).to_string(),
            })?;
        }
        if let Some(full) = parts.get(5) {
            pos.full_move_count = full.parse().map_err(|_| FenError::InvalidClock {
                found: (*full).to_string(),
            })?;
        }

        Ok(pos)
    }

    /// Serialize the position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some(piece) = self.piece_at(Square::from_index(rank * 8 + file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            self.castling_rights(),
            ep,
            self.half_move_clock,
            self.full_move_count
        )
    }

    /// Parse a move in coordinate notation (e.g. "e2e4", "e7e8q") and
    /// return the matching legal move.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Position;
    ///
    /// let pos = Position::startpos();
    /// let mv = pos.parse_move("e2e4").unwrap();
    /// assert!(mv.is_double_pawn_push());
    /// ```
    pub fn parse_move(&self, uci: &str) -> Result<Move, MoveParseError> {
        let chars: Vec<char> = uci.chars().collect();
        if chars.len() < 4 || chars.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: chars.len() });
        }

        let square = |file: char, rank: char| -> Option<Square> {
            if ('a'..='h').contains(&file) && ('1'..='8').contains(&rank) {
                Square::new(rank as usize - '1' as usize, file as usize - 'a' as usize)
            } else {
                None
            }
        };
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from = square(chars[0], chars[1]).ok_or_else(invalid_square)?;
        let to = square(chars[2], chars[3]).ok_or_else(invalid_square)?;

        let promotion = match chars.get(4) {
            Some(&c) => match Piece::from_char(c) {
                Some(p) if !matches!(p, Piece::Pawn | Piece::King) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
            None => None,
        };

        self.find_move(from, to, promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Parse a coordinate move and return the position after it.
    pub fn apply_uci(&self, uci: &str) -> Result<Position, MoveParseError> {
        let mv = self.parse_move(uci)?;
        Ok(self.apply_move(mv))
    }
}

/// Castling field to `movements`. A right only survives when its king and
/// rook are on their original squares; every other rook origin is marked
/// as moved.
fn parse_castling(pos: &Position, field: &str) -> Result<Bitboard, FenError> {
    let mut claimed = CastlingRights::none();
    for c in field.chars() {
        match c {
            'K' => claimed.set(Color::White, true),
            'Q' => claimed.set(Color::White, false),
            'k' => claimed.set(Color::Black, true),
            'q' => claimed.set(Color::Black, false),
            '-' => {}
            _ => return Err(FenError::InvalidCastling { char: c }),
        }
    }

    let mut movements = Bitboard::EMPTY;
    for color in Color::BOTH {
        let king = ColoredPiece::new(color, Piece::King);
        let rook = ColoredPiece::new(color, Piece::Rook);
        for (path, kingside) in [(&KINGSIDE[color.index()], true), (&QUEENSIDE[color.index()], false)] {
            let intact = pos.piece_at(path.king_from) == Some(king)
                && pos.piece_at(path.rook_from) == Some(rook);
            if !(claimed.has(color, kingside) && intact) {
                movements |= path.rook_from.bitboard();
            }
        }
    }
    Ok(movements)
}

/// An en passant square is accepted only right after a plausible double
/// push: correct rank, empty, with the pushed enemy pawn in front of it.
fn parse_en_passant(pos: &Position, field: &str) -> Option<Square> {
    let sq: Square = field.parse().ok()?;
    let us = pos.side_to_move;
    let expected_rank = match us {
        Color::White => 5,
        Color::Black => 2,
    };
    if sq.rank() != expected_rank || pos.piece_at(sq).is_some() {
        return None;
    }
    let pushed = sq.offset(-us.forward());
    (pos.piece_at(pushed) == Some(ColoredPiece::new(us.opponent(), Piece::Pawn))).then_some(sq)
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
