//! Game record: the current position plus everything needed to detect
//! repetitions across moves that were played before a search starts.

use crate::board::{FenError, Move, MoveParseError, Position};

/// A game in progress.
#[derive(Debug, Clone, Default)]
pub struct Game {
    position: Position,
    /// Hashes of every earlier position, oldest first
    history: Vec<u64>,
}

impl Game {
    /// New game from the standard start position
    #[must_use]
    pub fn new() -> Self {
        Game::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Game {
            position: Position::from_fen(fen)?,
            history: Vec::new(),
        })
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Hashes of the positions before the current one, oldest first
    #[must_use]
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    /// Play a move, rejecting it if it is not legal here.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveParseError> {
        if !self.position.legal_moves().contains(mv) {
            return Err(MoveParseError::IllegalMove {
                notation: mv.to_string(),
            });
        }
        let next = self.position.apply_move(mv);
        self.history.push(self.position.hash());
        self.position = next;
        Ok(())
    }

    /// Play a move in coordinate notation.
    pub fn play_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let mv = self.position.parse_move(uci)?;
        self.play(mv)?;
        Ok(mv)
    }

    /// Number of earlier occurrences of the current position since the
    /// last irreversible move.
    #[must_use]
    pub fn repetitions(&self) -> usize {
        let window = (self.position.half_move_clock() as usize).min(self.history.len());
        let hash = self.position.hash();
        self.history[self.history.len() - window..]
            .iter()
            .filter(|&&h| h == hash)
            .count()
    }

    /// Threefold repetition or the fifty-move rule
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.repetitions() >= 2 || self.position.is_fifty_move_draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_tracks_played_moves() {
        let mut game = Game::new();
        let start = game.position().hash();
        game.play_uci("e2e4").expect("legal");
        game.play_uci("e7e5").expect("legal");
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.history()[0], start);
    }

    #[test]
    fn illegal_move_leaves_game_untouched() {
        let mut game = Game::new();
        let before = game.position().to_fen();
        assert!(game.play_uci("e2e5").is_err());
        assert!(game.play_uci("e2").is_err());
        assert_eq!(game.position().to_fen(), before);
        assert!(game.history().is_empty());
    }

    #[test]
    fn knight_shuffle_repeats_three_times() {
        let mut game = Game::new();
        for _ in 0..2 {
            for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                game.play_uci(mv).expect("legal");
            }
        }
        assert_eq!(game.repetitions(), 2);
        assert!(game.is_draw());
    }

    #[test]
    fn pawn_move_resets_repetition_window() {
        let mut game = Game::new();
        for mv in ["g1f3", "g8f6", "f3g1", "f6g8", "e2e4"] {
            game.play_uci(mv).expect("legal");
        }
        assert_eq!(game.repetitions(), 0);
    }
}
