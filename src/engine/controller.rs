//! Engine controller: owns the game, the shared search state, and at most
//! one background search.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use super::game::Game;
use super::time::TimeControl;
use crate::board::{
    search_with, FenError, MoveParseError, Position, SearchConfig, SearchInfoCallback,
    SearchResult, SearchState, START_FEN,
};

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Errors surfaced by the engine facade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The position string could not be parsed
    Fen(FenError),
    /// A move could not be parsed or is illegal
    Move(MoveParseError),
    /// The search thread could not be started
    Spawn(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Fen(err) => write!(f, "invalid position: {err}"),
            EngineError::Move(err) => write!(f, "invalid move: {err}"),
            EngineError::Spawn(msg) => write!(f, "failed to spawn search thread: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Fen(err) => Some(err),
            EngineError::Move(err) => Some(err),
            EngineError::Spawn(_) => None,
        }
    }
}

impl From<FenError> for EngineError {
    fn from(err: FenError) -> Self {
        EngineError::Fen(err)
    }
}

impl From<MoveParseError> for EngineError {
    fn from(err: MoveParseError) -> Self {
        EngineError::Move(err)
    }
}

/// Active background search
pub struct SearchJob {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl SearchJob {
    /// Stop the search and wait for the thread to finish
    pub fn stop_and_wait(self) {
        self.stop.store(true, Ordering::Relaxed);
        if self.handle.join().is_err() {
            log::warn!("search thread panicked");
        }
    }

    /// Signal stop without waiting
    pub fn signal_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Engine facade managing the game and its searches
pub struct Engine {
    game: Game,
    /// Shared with the background search thread
    search_state: Arc<Mutex<SearchState>>,
    current_job: Option<SearchJob>,
    info_callback: Option<SearchInfoCallback>,
}

impl Engine {
    /// Create an engine with a `tt_mb` megabyte transposition table
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        Engine {
            game: Game::new(),
            search_state: Arc::new(Mutex::new(SearchState::new(tt_mb))),
            current_job: None,
            info_callback: None,
        }
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        self.game.position()
    }

    #[must_use]
    pub fn search_state(&self) -> &Arc<Mutex<SearchState>> {
        &self.search_state
    }

    /// Set up a position from `"startpos"` or a FEN string, then play
    /// `moves` in coordinate notation.
    ///
    /// An illegal move is discarded together with every move after it; the
    /// position reached so far is kept.
    pub fn set_position(&mut self, fen: &str, moves: &[&str]) -> Result<(), EngineError> {
        self.stop();
        let fen = if fen.trim() == "startpos" { START_FEN } else { fen };
        let mut game = Game::from_fen(fen)?;
        for (idx, uci) in moves.iter().enumerate() {
            if let Err(err) = game.play_uci(uci) {
                log::warn!(
                    "discarding move {uci} and {} following: {err}",
                    moves.len() - idx - 1
                );
                break;
            }
        }
        self.game = game;
        Ok(())
    }

    /// Play one more move on the current game.
    pub fn play(&mut self, uci: &str) -> Result<(), EngineError> {
        self.stop();
        self.game.play_uci(uci)?;
        Ok(())
    }

    /// Start a new game: start position and an empty table
    pub fn new_game(&mut self) {
        self.stop();
        self.game = Game::new();
        self.search_state.lock().new_game();
    }

    /// Resize the transposition table
    pub fn resize_tt(&mut self, mb: usize) {
        self.stop();
        self.search_state.lock().resize(mb);
    }

    /// Set callback for iteration info reporting.
    pub fn set_info_callback(&mut self, cb: Option<SearchInfoCallback>) {
        self.info_callback = cb;
    }

    /// Config with a time limit derived from `clock` for the side to move
    #[must_use]
    pub fn config_for(&self, clock: TimeControl, depth: Option<u32>) -> SearchConfig {
        SearchConfig {
            max_depth: depth,
            time_limit_ms: clock.budget_ms(self.position().side_to_move()),
            ..SearchConfig::default()
        }
    }

    /// Attach the game history and the engine's info callback
    fn prepare(&self, mut config: SearchConfig) -> SearchConfig {
        config.history = self.game.history().to_vec();
        if config.info_callback.is_none() {
            config.info_callback = self.info_callback.clone();
        }
        config
    }

    /// Search the current position on the calling thread.
    pub fn search(&mut self, config: SearchConfig) -> SearchResult {
        self.stop();
        let config = self.prepare(config);
        let mut state = self.search_state.lock();
        search_with(self.game.position(), &mut state, config, &AtomicBool::new(false))
    }

    /// Search the current position on a background thread.
    ///
    /// `on_complete` runs on the search thread with the result, including
    /// when the search is ended by [`Engine::stop`].
    pub fn start_search<F>(&mut self, config: SearchConfig, on_complete: F) -> Result<(), EngineError>
    where
        F: FnOnce(SearchResult) + Send + 'static,
    {
        self.stop();

        let config = self.prepare(config);
        let stop = Arc::new(AtomicBool::new(false));
        let position = self.game.position().clone();
        let search_state = Arc::clone(&self.search_state);
        let stop_clone = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let result = {
                    let mut guard = search_state.lock();
                    search_with(&position, &mut guard, config, &stop_clone)
                };
                on_complete(result);
            })
            .map_err(|err| EngineError::Spawn(err.to_string()))?;

        self.current_job = Some(SearchJob { stop, handle });
        Ok(())
    }

    /// Stop any active search and wait for it to finish
    pub fn stop(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.stop_and_wait();
        }
    }

    /// Check if a background search is still running
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.as_ref().is_some_and(|job| !job.is_finished())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(crate::board::DEFAULT_TT_MB)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}
