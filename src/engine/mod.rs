//! Engine facade: game bookkeeping, background search management and
//! time allocation on top of the board and search modules.

mod controller;
mod game;
pub mod time;

pub use controller::{Engine, EngineError, SearchJob};
pub use game::Game;
pub use time::{TimeConfig, TimeControl};
