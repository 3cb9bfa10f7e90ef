//! Draw detection tests: fifty-move rule and repetition inside the search.

use std::sync::atomic::AtomicBool;

use crate::board::{search, search_with, Position, SearchConfig, SearchState};

fn fen(s: &str) -> Position {
    Position::from_fen(s).expect("valid FEN")
}

/// Play `moves` from `start`, returning the final position and the hashes
/// of every position before it.
fn play_line(start: &Position, moves: &[&str]) -> (Position, Vec<u64>) {
    let mut pos = start.clone();
    let mut history = Vec::new();
    for uci in moves {
        history.push(pos.hash());
        pos = pos.apply_uci(uci).expect("legal move");
    }
    (pos, history)
}

#[test]
fn test_fen_halfmove_parsing() {
    let pos = fen("8/8/8/8/8/8/8/K1k5 w - - 57 1");
    assert_eq!(pos.half_move_clock(), 57);
    assert!(!pos.is_fifty_move_draw());
}

#[test]
fn test_fifty_move_flag() {
    let pos = fen("8/8/8/8/8/8/8/K1k5 w - - 100 1");
    assert!(pos.is_fifty_move_draw());
}

#[test]
fn test_halfmove_resets_on_pawn_move_and_capture() {
    let pos = fen("4k3/8/8/3p4/8/8/4P3/4K3 w - - 99 1");
    let next = pos.apply_uci("e2e4").expect("legal");
    assert_eq!(next.half_move_clock(), 0);

    let next = next.apply_uci("e8e7").expect("legal");
    assert_eq!(next.half_move_clock(), 1);
    let next = next.apply_uci("e4d5").expect("legal");
    assert_eq!(next.half_move_clock(), 0);
}

#[test]
fn test_search_scores_fifty_move_draw() {
    // A rook up, but every quiet move completes the hundredth half-move
    let drawn = fen("k7/8/8/8/8/8/1R6/K7 w - - 99 80");
    let (best, score) = search(&drawn, 3);
    assert!(best.is_some());
    assert_eq!(score, 0);

    let fresh = fen("k7/8/8/8/8/8/1R6/K7 w - - 0 80");
    let (_, score) = search(&fresh, 3);
    assert!(score > 300);
}

#[test]
fn test_losing_side_claims_repetition_from_history() {
    let start = fen("4k1n1/8/8/8/8/8/8/Q3K1N1 w - - 0 1");
    let (root, history) = play_line(&start, &["g1f3", "g8f6", "f3g1"]);

    // Without history, Black is simply a queen down
    let mut state = SearchState::new(1);
    let plain = search_with(&root, &mut state, SearchConfig::depth(3), &AtomicBool::new(false));
    assert!(plain.score < -500);

    // With history, Nf6-g8 recreates the start position
    let mut state = SearchState::new(1);
    let config = SearchConfig::depth(3).with_history(history);
    let result = search_with(&root, &mut state, config, &AtomicBool::new(false));
    assert_eq!(result.score, 0);
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("f6g8"));
}

#[test]
fn test_repetition_needs_reversible_window() {
    // Same shuffle, but a pawn move in between resets the clock
    let start = fen("4k1n1/7p/8/8/8/8/8/Q3K1N1 w - - 0 1");
    let (root, history) = play_line(&start, &["g1f3", "h7h6", "f3g1"]);
    assert_eq!(root.half_move_clock(), 1);

    let mut state = SearchState::new(1);
    let config = SearchConfig::depth(3).with_history(history);
    let result = search_with(&root, &mut state, config, &AtomicBool::new(false));
    assert!(result.score < -500);
}
