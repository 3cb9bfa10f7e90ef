//! Search algorithm tests.
//!
//! Tests for alpha-beta, quiescence, limits, and agreement with plain
//! minimax when every selective technique is off.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crate::board::{
    mate_in, search, search_with, Move, Piece, Position, SearchConfig, SearchIterationInfo,
    SearchParams, SearchState, INF, MATE_THRESHOLD,
};

fn fen(s: &str) -> Position {
    Position::from_fen(s).expect("valid FEN")
}

fn run(pos: &Position, state: &mut SearchState, config: SearchConfig) -> crate::board::SearchResult {
    search_with(pos, state, config, &AtomicBool::new(false))
}

// ============================================================================
// Reference minimax
// ============================================================================

/// Same tree shape as the real search (check extension, quiescence with
/// stand-pat, mate and draw scoring) but no pruning or ordering. The full
/// capture tree is walked, so only small positions are practical.
fn minimax(pos: &Position, depth: i32, ply: usize, path: &mut Vec<u64>) -> i32 {
    if ply > 0 && (pos.is_fifty_move_draw() || repeated(pos, path)) {
        return 0;
    }
    let in_check = pos.in_check();
    let depth = if in_check { depth + 1 } else { depth };
    if depth <= 0 {
        return quiescence_minimax(pos);
    }

    let moves = pos.legal_moves();
    if moves.is_empty() {
        return if in_check { -INF + ply as i32 } else { 0 };
    }
    path.push(pos.hash());
    let best = moves
        .iter()
        .map(|&mv| -minimax(&pos.apply_move(mv), depth - 1, ply + 1, path))
        .max()
        .expect("non-empty");
    path.pop();
    best
}

fn quiescence_minimax(pos: &Position) -> i32 {
    let stand_pat = pos.evaluate();
    pos.quiescence_moves()
        .iter()
        .filter(|m| matches!(m.promotion(), None | Some(Piece::Queen)))
        .map(|&mv| -quiescence_minimax(&pos.apply_move(mv)))
        .fold(stand_pat, i32::max)
}

fn repeated(pos: &Position, path: &[u64]) -> bool {
    let n = path.len();
    let window = (pos.half_move_clock() as usize).min(n);
    (2..=window).step_by(2).any(|back| path[n - back] == pos.hash())
}

fn assert_matches_minimax(fen_str: &str, depth: u32) {
    let pos = fen(fen_str);
    let mut state = SearchState::new(1).with_params(SearchParams::unpruned());
    let result = run(&pos, &mut state, SearchConfig::depth(depth));
    let best = result.best_move.expect("position has moves");

    let expected = minimax(&pos, depth as i32, 0, &mut Vec::new());
    assert_eq!(result.score, expected, "score mismatch for {fen_str} at depth {depth}");

    // The chosen move must reach the optimum
    let child_depth = if pos.in_check() { depth as i32 } else { depth as i32 - 1 };
    let mut path = vec![pos.hash()];
    let achieved = -minimax(&pos.apply_move(best), child_depth, 1, &mut path);
    assert_eq!(achieved, expected, "{best} is not optimal for {fen_str}");
}

#[test]
fn unpruned_search_equals_minimax_knight_endgame() {
    assert_matches_minimax("4k3/pp3ppp/8/3n4/8/2N5/PP3PPP/4K3 w - - 0 1", 3);
}

#[test]
fn unpruned_search_equals_minimax_endgame() {
    assert_matches_minimax("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3);
}

#[test]
fn unpruned_search_equals_minimax_rook_and_knight() {
    // Nxd5 opens the c-file, so captures chain into rook trades
    assert_matches_minimax("2r3k1/5ppp/8/3p4/3P4/2N5/5PPP/2R3K1 w - - 0 1", 3);
}

#[test]
fn unpruned_search_equals_minimax_capture_with_check() {
    // Below the horizon ...Qxf2+ leaves White in check; quiescence stands
    // pat there and only looks at Kxf2
    assert_matches_minimax("6k1/5ppp/1q6/8/8/8/5PPP/6K1 w - - 0 1", 2);
}

#[test]
fn unpruned_search_equals_minimax_mate() {
    assert_matches_minimax("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 3);
}

#[test]
fn unpruned_search_equals_minimax_in_check() {
    assert_matches_minimax("4k3/8/8/8/1b5Q/8/2P5/1N2K3 w - - 0 1", 2);
}

// ============================================================================
// Mate and terminal positions
// ============================================================================

#[test]
fn alphabeta_finds_mate_in_one() {
    let pos = fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1");
    let (best, score) = search(&pos, 2);
    assert_eq!(best.map(|m| m.to_string()).as_deref(), Some("e1e8"));
    assert_eq!(score, INF - 1);
    assert_eq!(mate_in(score), Some(1));
}

#[test]
fn alphabeta_prefers_faster_mate() {
    // Rook mates on a8 at once; slower mates also exist
    let pos = fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
    let (best, score) = search(&pos, 4);
    assert_eq!(best.map(|m| m.to_string()).as_deref(), Some("a1a8"));
    assert_eq!(score, INF - 1);
}

#[test]
fn alphabeta_sees_being_mated() {
    // Black to move; whatever it plays, Rb8 mates
    let pos = fen("7k/R7/8/8/2p5/8/8/1R4K1 b - - 0 1");
    let mut state = SearchState::new(1);
    let result = run(&pos, &mut state, SearchConfig::depth(4));
    assert!(result.score < -MATE_THRESHOLD, "score {}", result.score);
    assert_eq!(mate_in(result.score), Some(-1));
}

#[test]
fn alphabeta_handles_stalemate() {
    let pos = fen("k7/8/1QK5/8/8/8/8/8 b - - 0 1");
    let (best, score) = search(&pos, 4);
    assert!(best.is_none());
    assert_eq!(score, 0);
}

#[test]
fn alphabeta_returns_none_for_checkmate_position() {
    let pos = fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1");
    let (best, score) = search(&pos, 4);
    assert!(best.is_none());
    assert_eq!(score, -INF);
}

#[test]
fn alphabeta_avoids_stalemating() {
    // Qb6 would stalemate; any sensible move keeps the win
    let pos = fen("k7/8/2K5/8/8/8/8/1Q6 w - - 0 1");
    let (best, score) = search(&pos, 3);
    let best = best.expect("has moves");
    assert_ne!(best.to_string(), "b1b6");
    assert!(score > 500);
}

#[test]
fn quiescence_sees_recapture() {
    // Qxd5 wins a pawn and loses the queen to cxd5
    let pos = fen("4k3/8/2p5/3p4/8/8/8/3QK3 w - - 0 1");
    let (best, _) = search(&pos, 1);
    assert_ne!(best.map(|m| m.to_string()).as_deref(), Some("d1d5"));
}

#[test]
fn search_wins_hanging_queen() {
    let pos = fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
    let (best, score) = search(&pos, 3);
    assert_eq!(best.map(|m| m.to_string()).as_deref(), Some("e4d5"));
    assert!(score > 0);
}

// ============================================================================
// Limits and reporting
// ============================================================================

#[test]
fn single_legal_move_searches_one_ply() {
    // Ka1 is checked along the a-file; the b-file is covered, so Ra2 is
    // the only legal reply
    let pos = fen("rr4k1/8/8/8/8/8/7R/K7 w - - 0 1");
    assert_eq!(pos.legal_moves().len(), 1);
    let mut state = SearchState::new(1);
    let result = run(&pos, &mut state, SearchConfig::depth(10));
    assert_eq!(result.depth, 1);
    assert_eq!(result.best_move, pos.legal_moves().first());
}

#[test]
fn search_respects_stop_flag() {
    let pos = Position::startpos();
    let mut state = SearchState::new(1);
    let result = search_with(&pos, &mut state, SearchConfig::depth(10), &AtomicBool::new(true));
    // Nothing completed, but a legal move is still returned
    assert_eq!(result.depth, 0);
    let mv = result.best_move.expect("fallback move");
    assert!(pos.legal_moves().contains(mv));
}

#[test]
fn search_with_node_limit() {
    let pos = Position::startpos();
    let mut state = SearchState::new(1);
    let result = run(&pos, &mut state, SearchConfig::depth(30).with_nodes(5_000));
    assert!(result.best_move.is_some());
    // one root node may be counted before the limit is noticed
    assert!(result.nodes <= 5_001);
    assert!(result.depth < 30);
}

#[test]
fn search_with_time_limit() {
    let pos = Position::startpos();
    let mut state = SearchState::new(1);
    let start = std::time::Instant::now();
    let result = run(&pos, &mut state, SearchConfig::time(100));
    assert!(result.best_move.is_some());
    assert!(start.elapsed().as_millis() < 2_000);
}

#[test]
fn info_callback_reports_each_depth() {
    let pos = fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let seen: Arc<Mutex<Vec<SearchIterationInfo>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let config = SearchConfig::depth(4).with_info_callback(Arc::new(move |info: &SearchIterationInfo| {
        sink.lock().expect("lock").push(info.clone());
    }));

    let mut state = SearchState::new(1);
    let result = run(&pos, &mut state, config);

    let seen = seen.lock().expect("lock");
    let depths: Vec<u32> = seen.iter().map(|i| i.depth).collect();
    assert_eq!(depths, vec![1, 2, 3, 4]);
    let last = seen.last().expect("reported");
    assert_eq!(last.pv.first().copied(), result.best_move);
    assert_eq!(last.score, result.score);
    assert!(last.pv_string().starts_with(&result.pv[0].to_string()));
}

#[test]
fn pv_is_a_legal_line() {
    let pos = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let mut state = SearchState::new(4);
    let result = run(&pos, &mut state, SearchConfig::depth(4));
    assert!(!result.pv.is_empty());
    assert!(result.pv.len() <= 4);
    assert_eq!(result.pv[0], result.best_move.expect("move"));

    let mut current = pos;
    for mv in &result.pv {
        assert!(current.legal_moves().contains(*mv), "{mv} illegal in pv");
        current = current.apply_move(*mv);
    }
}

#[test]
fn stats_are_collected() {
    let pos = fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let mut state = SearchState::new(1);
    let result = run(&pos, &mut state, SearchConfig::depth(3));
    let stats = state.stats;
    assert!(stats.nodes > 0);
    assert!(stats.qnodes > 0);
    assert!(stats.beta_cutoffs > 0);
    assert!(stats.seldepth >= 3);
    assert_eq!(stats.total_nodes(), result.nodes);
}

#[test]
fn pruned_search_agrees_on_obvious_capture() {
    let pos = fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
    for params in [SearchParams::default(), SearchParams::unpruned()] {
        let mut state = SearchState::new(1).with_params(params);
        let result = run(&pos, &mut state, SearchConfig::depth(5));
        assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("e4d5"));
    }
}

#[test]
fn repeated_search_reuses_table() {
    let pos = fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let mut state = SearchState::new(1);
    let first = run(&pos, &mut state, SearchConfig::depth(4));
    let second = run(&pos, &mut state, SearchConfig::depth(4));
    assert!(second.nodes <= first.nodes);
    assert!(state.hashfull_per_mille() > 0);
}

#[test]
fn best_move_is_legal_at_every_depth() {
    let pos = fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    let mut state = SearchState::new(1);
    for depth in 1..=5 {
        let result = run(&pos, &mut state, SearchConfig::depth(depth));
        let mv: Move = result.best_move.expect("move");
        assert!(pos.legal_moves().contains(mv));
        assert_eq!(result.depth, depth);
    }
}
