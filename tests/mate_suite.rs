//! Mate problems loaded from `data/mates.json`.

use std::sync::atomic::AtomicBool;

use serde::Deserialize;

use chess_core::board::{mate_in, search_with, Position, SearchConfig, SearchState};

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: String,
    fen: String,
    moves: String,
}

impl Problem {
    fn mate_length(&self) -> Option<i32> {
        match self.kind.as_str() {
            "Mate in One" => Some(1),
            "Mate in Two" => Some(2),
            "Mate in Three" => Some(3),
            _ => None,
        }
    }

    fn solution(&self) -> Vec<String> {
        self.moves.split(';').map(|m| m.replace('-', "")).collect()
    }
}

fn load() -> ProblemSet {
    let data = include_str!("data/mates.json");
    serde_json::from_str(data).expect("invalid mates.json")
}

#[test]
fn solution_lines_end_in_mate() {
    for problem in load().problems {
        let mut pos = Position::from_fen(&problem.fen).expect("valid FEN");
        for uci in problem.solution() {
            pos = pos
                .apply_uci(&uci)
                .unwrap_or_else(|err| panic!("{}: {uci}: {err}", problem.fen));
        }
        assert!(pos.in_check(), "{}: line does not end in check", problem.fen);
        assert!(pos.legal_moves().is_empty(), "{}: line does not end in mate", problem.fen);
    }
}

#[test]
fn search_finds_every_mate() {
    for problem in load().problems {
        let Some(n) = problem.mate_length() else {
            continue;
        };
        let pos = Position::from_fen(&problem.fen).expect("valid FEN");
        let depth = 2 * n as u32;

        let mut state = SearchState::new(4);
        let result = search_with(&pos, &mut state, SearchConfig::depth(depth), &AtomicBool::new(false));
        assert_eq!(
            mate_in(result.score),
            Some(n),
            "{}: score {} is not mate in {n}",
            problem.fen,
            result.score
        );

        let best = result.best_move.expect("a move");
        if n == 1 {
            let after = pos.apply_move(best);
            assert!(after.in_check() && after.legal_moves().is_empty());
            assert_eq!(best.to_string(), problem.solution()[0]);
        }
    }
}
