//! Property-based tests using proptest.
//!
//! Each case plays a seeded random walk of legal moves from a handful of
//! starting positions and checks position invariants along the way.

use crate::board::{Position, START_FEN};
use proptest::prelude::*;
use rand::prelude::*;

const START_POSITIONS: &[&str] = &[
    START_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
];

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=40usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn start_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(START_POSITIONS)
}

/// Every position of a random walk, the start included.
fn random_walk(fen: &str, seed: u64, num_moves: usize) -> Vec<Position> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos = Position::from_fen(fen).expect("valid FEN");
    let mut walk = vec![pos.clone()];
    for _ in 0..num_moves {
        let moves = pos.legal_moves();
        let Some(&mv) = moves.as_slice().choose(&mut rng) else {
            break;
        };
        pos = pos.apply_move(mv);
        walk.push(pos.clone());
    }
    walk
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: incremental state always agrees with a full recomputation
    #[test]
    fn prop_incremental_state_is_consistent(
        fen in start_strategy(),
        seed in seed_strategy(),
        num_moves in move_count_strategy(),
    ) {
        for pos in random_walk(fen, seed, num_moves) {
            prop_assert_eq!(pos.validate(), Ok(()));
            prop_assert_eq!(pos.hash(), pos.compute_hash());
        }
    }

    /// Property: FEN serialization round-trips
    #[test]
    fn prop_fen_round_trip(
        fen in start_strategy(),
        seed in seed_strategy(),
        num_moves in move_count_strategy(),
    ) {
        for pos in random_walk(fen, seed, num_moves) {
            let text = pos.to_fen();
            let parsed = Position::from_fen(&text).expect("own FEN parses");
            prop_assert_eq!(parsed.to_fen(), text);
            prop_assert_eq!(parsed.hash(), pos.hash());
            prop_assert_eq!(parsed.legal_moves().len(), pos.legal_moves().len());
        }
    }

    /// Property: no legal move leaves the mover's king attacked
    #[test]
    fn prop_legal_moves_keep_king_safe(
        fen in start_strategy(),
        seed in seed_strategy(),
        num_moves in move_count_strategy(),
    ) {
        for pos in random_walk(fen, seed, num_moves) {
            let us = pos.side_to_move();
            for &mv in pos.legal_moves().iter() {
                let next = pos.apply_move(mv);
                prop_assert!(
                    !next.is_square_attacked(next.king_square(us), us.opponent()),
                    "{} leaves the king in check in {}", mv, pos.to_fen()
                );
            }
        }
    }

    /// Property: every legal move survives coordinate notation
    #[test]
    fn prop_move_notation_round_trip(
        fen in start_strategy(),
        seed in seed_strategy(),
        num_moves in move_count_strategy(),
    ) {
        for pos in random_walk(fen, seed, num_moves) {
            for &mv in pos.legal_moves().iter() {
                prop_assert_eq!(pos.parse_move(&mv.to_string()), Ok(mv));
            }
        }
    }

    /// Property: the quiescence set is exactly the legal captures and promotions
    #[test]
    fn prop_quiescence_moves_are_tactical(
        fen in start_strategy(),
        seed in seed_strategy(),
        num_moves in move_count_strategy(),
    ) {
        for pos in random_walk(fen, seed, num_moves) {
            let legal = pos.legal_moves();
            let tactical = pos.quiescence_moves();
            let expected = legal.iter().filter(|m| m.is_capture() || m.is_promotion()).count();
            prop_assert_eq!(tactical.len(), expected);
            prop_assert!(tactical.iter().all(|m| legal.contains(*m)));
        }
    }
}

#[test]
fn transpositions_share_a_hash() {
    let play = |moves: &[&str]| {
        moves.iter().fold(Position::startpos(), |pos, uci| {
            pos.apply_uci(uci).expect("legal")
        })
    };
    let a = play(&["g1f3", "g8f6", "b1c3", "b8c6"]);
    let b = play(&["b1c3", "b8c6", "g1f3", "g8f6"]);
    assert_eq!(a.hash(), b.hash());
    assert_eq!(a.to_fen(), b.to_fen());

    // Same placement, different side to move
    let c = play(&["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert_eq!(c.hash(), Position::startpos().hash());
    assert_ne!(Position::startpos().apply_null_move().hash(), c.hash());
}
