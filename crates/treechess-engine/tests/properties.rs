//! Property-based tests for position and search invariants.

use proptest::prelude::*;
use treechess_core::{Description, Move};
use treechess_engine::{
    generate_moves, is_in_check, refresh_status, AlphaBetaSearch, Evaluator, NaiveSearch,
    Position, SearchStrategy, StalematePolicy,
};

const START_POSITIONS: [&str; 5] = [
    Description::STARTPOS,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -",
    "4k3/8/8/8/1p6/8/P7/4K3 w",
];

/// Plays `choices` from `fen`, picking moves by index modulo the number of
/// legal moves. Stops early when the side to move has no move.
fn walk(fen: &str, choices: &[usize]) -> (Position, Vec<Move>) {
    let mut position = Position::from_fen(fen).unwrap();
    let mut played = Vec::new();
    for &choice in choices {
        let moves = generate_moves(&mut position);
        if moves.is_empty() {
            break;
        }
        let m = moves[choice % moves.len()];
        position.apply(m);
        played.push(m);
    }
    (position, played)
}

fn walk_strategy(max_len: usize) -> impl Strategy<Value = (&'static str, Vec<usize>)> {
    (
        prop::sample::select(START_POSITIONS.to_vec()),
        prop::collection::vec(0usize..64, 0..max_len),
    )
}

proptest! {
    #[test]
    fn undo_restores_the_start(input in walk_strategy(24)) {
        let (fen, choices) = input;
        let mut original = Position::from_fen(fen).unwrap();
        refresh_status(&mut original);

        let (mut position, played) = walk(fen, &choices);
        for &m in played.iter().rev() {
            position.undo(m);
        }
        refresh_status(&mut position);

        prop_assert_eq!(position, original);
    }

    #[test]
    fn generation_leaves_position_unchanged(input in walk_strategy(16)) {
        let (fen, choices) = input;
        let (mut position, _) = walk(fen, &choices);
        refresh_status(&mut position);
        let before = position.clone();

        let moves = generate_moves(&mut position);
        prop_assert_eq!(&position, &before);

        let again = generate_moves(&mut position);
        prop_assert_eq!(moves.as_slice(), again.as_slice());
    }

    #[test]
    fn legal_moves_never_expose_the_king(input in walk_strategy(16)) {
        let (fen, choices) = input;
        let (mut position, _) = walk(fen, &choices);
        let mover = position.side_to_move();

        for &m in &generate_moves(&mut position) {
            let exposed = position.with_move(m, |p| is_in_check(p, mover));
            prop_assert!(!exposed, "{} leaves the king in check", m);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn pruning_never_changes_the_result(
        input in walk_strategy(10),
        depth in 1u32..=2,
        loss in any::<bool>(),
    ) {
        let (fen, choices) = input;
        let (mut position, _) = walk(fen, &choices);
        let before = position.clone();
        let policy = if loss { StalematePolicy::Loss } else { StalematePolicy::Draw };
        let evaluator = Evaluator::new(policy);

        let naive = NaiveSearch::new(evaluator).select_move(&mut position, depth);
        let pruned = AlphaBetaSearch::new(evaluator).select_move(&mut position, depth);

        match (naive, pruned) {
            (Ok(naive), Ok(pruned)) => {
                prop_assert_eq!(pruned.score, naive.score);
                prop_assert_eq!(pruned.best_move, naive.best_move);
                prop_assert!(pruned.moves_evaluated <= naive.moves_evaluated);
            }
            (naive, pruned) => {
                prop_assert_eq!(naive, pruned);
            }
        }
        prop_assert_eq!(position.to_fen(), before.to_fen());
    }
}
