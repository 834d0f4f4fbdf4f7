//! End-to-end scenarios through the public API.

use treechess_core::{Color, Coord};
use treechess_engine::movegen::perft::{perft, perft_divide};
use treechess_engine::{
    find_legal_move, generate_moves, legal_moves_from, Game, GameError, Position, Status,
    StrategyKind,
};

fn at(s: &str) -> Coord {
    Coord::from_algebraic(s).unwrap()
}

fn uci_list(position: &mut Position, from: &str) -> Vec<String> {
    legal_moves_from(position, at(from))
        .as_slice()
        .iter()
        .map(|m| m.to_uci())
        .collect()
}

#[test]
fn en_passant_is_available_for_one_ply_only() {
    let mut game = Game::from_fen("4k3/8/8/8/1p6/8/P7/4K3 w").unwrap();
    game.apply_uci("a2a4").unwrap();

    let mut position = game.position().clone();
    let moves = uci_list(&mut position, "b4");
    assert!(moves.contains(&"b4a3".to_string()));

    game.apply_uci("b4a3").unwrap();
    assert!(game.position().piece_at(at("a4")).is_none());
    let white = game.position().pieces(Color::White);
    assert_eq!(white.iter().filter(|p| p.active).count(), 1);

    assert!(game.position().piece_at(at("a3")).is_some());
    game.take_back();
    let restored = game.position().piece_at(at("a4")).unwrap();
    assert!(game.position().piece(restored).active);
    assert_eq!(game.position().piece(restored).color, Color::White);
    assert_eq!(game.position().piece_at(at("b4")).map(|id| id.color), Some(Color::Black));
    assert!(game.position().piece_at(at("a3")).is_none());

    game.apply_uci("e8d8").unwrap();
    game.apply_uci("e1d1").unwrap();
    let mut position = game.position().clone();
    assert!(!uci_list(&mut position, "b4").contains(&"b4a3".to_string()));
}

#[test]
fn castling_both_ways_and_back() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K2R w").unwrap();
    let start = game.position().clone();

    let mut position = game.position().clone();
    let king_moves = uci_list(&mut position, "e1");
    assert!(king_moves.contains(&"e1g1".to_string()));
    assert!(king_moves.contains(&"e1c1".to_string()));

    game.apply_uci("e1g1").unwrap();
    assert_eq!(game.position().to_fen().split(' ').next(), Some("4k3/8/8/8/8/8/8/R4RK1"));
    game.take_back();

    game.apply_uci("e1c1").unwrap();
    assert_eq!(game.position().to_fen().split(' ').next(), Some("4k3/8/8/8/8/8/8/2KR3R"));
    game.take_back();

    assert_eq!(game.position(), &start);
}

#[test]
fn castling_rights_are_lost_by_moving() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K2R w").unwrap();
    for m in ["h1h2", "e8d8", "h2h1", "d8e8"] {
        game.apply_uci(m).unwrap();
    }
    let mut position = game.position().clone();
    let king_moves = uci_list(&mut position, "e1");
    assert!(!king_moves.contains(&"e1g1".to_string()));
    assert!(king_moves.contains(&"e1c1".to_string()));
}

#[test]
fn promotion_offers_four_pieces() {
    let mut position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w").unwrap();
    assert_eq!(uci_list(&mut position, "a7"), ["a7a8q", "a7a8r", "a7a8b", "a7a8n"]);

    let m = find_legal_move(&mut position, "a7a8n").unwrap();
    let before = position.clone();
    position.apply(m);
    assert!(position.to_fen().starts_with("N3k3/"));
    position.undo(m);
    assert_eq!(position, before);
}

#[test]
fn perft_matches_known_counts() {
    let mut kiwipete =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -")
            .unwrap();
    assert_eq!(perft(&mut kiwipete, 2), 2039);

    let divide = perft_divide(&mut kiwipete, 2);
    assert_eq!(divide.len(), 48);
    assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 2039);
}

#[test]
fn self_play_reaches_a_result_or_the_ply_limit() {
    let mut game = Game::new();
    let mut white = StrategyKind::AlphaBeta.build(Default::default());
    let mut black = StrategyKind::Naive.build(Default::default());

    for ply in 0..12 {
        let strategy = if ply % 2 == 0 { &mut white } else { &mut black };
        match game.play_turn(strategy.as_mut(), 2) {
            Ok(report) => assert_eq!(report.fen, game.position().to_fen()),
            Err(GameError::GameOver(status)) => {
                assert_ne!(status, Status::Ongoing);
                break;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert!(!game.history().is_empty());

    while game.take_back().is_some() {}
    assert_eq!(game.position().ply(), 0);

    let mut position = game.position().clone();
    assert_eq!(generate_moves(&mut position).len(), 20);
}

#[test]
fn lenient_loading_accepts_sloppy_input() {
    let position = Position::from_fen_lenient("4k3/8/8/8/8/8/8/4K3 white extra junk").unwrap();
    assert_eq!(position.side_to_move(), Color::White);
    assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 white").is_err());
}
