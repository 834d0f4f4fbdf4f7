//! Leaf counting over the legal move tree.
//!
//! Published counts for well-known positions pin down the generator,
//! including castling, en passant and promotion. The walk uses the same
//! apply/undo pairs as the search.

use super::generate_moves;
use crate::Position;

/// Number of legal move sequences of exactly `depth` plies.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        nodes += position.with_move(m, |p| perft(p, depth - 1));
    }
    nodes
}

/// Leaf counts split by root move, sorted by coordinate notation.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_moves(position);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        let nodes = if depth > 1 {
            position.with_move(m, |p| perft(p, depth - 1))
        } else {
            1
        };
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
