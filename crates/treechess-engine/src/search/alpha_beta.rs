use super::{is_drawn_stalemate, leaf_score, search_root, Recurse, SearchError, SearchOutcome};
use super::{SearchStrategy, INFINITY};
use crate::eval::Evaluator;
use crate::movegen::generate_moves;
use crate::Position;

/// Minimax with alpha-beta pruning.
///
/// Each root move is searched with a fresh window wider than any score
/// reachable at that depth, so the value returned for every root move is
/// exact and matches [`NaiveSearch`](super::NaiveSearch).
#[derive(Debug, Clone, Default)]
pub struct AlphaBetaSearch {
    evaluator: Evaluator,
    evaluated_moves: u64,
}

impl AlphaBetaSearch {
    pub fn new(evaluator: Evaluator) -> Self {
        AlphaBetaSearch {
            evaluator,
            evaluated_moves: 0,
        }
    }

    fn alpha_beta(
        &mut self,
        position: &mut Position,
        depth: u32,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
    ) -> i64 {
        if depth == 0 {
            return leaf_score(&self.evaluator, position, maximizing);
        }

        let moves = generate_moves(position);
        self.evaluated_moves += moves.len() as u64;
        if moves.is_empty() && is_drawn_stalemate(&self.evaluator, position) {
            return 0;
        }

        let bias = depth as i64;
        if maximizing {
            let mut value = -INFINITY - bias;
            for &m in &moves {
                let score =
                    position.with_move(m, |p| self.alpha_beta(p, depth - 1, alpha, beta, false));
                value = value.max(score);
                alpha = alpha.max(value);
                if value >= beta {
                    break;
                }
            }
            value
        } else {
            let mut value = INFINITY + bias;
            for &m in &moves {
                let score =
                    position.with_move(m, |p| self.alpha_beta(p, depth - 1, alpha, beta, true));
                value = value.min(score);
                beta = beta.min(value);
                if value <= alpha {
                    break;
                }
            }
            value
        }
    }
}

/// Bounds strictly outside every score a `depth`-ply subtree can return.
#[inline]
fn full_window(depth: u32) -> (i64, i64) {
    let edge = INFINITY + depth as i64 + 1;
    (-edge, edge)
}

impl Recurse for AlphaBetaSearch {
    fn counter(&mut self) -> &mut u64 {
        &mut self.evaluated_moves
    }

    fn score_reply(&mut self, position: &mut Position, depth: u32) -> i64 {
        let (alpha, beta) = full_window(depth);
        self.alpha_beta(position, depth, alpha, beta, false)
    }
}

impl SearchStrategy for AlphaBetaSearch {
    fn name(&self) -> &'static str {
        "alpha-beta"
    }

    fn select_move(
        &mut self,
        position: &mut Position,
        depth: u32,
    ) -> Result<SearchOutcome, SearchError> {
        search_root(self, "alpha-beta", position, depth)
    }

    fn moves_evaluated(&self) -> u64 {
        self.evaluated_moves
    }
}
