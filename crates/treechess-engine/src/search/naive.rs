use super::{is_drawn_stalemate, leaf_score, search_root, Recurse, SearchError, SearchOutcome};
use super::{SearchStrategy, INFINITY};
use crate::eval::Evaluator;
use crate::movegen::generate_moves;
use crate::Position;

/// Full-width minimax without pruning.
#[derive(Debug, Clone, Default)]
pub struct NaiveSearch {
    evaluator: Evaluator,
    evaluated_moves: u64,
}

impl NaiveSearch {
    pub fn new(evaluator: Evaluator) -> Self {
        NaiveSearch {
            evaluator,
            evaluated_moves: 0,
        }
    }

    fn minimax(&mut self, position: &mut Position, depth: u32, maximizing: bool) -> i64 {
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
            let mut best = -INFINITY - bias;
            for &m in &moves {
                let score = position.with_move(m, |p| self.minimax(p, depth - 1, false));
                best = best.max(score);
            }
            best
        } else {
            let mut best = INFINITY + bias;
            for &m in &moves {
                let score = position.with_move(m, |p| self.minimax(p, depth - 1, true));
                best = best.min(score);
            }
            best
        }
    }
}

impl Recurse for NaiveSearch {
    fn counter(&mut self) -> &mut u64 {
        &mut self.evaluated_moves
    }

    fn score_reply(&mut self, position: &mut Position, depth: u32) -> i64 {
        self.minimax(position, depth, false)
    }
}

impl SearchStrategy for NaiveSearch {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn select_move(
        &mut self,
        position: &mut Position,
        depth: u32,
    ) -> Result<SearchOutcome, SearchError> {
        search_root(self, "naive", position, depth)
    }

    fn moves_evaluated(&self) -> u64 {
        self.evaluated_moves
    }
}
