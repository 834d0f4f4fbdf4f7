//! JSON reports for the `best` and `compare` commands.

use serde::Serialize;
use treechess_engine::{SearchOutcome, TurnReport};

/// Result of a single searched turn.
#[derive(Debug, Serialize)]
pub struct BestMoveReport {
    /// Position the search started from.
    pub fen: String,
    pub strategy: String,
    pub depth: u32,
    /// Chosen move in coordinate notation.
    pub best_move: String,
    pub score: i64,
    pub moves_evaluated: u64,
    /// Position after the chosen move.
    pub resulting_fen: String,
    /// `ongoing`, `checkmate` or `stalemate` after the move.
    pub status: String,
}

impl BestMoveReport {
    pub fn new(fen: String, strategy: &str, depth: u32, turn: &TurnReport) -> Self {
        BestMoveReport {
            fen,
            strategy: strategy.to_string(),
            depth,
            best_move: turn.mv.to_uci(),
            score: turn.score,
            moves_evaluated: turn.moves_evaluated,
            resulting_fen: turn.fen.clone(),
            status: format!("{:?}", turn.status).to_lowercase(),
        }
    }
}

/// One strategy's line in a comparison.
#[derive(Debug, Serialize)]
pub struct StrategyLine {
    pub strategy: String,
    pub best_move: String,
    pub score: i64,
    pub moves_evaluated: u64,
}

impl StrategyLine {
    pub fn new(strategy: &str, outcome: &SearchOutcome) -> Self {
        StrategyLine {
            strategy: strategy.to_string(),
            best_move: outcome.best_move.to_uci(),
            score: outcome.score,
            moves_evaluated: outcome.moves_evaluated,
        }
    }
}

/// Side-by-side results of every strategy on one position.
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub fen: String,
    pub depth: u32,
    pub lines: Vec<StrategyLine>,
    /// True when every strategy chose the same move with the same score.
    pub agree: bool,
}

impl ComparisonReport {
    pub fn new(fen: String, depth: u32, lines: Vec<StrategyLine>) -> Self {
        let agree = lines
            .windows(2)
            .all(|w| w[0].best_move == w[1].best_move && w[0].score == w[1].score);
        ComparisonReport {
            fen,
            depth,
            lines,
            agree,
        }
    }
}
