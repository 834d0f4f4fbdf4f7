//! Fixed-depth adversarial search.
//!
//! Two interchangeable strategies share one root loop, one evaluator, and one
//! contract: [`NaiveSearch`] visits the full tree, [`AlphaBetaSearch`] skips
//! subtrees that cannot change the result. For the same position and depth
//! both return the same score and the same move; alpha-beta examines at most
//! as many moves.
//!
//! The maximize/minimize role is passed down the recursion explicitly: the
//! root is always the maximizing side, and the role flips every ply. Leaf
//! scores are produced from the leaf's side to move and converted into the
//! root side's frame with that flag.

mod alpha_beta;
mod naive;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use treechess_core::{Color, Move};

use crate::eval::{Evaluator, StalematePolicy, MATE_SCORE};
use crate::movegen::{generate_moves, refresh_status};
use crate::position::Status;
use crate::Position;

pub use alpha_beta::AlphaBetaSearch;
pub use naive::NaiveSearch;

/// Base magnitude of the best/worst-so-far sentinels.
///
/// Nodes start from `-INFINITY - depth` (maximizing) or `INFINITY + depth`
/// (minimizing). A node without legal moves returns its sentinel unchanged,
/// so a forced result found with more depth remaining scores further from
/// zero than the same result found deeper.
pub const INFINITY: i64 = MATE_SCORE;

/// Errors reported by a search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("{0} has no legal moves")]
    NoLegalMoves(Color),

    #[error("search depth must be at least 1")]
    ZeroDepth,
}

/// Result of a root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Move,
    /// Score of `best_move`, from the side to move's point of view.
    pub score: i64,
    /// Sum of the move-list sizes of every visited non-leaf node, root included.
    pub moves_evaluated: u64,
}

/// A move-selection strategy.
pub trait SearchStrategy {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Chooses a move for the side to move by searching `depth` plies.
    ///
    /// The position is mutated during the search and restored before return.
    fn select_move(
        &mut self,
        position: &mut Position,
        depth: u32,
    ) -> Result<SearchOutcome, SearchError>;

    /// Number of moves examined by the last call to `select_move`.
    fn moves_evaluated(&self) -> u64;
}

/// Selectable strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Naive,
    #[default]
    AlphaBeta,
}

impl StrategyKind {
    pub fn build(self, evaluator: Evaluator) -> Box<dyn SearchStrategy> {
        match self {
            StrategyKind::Naive => Box::new(NaiveSearch::new(evaluator)),
            StrategyKind::AlphaBeta => Box::new(AlphaBetaSearch::new(evaluator)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown strategy '{0}': expected 'naive' or 'alpha-beta'")]
pub struct ParseStrategyError(String);

impl FromStr for StrategyKind {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naive" | "minimax" => Ok(StrategyKind::Naive),
            "alpha-beta" | "alphabeta" | "ab" => Ok(StrategyKind::AlphaBeta),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Naive => write!(f, "naive"),
            StrategyKind::AlphaBeta => write!(f, "alpha-beta"),
        }
    }
}

/// The recursive half of a strategy, driven by [`search_root`].
trait Recurse {
    fn counter(&mut self) -> &mut u64;

    /// Scores the position reached by a root move, `depth` plies remaining,
    /// with the opponent to move (a minimizing node).
    fn score_reply(&mut self, position: &mut Position, depth: u32) -> i64;
}

/// Root loop shared by both strategies.
///
/// Every candidate is applied, scored as a minimizing node one ply down, and
/// undone; the first candidate with the strictly highest score wins.
fn search_root<S: Recurse>(
    strategy: &mut S,
    name: &'static str,
    position: &mut Position,
    depth: u32,
) -> Result<SearchOutcome, SearchError> {
    *strategy.counter() = 0;
    if depth == 0 {
        return Err(SearchError::ZeroDepth);
    }

    let side = position.side_to_move();
    let moves = generate_moves(position);
    *strategy.counter() = moves.len() as u64;
    if moves.is_empty() {
        return Err(SearchError::NoLegalMoves(side));
    }

    let mut best_score = -INFINITY - depth as i64;
    let mut best_move = moves[0];
    for &m in &moves {
        let score = position.with_move(m, |p| strategy.score_reply(p, depth - 1));
        if score > best_score {
            best_score = score;
            best_move = m;
        }
    }

    let moves_evaluated = *strategy.counter();
    tracing::debug!(
        strategy = name,
        depth,
        best_move = %best_move,
        score = best_score,
        moves_evaluated,
        "search complete"
    );

    Ok(SearchOutcome {
        best_move,
        score: best_score,
        moves_evaluated,
    })
}

/// Scores a leaf in the root side's frame.
///
/// The status is recomputed for the leaf first. The recorded one belongs to
/// the parent node, so reading it directly would miss mates and stalemates
/// that happen exactly at the leaf.
fn leaf_score(evaluator: &Evaluator, position: &mut Position, maximizing: bool) -> i64 {
    refresh_status(position);
    let score = evaluator.evaluate(position);
    if maximizing {
        score
    } else {
        -score
    }
}

/// True if a node that just generated no moves is a stalemate scored as a draw.
#[inline]
fn is_drawn_stalemate(evaluator: &Evaluator, position: &Position) -> bool {
    position.status() == Status::Stalemate && evaluator.stalemate == StalematePolicy::Draw
}
