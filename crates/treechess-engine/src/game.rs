//! Turn-by-turn play on top of a [`Position`].
//!
//! A [`Game`] owns the position and the list of moves applied to it, so moves
//! can be taken back in order. Each [`Game::play_turn`] asks a strategy for a
//! move, applies it, and reports what happened.

use thiserror::Error;
use treechess_core::Move;

use crate::movegen::{find_legal_move, refresh_status};
use crate::position::{PositionError, Status};
use crate::search::{SearchError, SearchStrategy};
use crate::Position;

/// Error type for game operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Position(#[from] PositionError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("game is over: {0:?}")]
    GameOver(Status),
}

/// Summary of one played turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub mv: Move,
    /// Search score of `mv` for the side that played it.
    pub score: i64,
    pub moves_evaluated: u64,
    /// Position after the move.
    pub fen: String,
    /// Status of the position after the move.
    pub status: Status,
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    history: Vec<Move>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    pub fn from_position(mut position: Position) -> Self {
        refresh_status(&mut position);
        Game {
            position,
            history: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Moves applied since the game was created, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn status(&self) -> Status {
        self.position.status()
    }

    pub fn is_over(&self) -> bool {
        self.position.is_terminal()
    }

    /// Applies a legal move given in coordinate notation, such as `e2e4` or `e7e8q`.
    pub fn apply_uci(&mut self, text: &str) -> Result<Move, GameError> {
        self.ensure_ongoing()?;
        let m = find_legal_move(&mut self.position, text)
            .ok_or_else(|| GameError::IllegalMove(text.to_string()))?;
        self.push(m);
        Ok(m)
    }

    /// Lets `strategy` choose and play a move for the side to move.
    pub fn play_turn(
        &mut self,
        strategy: &mut dyn SearchStrategy,
        depth: u32,
    ) -> Result<TurnReport, GameError> {
        self.ensure_ongoing()?;
        let outcome = strategy.select_move(&mut self.position, depth)?;
        self.push(outcome.best_move);

        tracing::trace!(
            ply = self.history.len(),
            mv = %outcome.best_move,
            score = outcome.score,
            "turn played"
        );

        Ok(TurnReport {
            mv: outcome.best_move,
            score: outcome.score,
            moves_evaluated: outcome.moves_evaluated,
            fen: self.position.to_fen(),
            status: self.position.status(),
        })
    }

    /// Undoes the last move. Returns `None` if no move has been played.
    pub fn take_back(&mut self) -> Option<Move> {
        let m = self.history.pop()?;
        self.position.undo(m);
        refresh_status(&mut self.position);
        Some(m)
    }

    fn ensure_ongoing(&mut self) -> Result<(), GameError> {
        match refresh_status(&mut self.position) {
            Status::Ongoing => Ok(()),
            status => Err(GameError::GameOver(status)),
        }
    }

    fn push(&mut self, m: Move) {
        self.position.apply(m);
        self.history.push(m);
        refresh_status(&mut self.position);
    }
}
