//! Reversible-state chess engine with fixed-depth search.
//!
//! This crate provides:
//! - [`Position`] - Board state with in-place [`apply`](Position::apply) and
//!   exact [`undo`](Position::undo)
//! - Legal move generation filtered by a simulated attack test
//! - [`Evaluator`] - Material scoring from the side to move's point of view
//! - [`NaiveSearch`] and [`AlphaBetaSearch`] - Interchangeable
//!   [`SearchStrategy`] implementations
//! - [`Game`] - Move history, take-back and turn-by-turn play
//!
//! # Architecture
//!
//! Every piece lives in a per-color registry and keeps its own history: how
//! often it moved and at which ply it first did. Castling rights and en
//! passant eligibility are derived from that history, so a [`treechess_core::Move`]
//! carries everything needed to reverse it and the search walks the tree by
//! applying and undoing moves on a single shared position.
//!
//! # Example
//!
//! ```
//! use treechess_engine::{generate_moves, AlphaBetaSearch, Evaluator, Game, SearchStrategy};
//!
//! let mut game = Game::new();
//! game.apply_uci("e2e4").unwrap();
//! game.apply_uci("e7e5").unwrap();
//!
//! let mut position = game.position().clone();
//! println!("Legal moves after 1.e4 e5: {}", generate_moves(&mut position).len());
//!
//! let mut strategy = AlphaBetaSearch::new(Evaluator::default());
//! let report = game.play_turn(&mut strategy, 2).unwrap();
//! println!("Engine plays {} ({} moves examined)", report.mv, report.moves_evaluated);
//! ```

pub mod eval;
mod game;
pub mod movegen;
mod position;
pub mod search;

pub use eval::{piece_value, Evaluator, StalematePolicy, MATE_SCORE};
pub use game::{Game, GameError, TurnReport};
pub use movegen::{
    find_legal_move, generate_moves, has_legal_move, is_attacked, is_in_check, legal_moves_for_side,
    legal_moves_from, pseudolegal_moves, refresh_status, MoveList,
};
pub use position::{Piece, Position, PositionError, Status};
pub use search::{
    AlphaBetaSearch, NaiveSearch, SearchError, SearchOutcome, SearchStrategy, StrategyKind,
};
