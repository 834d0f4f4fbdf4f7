//! Static material evaluation.

use serde::Deserialize;
use treechess_core::{Color, PieceKind};

use crate::position::Status;
use crate::Position;

/// Magnitude of a decided game. Equal to the search's sentinel magnitude so
/// that a mate scored at a leaf and a mate found by an interior node compare
/// consistently with the depth bias.
pub const MATE_SCORE: i64 = 999_999_999;

/// Returns the material value of a piece kind.
///
/// The king carries a large finite value; both kings are always on the board,
/// so it cancels out of every material sum.
#[inline]
pub const fn piece_value(kind: PieceKind) -> i64 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Bishop => 350,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 99_999,
    }
}

/// How a position with no legal moves and a safe king is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalematePolicy {
    /// Stalemate is a draw, scored 0.
    #[default]
    Draw,
    /// Stalemate is scored like checkmate, as a loss for the side to move.
    Loss,
}

/// Scores positions from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluator {
    pub stalemate: StalematePolicy,
}

impl Evaluator {
    pub const fn new(stalemate: StalematePolicy) -> Self {
        Evaluator { stalemate }
    }

    /// Score for a side to move that has no legal moves.
    ///
    /// Returns `None` for ongoing positions.
    #[inline]
    pub const fn terminal_score(&self, status: Status) -> Option<i64> {
        match (status, self.stalemate) {
            (Status::Ongoing, _) => None,
            (Status::Checkmate, _) | (Status::Stalemate, StalematePolicy::Loss) => {
                Some(-MATE_SCORE)
            }
            (Status::Stalemate, StalematePolicy::Draw) => Some(0),
        }
    }

    /// Evaluates the position; positive is good for the side to move.
    ///
    /// Reads the status recorded by the last generation, so callers refresh
    /// it first when the position has changed since.
    pub fn evaluate(&self, position: &Position) -> i64 {
        if let Some(score) = self.terminal_score(position.status()) {
            return score;
        }
        let mut white_minus_black = 0;
        for color in Color::ALL {
            for piece in position.pieces(color) {
                if piece.active {
                    white_minus_black += color.sign() * piece_value(piece.kind);
                }
            }
        }
        white_minus_black * position.side_to_move().sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::refresh_status;

    #[test]
    fn startpos_is_balanced() {
        let position = Position::startpos();
        assert_eq!(Evaluator::default().evaluate(&position), 0);
    }

    #[test]
    fn score_follows_side_to_move() {
        // White is a rook up.
        let white = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w").unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b").unwrap();
        let eval = Evaluator::default();
        assert_eq!(eval.evaluate(&white), 500);
        assert_eq!(eval.evaluate(&black), -500);
    }

    #[test]
    fn captured_pieces_do_not_count() {
        let mut position = Position::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w").unwrap();
        let eval = Evaluator::default();
        assert_eq!(eval.evaluate(&position), 100 - 900);
        let m = crate::movegen::find_legal_move(&mut position, "e4d5").unwrap();
        position.apply(m);
        // Black to move, down a pawn.
        assert_eq!(eval.evaluate(&position), -100);
    }

    #[test]
    fn checkmate_favors_the_side_not_to_move() {
        let mut position = Position::from_fen("7k/6Q1/6K1/8/8/8/8/8 b").unwrap();
        refresh_status(&mut position);
        assert_eq!(Evaluator::default().evaluate(&position), -MATE_SCORE);
    }

    #[test]
    fn stalemate_policy() {
        let mut position = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b").unwrap();
        refresh_status(&mut position);
        assert_eq!(Evaluator::new(StalematePolicy::Draw).evaluate(&position), 0);
        assert_eq!(
            Evaluator::new(StalematePolicy::Loss).evaluate(&position),
            -MATE_SCORE
        );
    }

    #[test]
    fn piece_values() {
        assert_eq!(piece_value(PieceKind::Pawn), 100);
        assert_eq!(piece_value(PieceKind::Knight), 300);
        assert_eq!(piece_value(PieceKind::Bishop), 350);
        assert_eq!(piece_value(PieceKind::Rook), 500);
        assert_eq!(piece_value(PieceKind::Queen), 900);
        assert_eq!(piece_value(PieceKind::King), 99_999);
    }
}
