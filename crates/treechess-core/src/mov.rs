//! Move representation.

use crate::{Color, Coord, PieceKind};
use std::fmt;

/// Stable handle to a piece: its color and its index in that color's registry.
///
/// Pieces are never removed from a registry, so an id stays valid for the
/// whole lifetime of the position it was issued by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId {
    pub color: Color,
    pub index: u8,
}

impl PieceId {
    #[inline]
    pub const fn new(color: Color, index: u8) -> Self {
        PieceId { color, index }
    }
}

/// A move on the board.
///
/// A move is a plain value; applying it is the position's job. `target` is
/// the captured piece, the en-passant-captured pawn, or, for castling, the
/// rook that travels with the king. `castle` is `+1` for king-side, `-1` for
/// queen-side and `0` otherwise; the rook lands on `to.file - castle`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: PieceId,
    pub target: Option<PieceId>,
    pub from: Coord,
    pub to: Coord,
    pub en_passant: bool,
    pub castle: i8,
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// A placeholder move, used to fill fixed-capacity lists. Never legal.
    pub const NULL: Move = Move {
        piece: PieceId::new(Color::White, 0),
        target: None,
        from: Coord::new(0, 0),
        to: Coord::new(0, 0),
        en_passant: false,
        castle: 0,
        promotion: None,
    };

    /// Creates a non-capturing move.
    #[inline]
    pub const fn quiet(piece: PieceId, from: Coord, to: Coord) -> Self {
        Move {
            piece,
            target: None,
            from,
            to,
            en_passant: false,
            castle: 0,
            promotion: None,
        }
    }

    /// Creates a capture of the piece standing on `to`.
    #[inline]
    pub const fn capture(piece: PieceId, target: PieceId, from: Coord, to: Coord) -> Self {
        Move {
            piece,
            target: Some(target),
            from,
            to,
            en_passant: false,
            castle: 0,
            promotion: None,
        }
    }

    /// Creates an en passant capture of the pawn beside `from` on `to`'s file.
    #[inline]
    pub const fn en_passant_capture(
        piece: PieceId,
        captured: PieceId,
        from: Coord,
        to: Coord,
    ) -> Self {
        Move {
            piece,
            target: Some(captured),
            from,
            to,
            en_passant: true,
            castle: 0,
            promotion: None,
        }
    }

    /// Creates a castling move for `king` with `rook` in direction `castle` (+1 or -1).
    #[inline]
    pub const fn castling(king: PieceId, rook: PieceId, from: Coord, castle: i8) -> Self {
        Move {
            piece: king,
            target: Some(rook),
            from,
            to: from.offset(0, 2 * castle),
            en_passant: false,
            castle,
            promotion: None,
        }
    }

    /// Returns this move with the given promotion kind.
    #[inline]
    pub const fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// Returns true if this move removes an opposing piece.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.target.is_some() && self.castle == 0
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.castle != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    /// Returns the long algebraic notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        let promo = match self.promotion {
            Some(PieceKind::Knight) => "n",
            Some(PieceKind::Bishop) => "b",
            Some(PieceKind::Rook) => "r",
            Some(PieceKind::Queen) => "q",
            _ => "",
        };
        format!("{}{}{}", self.from, self.to, promo)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
