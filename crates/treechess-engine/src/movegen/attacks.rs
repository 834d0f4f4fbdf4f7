//! Movement offsets and attack detection.

use crate::Position;
use treechess_core::{Color, Coord, PieceKind};

/// Knight jump offsets as (rank, file) deltas.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// King step offsets as (rank, file) deltas.
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Orthogonal ray directions.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Diagonal ray directions.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// All eight ray directions.
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = KING_OFFSETS;

/// Returns the kind of `attacker`'s piece on `c`, if there is one.
#[inline]
fn attacker_kind(position: &Position, c: Coord, attacker: Color) -> Option<PieceKind> {
    if !c.is_on_board() {
        return None;
    }
    // SAFETY: bounds checked above.
    let id = unsafe { position.piece_at_unchecked(c) }?;
    (id.color == attacker).then(|| position.piece(id).kind)
}

/// Returns the kind of the first piece met walking from `from` along `dir`,
/// if that piece belongs to `attacker`.
#[inline]
fn ray_hit(position: &Position, from: Coord, dir: (i8, i8), attacker: Color) -> Option<PieceKind> {
    let mut c = from.offset(dir.0, dir.1);
    while c.is_on_board() {
        // SAFETY: loop condition keeps `c` on the board.
        if let Some(id) = unsafe { position.piece_at_unchecked(c) } {
            return (id.color == attacker).then(|| position.piece(id).kind);
        }
        c = c.offset(dir.0, dir.1);
    }
    None
}

/// Returns true if any active piece of `defender`'s opponent attacks `target`.
///
/// Pawns attack diagonally forward only; a pawn push never attacks.
pub fn is_attacked(position: &Position, target: Coord, defender: Color) -> bool {
    let attacker = defender.opposite();

    // A pawn attacks `target` from one rank behind it, seen from the pawn's side.
    let back = -attacker.pawn_direction();
    for df in [-1, 1] {
        if attacker_kind(position, target.offset(back, df), attacker) == Some(PieceKind::Pawn) {
            return true;
        }
    }

    for (dr, df) in KNIGHT_OFFSETS {
        if attacker_kind(position, target.offset(dr, df), attacker) == Some(PieceKind::Knight) {
            return true;
        }
    }

    for (dr, df) in KING_OFFSETS {
        if attacker_kind(position, target.offset(dr, df), attacker) == Some(PieceKind::King) {
            return true;
        }
    }

    for dir in ROOK_DIRECTIONS {
        if matches!(
            ray_hit(position, target, dir, attacker),
            Some(PieceKind::Rook | PieceKind::Queen)
        ) {
            return true;
        }
    }

    for dir in BISHOP_DIRECTIONS {
        if matches!(
            ray_hit(position, target, dir, attacker),
            Some(PieceKind::Bishop | PieceKind::Queen)
        ) {
            return true;
        }
    }

    false
}

/// Returns true if `color`'s king is attacked.
#[inline]
pub fn is_in_check(position: &Position, color: Color) -> bool {
    is_attacked(position, position.king(color).location, color)
}
