//! Board position with reversible, in-place move application.

use std::fmt;

use thiserror::Error;
use treechess_core::{Color, Coord, Description, DescriptionError, Move, PieceId, PieceKind};

/// Errors that can occur when building or querying a position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    InvalidDescription(#[from] DescriptionError),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    MultipleKings(Color),

    #[error("coordinate {0} is off the board")]
    OffBoardCoordinate(Coord),
}

/// Outcome of the last full move generation for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// At least one legal move exists (or no generation has run yet).
    #[default]
    Ongoing,
    /// No legal moves and the king is attacked.
    Checkmate,
    /// No legal moves and the king is safe.
    Stalemate,
}

impl Status {
    /// True when the side to move has no legal moves, whatever the reason.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Status::Ongoing)
    }
}

/// A piece owned by a position.
///
/// Captured pieces stay in their registry with `active == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub location: Coord,
    /// Square the piece stood on when the position was loaded.
    pub home: Coord,
    pub active: bool,
    /// Number of times this piece has moved.
    pub move_count: u32,
    /// Ply at which this piece first moved.
    pub first_move_ply: Option<u32>,
    pub index: u8,
}

impl Piece {
    #[inline]
    pub const fn id(&self) -> PieceId {
        PieceId::new(self.color, self.index)
    }
}

/// Complete game state, mutated in place by matched [`apply`](Position::apply)
/// and [`undo`](Position::undo) calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// `grid[rank][file]`, rank 0 is White's back rank.
    grid: [[Option<PieceId>; 8]; 8],
    /// Piece registries indexed by `Color::index()`.
    pieces: [Vec<Piece>; 2],
    kings: [u8; 2],
    side_to_move: Color,
    ply: u32,
    status: Status,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(Description::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a description, rejecting malformed input.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Self::from_description(&Description::parse(fen)?)
    }

    /// Creates a position from a description, skipping unrecognized characters.
    pub fn from_fen_lenient(fen: &str) -> Result<Self, PositionError> {
        Self::from_description(&Description::parse_lenient(fen)?)
    }

    /// Builds a position from a parsed description.
    ///
    /// Registries are filled in description order. Each side needs exactly
    /// one king, since the legality filter is anchored on it.
    pub fn from_description(desc: &Description) -> Result<Self, PositionError> {
        let mut grid = [[None; 8]; 8];
        let mut pieces: [Vec<Piece>; 2] = [Vec::new(), Vec::new()];
        let mut kings: [Option<u8>; 2] = [None, None];

        for placement in &desc.placements {
            let registry = &mut pieces[placement.color.index()];
            let index = registry.len() as u8;
            if placement.kind == PieceKind::King {
                if kings[placement.color.index()].is_some() {
                    return Err(PositionError::MultipleKings(placement.color));
                }
                kings[placement.color.index()] = Some(index);
            }
            let c = placement.coord;
            grid[c.rank as usize][c.file as usize] = Some(PieceId::new(placement.color, index));
            registry.push(Piece {
                color: placement.color,
                kind: placement.kind,
                location: c,
                home: c,
                active: true,
                move_count: 0,
                first_move_ply: None,
                index,
            });
        }

        let white_king = kings[0].ok_or(PositionError::MissingKing(Color::White))?;
        let black_king = kings[1].ok_or(PositionError::MissingKing(Color::Black))?;

        Ok(Position {
            grid,
            pieces,
            kings: [white_king, black_king],
            side_to_move: desc.side_to_move,
            ply: 0,
            status: Status::Ongoing,
        })
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Number of plies applied since the position was loaded.
    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// Status recorded by the last generation for the side to move.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// True when the side to move was found to have no legal moves.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    #[inline]
    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Returns the piece behind an id.
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.color.index()][id.index as usize]
    }

    #[inline]
    fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.color.index()][id.index as usize]
    }

    /// Returns a color's registry, captured pieces included.
    #[inline]
    pub fn pieces(&self, color: Color) -> &[Piece] {
        &self.pieces[color.index()]
    }

    /// Returns a color's king.
    #[inline]
    pub fn king(&self, color: Color) -> &Piece {
        &self.pieces[color.index()][self.kings[color.index()] as usize]
    }

    #[inline]
    pub fn is_on_board(&self, c: Coord) -> bool {
        c.is_on_board()
    }

    #[inline]
    pub fn has_piece(&self, c: Coord) -> bool {
        self.piece_at(c).is_some()
    }

    /// Returns the piece on `c`, or `None` if `c` is empty or off the board.
    #[inline]
    pub fn piece_at(&self, c: Coord) -> Option<PieceId> {
        if !c.is_on_board() {
            return None;
        }
        self.grid[c.rank as usize][c.file as usize]
    }

    /// Like [`piece_at`](Self::piece_at), but reports off-board coordinates.
    pub fn checked_piece_at(&self, c: Coord) -> Result<Option<PieceId>, PositionError> {
        if !c.is_on_board() {
            return Err(PositionError::OffBoardCoordinate(c));
        }
        Ok(self.grid[c.rank as usize][c.file as usize])
    }

    /// Returns the piece on `c` without bounds checking.
    ///
    /// # Safety
    /// `c` must be on the board (both components in `0..=7`).
    #[inline]
    pub unsafe fn piece_at_unchecked(&self, c: Coord) -> Option<PieceId> {
        debug_assert!(c.is_on_board());
        *self
            .grid
            .get_unchecked(c.rank as usize)
            .get_unchecked(c.file as usize)
    }

    /// Returns the piece on `c` only if it belongs to the side to move.
    #[inline]
    pub fn owned_at(&self, c: Coord) -> Option<PieceId> {
        self.piece_at(c)
            .filter(|id| id.color == self.side_to_move)
    }

    #[inline]
    fn set(&mut self, c: Coord, id: Option<PieceId>) {
        self.grid[c.rank as usize][c.file as usize] = id;
    }

    /// Applies a move in place.
    ///
    /// The move must have been generated for this exact position; anything
    /// else corrupts the board.
    pub fn apply(&mut self, m: Move) {
        if m.en_passant {
            self.set(m.from, None);
            self.set(Coord::new(m.from.rank, m.to.file), None);
            self.set(m.to, Some(m.piece));
            if let Some(captured) = m.target {
                self.piece_mut(captured).active = false;
            }
        } else if m.castle != 0 {
            let rook_home = Coord::new(m.to.rank, if m.castle < 0 { 0 } else { 7 });
            let rook_dest = Coord::new(m.to.rank, m.to.file - m.castle);
            self.set(m.from, None);
            self.set(rook_home, None);
            self.set(m.to, Some(m.piece));
            self.set(rook_dest, m.target);
            if let Some(rook) = m.target {
                self.piece_mut(rook).location = rook_dest;
            }
        } else {
            self.set(m.from, None);
            self.set(m.to, Some(m.piece));
            if let Some(captured) = m.target {
                self.piece_mut(captured).active = false;
            }
        }

        self.side_to_move = self.side_to_move.opposite();

        let ply = self.ply;
        let piece = self.piece_mut(m.piece);
        if piece.move_count == 0 {
            piece.first_move_ply = Some(ply);
        }
        if let Some(kind) = m.promotion {
            piece.kind = kind;
        }
        piece.location = m.to;
        piece.move_count += 1;
        self.ply += 1;
    }

    /// Reverts a move previously passed to [`apply`](Self::apply).
    ///
    /// Must be called with the most recently applied move.
    pub fn undo(&mut self, m: Move) {
        if m.en_passant {
            self.set(m.from, Some(m.piece));
            self.set(Coord::new(m.from.rank, m.to.file), m.target);
            self.set(m.to, None);
            if let Some(captured) = m.target {
                self.piece_mut(captured).active = true;
            }
        } else if m.castle != 0 {
            let rook_home = Coord::new(m.to.rank, if m.castle < 0 { 0 } else { 7 });
            self.set(m.from, Some(m.piece));
            self.set(rook_home, m.target);
            self.set(m.to, None);
            self.set(Coord::new(m.to.rank, m.to.file - m.castle), None);
            if let Some(rook) = m.target {
                self.piece_mut(rook).location = rook_home;
            }
        } else {
            self.set(m.from, Some(m.piece));
            self.set(m.to, m.target);
            if let Some(captured) = m.target {
                self.piece_mut(captured).active = true;
            }
        }

        self.side_to_move = self.side_to_move.opposite();

        let piece = self.piece_mut(m.piece);
        if piece.move_count == 1 {
            piece.first_move_ply = None;
        }
        if m.promotion.is_some() {
            piece.kind = PieceKind::Pawn;
        }
        piece.location = m.from;
        piece.move_count -= 1;
        self.ply -= 1;
    }

    /// Applies `m`, runs `f` on the resulting position, then undoes `m`.
    ///
    /// The recorded [`Status`] is restored too; generation inside `f`
    /// overwrites it for the child position.
    #[inline]
    pub fn with_move<R>(&mut self, m: Move, f: impl FnOnce(&mut Self) -> R) -> R {
        let status = self.status;
        self.apply(m);
        let result = f(self);
        self.undo(m);
        self.status = status;
        result
    }

    /// Renders the placement and side to move as a description string.
    ///
    /// Castling and en-passant fields are written as `-` since they are
    /// derived from piece history rather than stored.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                if let Some(id) = self.grid[rank][file] {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    let piece = self.piece(id);
                    fen.push(piece.kind.to_fen_char(piece.color));
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(self.side_to_move.to_char());
        fen.push_str(" - - 0 ");
        fen.push_str(&(self.ply / 2 + 1).to_string());
        fen
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let c = match self.grid[rank][file] {
                    Some(id) => {
                        let piece = self.piece(id);
                        piece.kind.to_fen_char(piece.color)
                    }
                    None => '.',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
