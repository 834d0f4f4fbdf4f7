//! Board coordinate representation.

use std::fmt;

/// A (rank, file) coordinate on the board.
///
/// Both components are signed so that stepping off the edge while walking a
/// ray or applying a jump offset yields a representable, off-board value
/// instead of wrapping. Only coordinates with both components in `0..=7`
/// are on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub rank: i8,
    pub file: i8,
}

impl Coord {
    /// Creates a coordinate. No bounds check is performed.
    #[inline]
    pub const fn new(rank: i8, file: i8) -> Self {
        Coord { rank, file }
    }

    /// Returns true if both components lie in `0..=7`.
    #[inline]
    pub const fn is_on_board(self) -> bool {
        self.rank >= 0 && self.rank <= 7 && self.file >= 0 && self.file <= 7
    }

    /// Returns this coordinate shifted by the given rank and file deltas.
    #[inline]
    pub const fn offset(self, dr: i8, df: i8) -> Self {
        Coord {
            rank: self.rank + dr,
            file: self.file + df,
        }
    }

    /// Parses a coordinate from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Some(Coord::new((rank - b'1') as i8, (file - b'a') as i8))
    }

    /// Returns the algebraic notation for this coordinate.
    ///
    /// Off-board coordinates render as `(rank,file)`.
    pub fn to_algebraic(self) -> String {
        if self.is_on_board() {
            format!(
                "{}{}",
                (b'a' + self.file as u8) as char,
                (b'1' + self.rank as u8) as char
            )
        } else {
            format!("({},{})", self.rank, self.file)
        }
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self.to_algebraic())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
