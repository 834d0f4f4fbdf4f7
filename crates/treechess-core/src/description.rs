//! Position-description (FEN-style) parsing.
//!
//! Only the piece placement and the side-to-move token are consumed. The
//! remaining FEN fields (castling, en passant, clocks) may be present and are
//! ignored: castling and en-passant eligibility are derived from each piece's
//! move history instead.

use crate::{Color, Coord, PieceKind};
use thiserror::Error;

/// Errors that can occur when parsing position descriptions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("invalid position description: missing piece placement")]
    MissingPlacement,

    #[error("invalid position description: missing side-to-move token")]
    MissingSideToMove,

    #[error("invalid side to move: expected 'w' or 'b', got '{0}'")]
    InvalidSideToMove(String),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid position description: expected at most 6 fields, got {0}")]
    TooManyFields(usize),
}

/// A single piece entry of a parsed description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub coord: Coord,
    pub kind: PieceKind,
    pub color: Color,
}

/// Parsed position description.
///
/// Placements are listed in reading order: top rank first, files left to
/// right. The engine relies on this order to build its piece registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub placements: Vec<Placement>,
    pub side_to_move: Color,
}

impl Description {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a description, rejecting anything malformed.
    pub fn parse(s: &str) -> Result<Self, DescriptionError> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.len() {
            0 => return Err(DescriptionError::MissingPlacement),
            1 => return Err(DescriptionError::MissingSideToMove),
            n if n > 6 => return Err(DescriptionError::TooManyFields(n)),
            _ => {}
        }

        let placements = Self::parse_placement(parts[0])?;
        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(DescriptionError::InvalidSideToMove(other.to_string())),
        };

        Ok(Description {
            placements,
            side_to_move,
        })
    }

    /// Parses a description the permissive way.
    ///
    /// Unrecognized placement characters are skipped, pieces that would land
    /// off the board are dropped, and a side token starting with `w` means
    /// white while anything else means black. Only a missing side token is
    /// an error.
    pub fn parse_lenient(s: &str) -> Result<Self, DescriptionError> {
        let mut parts = s.split_whitespace();
        let placement = parts.next().ok_or(DescriptionError::MissingPlacement)?;
        let side = parts.next().ok_or(DescriptionError::MissingSideToMove)?;

        let mut placements = Vec::new();
        let mut rank: i8 = 7;
        let mut file: i8 = 0;
        for c in placement.chars() {
            if c == '/' {
                rank = rank.saturating_sub(1);
                file = 0;
            } else if let Some(run) = c.to_digit(10) {
                file = file.saturating_add(run as i8);
            } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                let coord = Coord::new(rank, file);
                if coord.is_on_board() {
                    placements.push(Placement { coord, kind, color });
                }
                file = file.saturating_add(1);
            }
        }

        let side_to_move = if side.starts_with('w') {
            Color::White
        } else {
            Color::Black
        };

        Ok(Description {
            placements,
            side_to_move,
        })
    }

    fn parse_placement(placement: &str) -> Result<Vec<Placement>, DescriptionError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(DescriptionError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut placements = Vec::new();
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as i8;
            let mut file: i8 = 0;
            for c in rank_str.chars() {
                if let Some(run @ 1..=8) = c.to_digit(10) {
                    file += run as i8;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    if file < 8 {
                        placements.push(Placement {
                            coord: Coord::new(rank, file),
                            kind,
                            color,
                        });
                    }
                    file += 1;
                } else {
                    return Err(DescriptionError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
                if file > 8 {
                    break;
                }
            }
            if file != 8 {
                return Err(DescriptionError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank + 1,
                    file
                )));
            }
        }

        Ok(placements)
    }
}

impl Default for Description {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}
