//! Core value types for treechess.
//!
//! This crate provides the plain values shared by the engine and its front end:
//! - [`Color`] and [`PieceKind`] for piece identity
//! - [`Coord`] for board coordinates
//! - [`PieceId`] and [`Move`] for move representation
//! - [`Description`] for parsing position-description (FEN-style) strings

mod color;
mod coord;
mod description;
mod mov;
mod piece;

pub use color::Color;
pub use coord::Coord;
pub use description::{Description, DescriptionError, Placement};
pub use mov::{Move, PieceId};
pub use piece::PieceKind;
