//! Core types for chess.
//!
//! This crate provides the fundamental types used across the rules engine:
//! - [`Piece`], [`ColoredPiece`] and [`Color`] for piece identity
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveKind`] for half-move representation
//! - FEN text validation

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{CastlingFlags, FenError, FenRecord, STARTPOS_FEN};
pub use mov::{Move, MoveKind};
pub use piece::{ColoredPiece, Piece};
pub use square::{File, Rank, Square};
