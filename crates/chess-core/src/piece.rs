//! Piece kinds and owned pieces.
//!
//! [`Piece`] is the kind alone; [`ColoredPiece`] pairs it with its owner.

use crate::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Upper-case letters, in the order of [`Piece::ALL`].
const LETTERS: [char; 6] = ['P', 'N', 'B', 'R', 'Q', 'K'];

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// What a pawn may become on the last rank, strongest first.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    /// The SAN letter. Pawns get `P` even though SAN leaves it out.
    pub const fn to_san_char(self) -> char {
        LETTERS[self as usize]
    }

    /// Looks up an upper-case letter; lower case never names a piece in SAN.
    pub fn from_san_char(c: char) -> Option<Piece> {
        LETTERS
            .iter()
            .position(|&letter| letter == c)
            .map(|i| Piece::ALL[i])
    }

    /// The FEN letter: upper case for White, lower case for Black.
    pub const fn to_fen_char(self, color: Color) -> char {
        let letter = self.to_san_char();
        match color {
            Color::White => letter,
            Color::Black => letter.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A piece on the board: its kind and the side that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColoredPiece {
    pub piece: Piece,
    pub color: Color,
}

impl ColoredPiece {
    pub const fn new(piece: Piece, color: Color) -> Self {
        ColoredPiece { piece, color }
    }

    #[inline]
    pub const fn is(self, piece: Piece) -> bool {
        self.piece as u8 == piece as u8
    }

    pub const fn to_fen_char(self) -> char {
        self.piece.to_fen_char(self.color)
    }

    /// Parses a FEN placement letter; the case picks the owner.
    pub fn from_fen_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = Piece::from_san_char(c.to_ascii_uppercase())?;
        Some(ColoredPiece { piece, color })
    }
}

impl fmt::Display for ColoredPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.piece)
    }
}
