//! Compact position encoding for repetition detection.
//!
//! Each square takes one nibble, two squares per byte with the even column in
//! the low nibble. Besides the piece codes, the square a pawn just skipped
//! with a double push is marked, and corner rooks still carrying a castling
//! right get their code bumped by one. Two encodings are equal exactly when
//! their packed bytes are.

use crate::position::Position;
use chess_core::{Color, ColoredPiece, Piece, Square};
use std::collections::TryReserveError;

/// Nibble marking the square behind a pawn that just advanced two squares.
pub const EN_PASSANT_CODE: u8 = 15;

/// Nibble code of a piece. Empty squares are 0.
pub const fn piece_code(piece: ColoredPiece) -> u8 {
    let base = match piece.piece {
        Piece::Pawn => 1,
        Piece::Rook => 3,
        Piece::Knight => 7,
        Piece::Bishop => 9,
        Piece::Queen => 11,
        Piece::King => 13,
    };
    // Rooks leave a gap for their castling variant.
    let white_step = if matches!(piece.piece, Piece::Rook) { 2 } else { 1 };
    match piece.color {
        Color::White => base + white_step,
        Color::Black => base,
    }
}

/// A packed snapshot of a position. Equality is equality of the 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedPosition {
    squares: [u8; 32],
}

impl EncodedPosition {
    /// Encodes `position`.
    pub fn new(position: &Position) -> Self {
        let mut encoded = EncodedPosition { squares: [0; 32] };

        for (sq, piece) in position.board.occupied() {
            encoded.set(sq, piece_code(piece));
        }
        if let Some(passed) = position.en_passant_square() {
            encoded.set(passed, EN_PASSANT_CODE);
        }

        for color in Color::ALL {
            let king = position.king(color);
            let rook = ColoredPiece::new(Piece::Rook, color);
            for (col, held) in [(7, king.can_castle_short()), (0, king.can_castle_long())] {
                let Some(corner) = Square::from_coords(color.back_row(), col) else {
                    continue;
                };
                if held && position.board.get(corner) == Some(rook) {
                    encoded.set(corner, piece_code(rook) + 1);
                }
            }
        }
        encoded
    }

    /// The nibble stored for `sq`.
    pub fn code(&self, sq: Square) -> u8 {
        let byte = self.squares[sq.index() as usize / 2];
        if sq.col() % 2 == 0 {
            byte & 0x0f
        } else {
            byte >> 4
        }
    }

    fn set(&mut self, sq: Square, code: u8) {
        let byte = &mut self.squares[sq.index() as usize / 2];
        if sq.col() % 2 == 0 {
            *byte = (*byte & 0xf0) | code;
        } else {
            *byte = (*byte & 0x0f) | (code << 4);
        }
    }

    /// The packed bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.squares
    }
}

/// Encodings of every position since the last capture or pawn move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepetitionCache {
    window: Vec<EncodedPosition>,
}

impl RepetitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A window holding only `start`.
    pub fn starting_at(start: EncodedPosition) -> Self {
        RepetitionCache {
            window: vec![start],
        }
    }

    /// Makes room for one more entry.
    pub fn reserve(&mut self) -> Result<(), TryReserveError> {
        self.window.try_reserve(1)
    }

    /// Forgets every entry; no earlier position can recur after an
    /// irreversible move.
    pub fn clear(&mut self) {
        self.window.clear();
    }

    /// Adds `position` and returns how often it now occurs in the window.
    pub fn record(&mut self, position: EncodedPosition) -> usize {
        let earlier = self.window.iter().filter(|&&p| p == position).count();
        self.window.push(position);
        earlier + 1
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}
