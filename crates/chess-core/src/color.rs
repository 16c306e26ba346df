//! The two sides and the board rows that belong to them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors, White first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 0 for White, 1 for Black. Indexes per-side arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row step of a pawn advance. White walks towards row 0.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The row holding this side's king and rooks at the start.
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The row this side's pawns start on.
    pub const fn pawn_row(self) -> u8 {
        (self.back_row() as i8 + self.forward()) as u8
    }

    /// Where a pawn lands after advancing two squares.
    pub const fn double_push_row(self) -> u8 {
        (self.back_row() as i8 + 3 * self.forward()) as u8
    }

    pub const fn promotion_row(self) -> u8 {
        self.opposite().back_row()
    }

    /// `w` or `b`, as in the FEN side-to-move field.
    pub const fn to_fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}
