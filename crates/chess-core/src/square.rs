//! Squares, files and ranks.
//!
//! The board is addressed the way it is printed: row 0 is the eighth rank
//! (Black's back rank) and column 0 is the a-file, so `a8` has index 0 and
//! `h1` has index 63.

use std::fmt;

/// A board column, `a` through `h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File(u8);

impl File {
    /// The file at column `col` (0 is the a-file).
    pub const fn from_index(col: u8) -> Option<Self> {
        if col < 8 {
            Some(File(col))
        } else {
            None
        }
    }

    /// Parses a lower-case file letter.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn to_char(self) -> char {
        (b'a' + self.0) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A board row as printed, `8` at the top through `1` at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    /// The rank drawn on board row `row` (0 is the eighth rank).
    pub const fn from_row(row: u8) -> Option<Self> {
        if row < 8 {
            Some(Rank(row))
        } else {
            None
        }
    }

    /// Parses a rank digit, `'1'` through `'8'`.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(Rank(b'8' - c as u8)),
            _ => None,
        }
    }

    pub const fn row(self) -> u8 {
        self.0
    }

    pub const fn to_char(self) -> char {
        (b'8' - self.0) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One of the 64 squares, stored as `row * 8 + col`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const A8: Square = Square(0);
    pub const B8: Square = Square(1);
    pub const C8: Square = Square(2);
    pub const D8: Square = Square(3);
    pub const E8: Square = Square(4);
    pub const F8: Square = Square(5);
    pub const G8: Square = Square(6);
    pub const H8: Square = Square(7);
    pub const A1: Square = Square(56);
    pub const B1: Square = Square(57);
    pub const C1: Square = Square(58);
    pub const D1: Square = Square(59);
    pub const E1: Square = Square(60);
    pub const F1: Square = Square(61);
    pub const G1: Square = Square(62);
    pub const H1: Square = Square(63);

    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.0 * 8 + file.0)
    }

    /// The square at `(row, col)`, or `None` off the board.
    pub const fn from_coords(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square(row * 8 + col))
        } else {
            None
        }
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Parses a coordinate such as `e4`. Upper-case files are rejected.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        match chars.next() {
            None => Some(Square::new(file, rank)),
            Some(_) => None,
        }
    }

    /// Every square, a8 first and h1 last.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn row(self) -> u8 {
        self.0 >> 3
    }

    pub const fn col(self) -> u8 {
        self.0 & 7
    }

    pub const fn file(self) -> File {
        File(self.col())
    }

    pub const fn rank(self) -> Rank {
        Rank(self.row())
    }

    /// Steps `dr` rows down the printed board and `dc` columns right.
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row() as i8 + dr;
        let col = self.col() as i8 + dc;
        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Some(Square((row * 8 + col) as u8))
        } else {
            None
        }
    }

    /// a8 and h1 are light.
    pub const fn is_light(self) -> bool {
        (self.row() + self.col()) % 2 == 0
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn printed_layout() {
        assert_eq!(Square::A8.index(), 0);
        assert_eq!(Square::H1.index(), 63);
        assert_eq!(Square::E1.row(), 7);
        assert_eq!(Square::E1.col(), 4);
        assert_eq!(Square::from_coords(0, 7), Some(Square::H8));
        assert_eq!(Square::from_coords(3, 8), None);
    }

    #[test]
    fn files_and_ranks() {
        let d3 = Square::from_algebraic("d3").unwrap();
        assert_eq!(d3.file().to_char(), 'd');
        assert_eq!(d3.rank().to_char(), '3');
        assert_eq!(d3.rank().row(), 5);
        assert_eq!(Rank::from_row(0).map(Rank::to_char), Some('8'));
        assert_eq!(File::from_index(8), None);
        assert_eq!(Rank::from_char('0'), None);
    }

    #[test]
    fn algebraic_text() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::A1));
        assert_eq!(Square::from_algebraic("g8"), Some(Square::G8));
        for bad in ["", "e", "E4", "i1", "a9", "e44"] {
            assert_eq!(Square::from_algebraic(bad), None, "{}", bad);
        }
        assert_eq!(Square::C1.to_algebraic(), "c1");
        assert_eq!(format!("{:?}", Square::F8), "Square(f8)");
    }

    #[test]
    fn shading() {
        assert!(Square::A8.is_light());
        assert!(Square::H1.is_light());
        assert!(!Square::B8.is_light());
        assert!(!Square::A1.is_light());
    }

    proptest! {
        #[test]
        fn text_round_trip(index in 0u8..64) {
            let sq = Square::from_index(index).unwrap();
            prop_assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
            prop_assert_eq!(Square::new(sq.file(), sq.rank()), sq);
        }

        #[test]
        fn offset_stays_on_board(index in 0u8..64, dr in -8i8..=8, dc in -8i8..=8) {
            let sq = Square::from_index(index).unwrap();
            let row = sq.row() as i8 + dr;
            let col = sq.col() as i8 + dc;
            match sq.offset(dr, dc) {
                Some(to) => prop_assert_eq!((to.row() as i8, to.col() as i8), (row, col)),
                None => prop_assert!(!(0..8).contains(&row) || !(0..8).contains(&col)),
            }
        }
    }
}
