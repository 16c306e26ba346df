//! The 8×8 board, king records and square helpers.

use chess_core::{Color, ColoredPiece, Piece, Square};

/// A list of squares with a fixed maximum capacity.
///
/// Attacker sets, candidate origins and lines of sight are all small, so a
/// fixed-size array avoids heap allocations while probing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SquareList {
    squares: [Square; Self::CAPACITY],
    len: usize,
}

impl SquareList {
    /// One slot per board square.
    pub const CAPACITY: usize = 64;

    /// Creates an empty list.
    #[inline]
    pub const fn new() -> Self {
        SquareList {
            squares: [Square::A8; Self::CAPACITY],
            len: 0,
        }
    }

    /// Adds a square to the list.
    #[inline]
    pub fn push(&mut self, sq: Square) {
        debug_assert!(self.len < Self::CAPACITY);
        self.squares[self.len] = sq;
        self.len += 1;
    }

    /// Returns the number of squares.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the squares.
    #[inline]
    pub fn as_slice(&self) -> &[Square] {
        &self.squares[..self.len]
    }

    #[inline]
    pub fn contains(&self, sq: Square) -> bool {
        self.as_slice().contains(&sq)
    }

    /// Retains only squares for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(Square) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(self.squares[read]) {
                self.squares[write] = self.squares[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for SquareList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for SquareList {
    type Output = Square;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.squares[index]
    }
}

impl<'a> IntoIterator for &'a SquareList {
    type Item = &'a Square;
    type IntoIter = std::slice::Iter<'a, Square>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for SquareList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// The squares strictly between two co-linear squares.
///
/// Returns `None` when the squares share no row, column or diagonal (or are
/// the same square). The list never holds more than six squares.
pub fn line_of_sight(a: Square, b: Square) -> Option<SquareList> {
    let dr = b.row() as i8 - a.row() as i8;
    let dc = b.col() as i8 - a.col() as i8;
    if (dr == 0 && dc == 0) || (dr != 0 && dc != 0 && dr.abs() != dc.abs()) {
        return None;
    }

    let step = (dr.signum(), dc.signum());
    let mut line = SquareList::new();
    let mut current = a.offset(step.0, step.1);
    while let Some(sq) = current {
        if sq == b {
            break;
        }
        line.push(sq);
        current = sq.offset(step.0, step.1);
    }
    Some(line)
}

/// A cached king location plus that side's castling rights.
///
/// The rights can only be lost, never regained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KingRecord {
    square: Square,
    can_castle_short: bool,
    can_castle_long: bool,
}

impl KingRecord {
    pub const fn new(square: Square, can_castle_short: bool, can_castle_long: bool) -> Self {
        KingRecord {
            square,
            can_castle_short,
            can_castle_long,
        }
    }

    /// The king's current square.
    #[inline]
    pub const fn square(&self) -> Square {
        self.square
    }

    #[inline]
    pub const fn can_castle_short(&self) -> bool {
        self.can_castle_short
    }

    #[inline]
    pub const fn can_castle_long(&self) -> bool {
        self.can_castle_long
    }

    #[inline]
    pub const fn can_castle(&self, short: bool) -> bool {
        if short {
            self.can_castle_short
        } else {
            self.can_castle_long
        }
    }

    pub fn revoke_short(&mut self) {
        self.can_castle_short = false;
    }

    pub fn revoke_long(&mut self) {
        self.can_castle_long = false;
    }

    /// Moves the king, which forfeits both castling rights.
    pub fn relocate(&mut self, square: Square) {
        self.square = square;
        self.can_castle_short = false;
        self.can_castle_long = false;
    }

    /// Drops the right tied to a rook corner, if `corner` is one of this side's.
    pub fn revoke_corner(&mut self, color: Color, corner: Square) {
        if corner.row() != color.back_row() {
            return;
        }
        match corner.col() {
            7 => self.revoke_short(),
            0 => self.revoke_long(),
            _ => {}
        }
    }
}

impl From<KingRecord> for Square {
    fn from(record: KingRecord) -> Square {
        record.square
    }
}

/// An 8×8 grid of optional pieces, indexed by [`Square`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<ColoredPiece>; 64],
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Board { squares: [None; 64] }
    }

    /// The standard initial arrangement.
    pub fn startpos() -> Self {
        const BACK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        let mut board = Board::empty();
        for color in Color::ALL {
            for (col, piece) in BACK.iter().enumerate() {
                let col = col as u8;
                if let Some(sq) = Square::from_coords(color.back_row(), col) {
                    board.set(sq, Some(ColoredPiece::new(*piece, color)));
                }
                if let Some(sq) = Square::from_coords(color.pawn_row(), col) {
                    board.set(sq, Some(ColoredPiece::new(Piece::Pawn, color)));
                }
            }
        }
        board
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<ColoredPiece> {
        self.squares[sq.index() as usize]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<ColoredPiece>) {
        self.squares[sq.index() as usize] = piece;
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// True if `sq` holds a piece of `color`.
    #[inline]
    pub fn has_color(&self, sq: Square, color: Color) -> bool {
        matches!(self.get(sq), Some(p) if p.color == color)
    }

    /// True if both squares are occupied by pieces of the same color.
    pub fn same_color(&self, a: Square, b: Square) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(x), Some(y)) => x.color == y.color,
            _ => false,
        }
    }

    /// True if every square strictly between `a` and `b` is empty.
    ///
    /// Squares that are not co-linear never have clear sight.
    pub fn has_clear_sight(&self, a: Square, b: Square) -> bool {
        match line_of_sight(a, b) {
            Some(line) => line.as_slice().iter().all(|&sq| self.is_empty(sq)),
            None => false,
        }
    }

    /// Every piece of `color` with its square.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, ColoredPiece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    /// Every piece on the board with its square.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, ColoredPiece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|piece| (sq, piece)))
    }

    /// Squares holding exactly `piece`.
    pub fn find(&self, piece: ColoredPiece) -> impl Iterator<Item = Square> + '_ {
        Square::all().filter(move |&sq| self.get(sq) == Some(piece))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                let c = Square::from_coords(row, col)
                    .and_then(|sq| self.get(sq))
                    .map_or('.', |p| p.to_fen_char());
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_layout() {
        let board = Board::startpos();
        assert_eq!(
            board.get(Square::E1),
            Some(ColoredPiece::new(Piece::King, Color::White))
        );
        assert_eq!(
            board.get(Square::D8),
            Some(ColoredPiece::new(Piece::Queen, Color::Black))
        );
        assert_eq!(
            board.get(sq("c7")),
            Some(ColoredPiece::new(Piece::Pawn, Color::Black))
        );
        assert!(board.is_empty(sq("e4")));
        assert_eq!(board.pieces(Color::White).count(), 16);
        assert_eq!(board.occupied().count(), 32);
    }

    #[test]
    fn same_color_needs_two_occupied_squares() {
        let board = Board::startpos();
        assert!(board.same_color(Square::A1, Square::H1));
        assert!(!board.same_color(Square::A1, Square::A8));
        assert!(!board.same_color(Square::A1, sq("a4")));
    }

    #[test]
    fn line_of_sight_on_rows_columns_and_diagonals() {
        let line = line_of_sight(Square::A1, Square::H1).unwrap();
        assert_eq!(line.len(), 6);
        assert!(line.contains(sq("d1")));

        let line = line_of_sight(sq("c6"), sq("c3")).unwrap();
        assert_eq!(line.as_slice(), &[sq("c5"), sq("c4")]);

        let line = line_of_sight(sq("h8"), sq("e5")).unwrap();
        assert_eq!(line.as_slice(), &[sq("g7"), sq("f6")]);

        assert!(line_of_sight(sq("e4"), sq("e5")).unwrap().is_empty());
        assert!(line_of_sight(sq("g1"), sq("f3")).is_none());
        assert!(line_of_sight(sq("e4"), sq("e4")).is_none());
    }

    #[test]
    fn clear_sight_requires_empty_line() {
        let board = Board::startpos();
        assert!(!board.has_clear_sight(Square::A1, Square::A8));
        assert!(board.has_clear_sight(sq("a2"), sq("a7")));
        assert!(!board.has_clear_sight(Square::G1, sq("f3")));
    }

    #[test]
    fn king_record_rights_only_decrease() {
        let mut king = KingRecord::new(Square::E1, true, true);
        king.revoke_corner(Color::White, Square::H8);
        assert!(king.can_castle_short());
        king.revoke_corner(Color::White, Square::H1);
        assert!(!king.can_castle_short());
        assert!(king.can_castle_long());

        king.relocate(Square::D1);
        assert_eq!(Square::from(king), Square::D1);
        assert!(!king.can_castle(false));
    }

    #[test]
    fn square_list_retain() {
        let mut list = SquareList::new();
        list.push(Square::A1);
        list.push(Square::B8);
        list.push(Square::H1);
        list.retain(|sq| sq.row() == 7);
        assert_eq!(list.as_slice(), &[Square::A1, Square::H1]);
    }
}
