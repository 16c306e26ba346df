//! Move representation.

use crate::{Color, ColoredPiece, Piece, Square};
use std::fmt;

/// What kind of half-move a [`Move`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// A plain move or capture.
    Normal = 0,
    /// Pawn double push from its starting row.
    DoublePawnPush = 1,
    /// En passant capture.
    EnPassant = 2,
    /// Pawn promotion, capturing or not.
    Promotion = 3,
    /// Kingside castling (O-O).
    CastleShort = 4,
    /// Queenside castling (O-O-O).
    CastleLong = 5,
    /// The mover offers a draw, which ends the game by agreement.
    DrawOffer = 6,
    /// The mover resigns.
    Resign = 7,
}

impl MoveKind {
    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveKind::CastleShort | MoveKind::CastleLong)
    }

    /// Returns true for draw offers and resignations, which leave the board alone.
    #[inline]
    pub const fn is_claim(self) -> bool {
        matches!(self, MoveKind::DrawOffer | MoveKind::Resign)
    }
}

/// A fully specified half-move.
///
/// Produced by the notation resolver, consumed by the board mutator and the
/// status state machine. For [`MoveKind::DrawOffer`] and [`MoveKind::Resign`]
/// both squares are the mover's king square.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub kind: MoveKind,
    pub from: Square,
    pub to: Square,
    pub piece: ColoredPiece,
    pub captures: bool,
    pub promotion: Option<Piece>,
}

impl Move {
    /// Creates a move of the given kind.
    #[inline]
    pub const fn new(
        kind: MoveKind,
        from: Square,
        to: Square,
        piece: ColoredPiece,
        captures: bool,
    ) -> Self {
        Move {
            kind,
            from,
            to,
            piece,
            captures,
            promotion: None,
        }
    }

    /// Creates a non-capturing normal move.
    #[inline]
    pub const fn normal(from: Square, to: Square, piece: ColoredPiece) -> Self {
        Self::new(MoveKind::Normal, from, to, piece, false)
    }

    /// Creates a normal capture.
    #[inline]
    pub const fn capture(from: Square, to: Square, piece: ColoredPiece) -> Self {
        Self::new(MoveKind::Normal, from, to, piece, true)
    }

    /// Creates a promotion of the pawn on `from` to `promotion`.
    #[inline]
    pub const fn promote(
        from: Square,
        to: Square,
        color: Color,
        captures: bool,
        promotion: Piece,
    ) -> Self {
        Move {
            kind: MoveKind::Promotion,
            from,
            to,
            piece: ColoredPiece::new(Piece::Pawn, color),
            captures,
            promotion: Some(promotion),
        }
    }

    /// Creates a castling move for `color` from its home king square.
    pub const fn castle(color: Color, short: bool) -> Self {
        let (from, to) = match (color, short) {
            (Color::White, true) => (Square::E1, Square::G1),
            (Color::White, false) => (Square::E1, Square::C1),
            (Color::Black, true) => (Square::E8, Square::G8),
            (Color::Black, false) => (Square::E8, Square::C8),
        };
        let kind = if short {
            MoveKind::CastleShort
        } else {
            MoveKind::CastleLong
        };
        Self::new(kind, from, to, ColoredPiece::new(Piece::King, color), false)
    }

    /// A draw offer by `color`, whose king stands on `king`.
    pub const fn draw_offer(color: Color, king: Square) -> Self {
        Self::new(
            MoveKind::DrawOffer,
            king,
            king,
            ColoredPiece::new(Piece::King, color),
            false,
        )
    }

    /// A resignation by `color`, whose king stands on `king`.
    pub const fn resign(color: Color, king: Square) -> Self {
        Self::new(
            MoveKind::Resign,
            king,
            king,
            ColoredPiece::new(Piece::King, color),
            false,
        )
    }

    /// The side making this move.
    #[inline]
    pub const fn color(self) -> Color {
        self.piece.color
    }

    /// Returns true if the moved piece is a pawn.
    #[inline]
    pub const fn is_pawn_move(self) -> bool {
        self.piece.is(Piece::Pawn)
    }

    /// True for captures and pawn moves, after which no earlier position can recur.
    #[inline]
    pub const fn is_irreversible(self) -> bool {
        self.captures || self.is_pawn_move()
    }

    /// Square of the pawn removed by an en passant capture.
    #[inline]
    pub const fn en_passant_victim(self) -> Square {
        match Square::from_coords(self.from.row(), self.to.col()) {
            Some(sq) => sq,
            None => unreachable!(),
        }
    }

    /// The square a double-pushed pawn skipped over.
    pub const fn passed_square(self) -> Option<Square> {
        match self.kind {
            MoveKind::DoublePawnPush => {
                Square::from_coords((self.from.row() + self.to.row()) / 2, self.to.col())
            }
            _ => None,
        }
    }

    /// Rook origin and destination for castling moves.
    pub const fn rook_squares(self) -> Option<(Square, Square)> {
        let row = self.from.row();
        let (from_col, to_col) = match self.kind {
            MoveKind::CastleShort => (7, 5),
            MoveKind::CastleLong => (0, 3),
            _ => return None,
        };
        match (
            Square::from_coords(row, from_col),
            Square::from_coords(row, to_col),
        ) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    /// The piece standing on the destination once the move is made.
    #[inline]
    pub const fn placed_piece(self) -> ColoredPiece {
        match self.promotion {
            Some(piece) => ColoredPiece::new(piece, self.piece.color),
            None => self.piece,
        }
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.kind {
            MoveKind::DrawOffer => "draw".to_string(),
            MoveKind::Resign => "resign".to_string(),
            _ => {
                let promo = match self.promotion {
                    Some(piece) => piece.to_fen_char(Color::Black).to_string(),
                    None => String::new(),
                };
                format!("{}{}{}", self.from, self.to, promo)
            }
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({:?} {})", self.kind, self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn castle_moves_use_home_squares() {
        let m = Move::castle(Color::White, true);
        assert_eq!((m.from, m.to), (Square::E1, Square::G1));
        assert_eq!(m.rook_squares(), Some((Square::H1, Square::F1)));

        let m = Move::castle(Color::Black, false);
        assert_eq!((m.from, m.to), (Square::E8, Square::C8));
        assert_eq!(m.rook_squares(), Some((Square::A8, Square::D8)));
        assert!(m.kind.is_castling());
    }

    #[test]
    fn en_passant_victim_is_beside_origin() {
        let pawn = ColoredPiece::new(Piece::Pawn, Color::White);
        let m = Move::new(MoveKind::EnPassant, sq("e5"), sq("f6"), pawn, true);
        assert_eq!(m.en_passant_victim(), sq("f5"));
    }

    #[test]
    fn passed_square_only_for_double_push() {
        let pawn = ColoredPiece::new(Piece::Pawn, Color::Black);
        let double = Move::new(MoveKind::DoublePawnPush, sq("d7"), sq("d5"), pawn, false);
        assert_eq!(double.passed_square(), Some(sq("d6")));
        assert_eq!(Move::normal(sq("d6"), sq("d5"), pawn).passed_square(), None);
    }

    #[test]
    fn promotion_places_new_piece() {
        let m = Move::promote(sq("e7"), sq("e8"), Color::White, false, Piece::Knight);
        assert_eq!(
            m.placed_piece(),
            ColoredPiece::new(Piece::Knight, Color::White)
        );
        assert_eq!(m.to_uci(), "e7e8n");
    }

    #[test]
    fn irreversible_moves() {
        let knight = ColoredPiece::new(Piece::Knight, Color::White);
        let pawn = ColoredPiece::new(Piece::Pawn, Color::White);
        assert!(!Move::normal(sq("g1"), sq("f3"), knight).is_irreversible());
        assert!(Move::capture(sq("f3"), sq("e5"), knight).is_irreversible());
        assert!(Move::normal(sq("e3"), sq("e4"), pawn).is_irreversible());
    }

    #[test]
    fn claims() {
        let m = Move::resign(Color::Black, Square::E8);
        assert!(m.kind.is_claim());
        assert_eq!(m.color(), Color::Black);
        assert_eq!(m.to_uci(), "resign");
        assert!(!MoveKind::Normal.is_claim());
    }

    #[test]
    fn move_debug_display() {
        let pawn = ColoredPiece::new(Piece::Pawn, Color::White);
        let m = Move::new(MoveKind::DoublePawnPush, sq("e2"), sq("e4"), pawn, false);
        assert_eq!(format!("{}", m), "e2e4");
        assert_eq!(format!("{:?}", m), "Move(DoublePawnPush e2e4)");
    }
}
