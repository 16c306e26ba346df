//! Move legality: apply, test, revert.
//!
//! Every legality question in the engine ends here. A candidate move is
//! checked against the occupancy and geometry rules, then applied to the
//! board through a [`Provisional`] guard, the mover's king is tested for
//! attack, and the guard puts every touched square back.

use crate::board::{Board, KingRecord};
use crate::check::is_attacked;
use chess_core::{ColoredPiece, Move, MoveKind, Piece, Square};

/// A move applied to a board that will be taken back.
///
/// The squares the move touches are saved before they change. Dropping the
/// guard, or calling [`Provisional::undo`], restores them. [`Provisional::commit`]
/// keeps the move on the board instead.
pub struct Provisional<'a> {
    board: &'a mut Board,
    saved: [(Square, Option<ColoredPiece>); 4],
    len: usize,
}

impl<'a> Provisional<'a> {
    /// Applies `m` to `board`, including the en passant victim and the
    /// castling rook. Draw offers and resignations touch nothing.
    pub fn apply(board: &'a mut Board, m: &Move) -> Self {
        let mut provisional = Provisional {
            board,
            saved: [(Square::A8, None); 4],
            len: 0,
        };
        if m.kind.is_claim() {
            return provisional;
        }

        provisional.touch(m.from, None);
        provisional.touch(m.to, Some(m.placed_piece()));

        match m.kind {
            MoveKind::EnPassant => provisional.touch(m.en_passant_victim(), None),
            MoveKind::CastleShort | MoveKind::CastleLong => {
                if let Some((rook_from, rook_to)) = m.rook_squares() {
                    let rook = provisional.board.get(rook_from);
                    provisional.touch(rook_from, None);
                    provisional.touch(rook_to, rook);
                }
            }
            _ => {}
        }
        provisional
    }

    fn touch(&mut self, sq: Square, piece: Option<ColoredPiece>) {
        self.saved[self.len] = (sq, self.board.get(sq));
        self.len += 1;
        self.board.set(sq, piece);
    }

    /// The board with the move applied.
    pub fn board(&self) -> &Board {
        self.board
    }

    /// Restores the board.
    pub fn undo(self) {}

    /// Keeps the move on the board.
    pub fn commit(mut self) {
        self.len = 0;
    }
}

impl Drop for Provisional<'_> {
    fn drop(&mut self) {
        for &(sq, piece) in self.saved[..self.len].iter().rev() {
            self.board.set(sq, piece);
        }
    }
}

/// Applies `m` to `board` for good.
pub fn apply_move(board: &mut Board, m: &Move) {
    Provisional::apply(board, m).commit();
}

/// Whether the shape of the move fits the moving piece.
fn geometry_fits(m: &Move) -> bool {
    let dr = m.to.row() as i8 - m.from.row() as i8;
    let dc = m.to.col() as i8 - m.from.col() as i8;
    let color = m.color();

    match m.piece.piece {
        Piece::Pawn => {
            let forward = color.forward();
            if m.captures {
                // Captures on the same file are never pawn moves.
                dr == forward && dc.abs() == 1
            } else if dc != 0 {
                false
            } else if m.kind == MoveKind::DoublePawnPush {
                dr == 2 * forward && m.from.row() == color.pawn_row()
            } else {
                dr == forward
            }
        }
        Piece::Knight => matches!((dr.abs(), dc.abs()), (1, 2) | (2, 1)),
        Piece::Bishop => dr.abs() == dc.abs(),
        Piece::Rook => dr == 0 || dc == 0,
        Piece::Queen => dr == 0 || dc == 0 || dr.abs() == dc.abs(),
        Piece::King if m.kind.is_castling() => dr == 0 && dc.abs() == 2,
        Piece::King => dr.abs() <= 1 && dc.abs() <= 1,
    }
}

/// Whether the kind of the move agrees with the piece and its destination.
fn kind_fits(m: &Move) -> bool {
    let is_pawn = m.is_pawn_move();
    let promotes = is_pawn && m.to.row() == m.color().promotion_row();
    match m.kind {
        MoveKind::Normal => !promotes && m.promotion.is_none(),
        MoveKind::DoublePawnPush => is_pawn && !m.captures,
        MoveKind::EnPassant => is_pawn && m.captures,
        MoveKind::Promotion => {
            promotes && matches!(m.promotion, Some(p) if !matches!(p, Piece::Pawn | Piece::King))
        }
        MoveKind::CastleShort | MoveKind::CastleLong => m.piece.is(Piece::King) && !m.captures,
        MoveKind::DrawOffer | MoveKind::Resign => false,
    }
}

/// Occupancy rules for the destination, plus the en passant victim.
fn occupancy_fits(board: &Board, m: &Move, last_move: Option<&Move>) -> bool {
    let color = m.color();
    match (board.get(m.to), m.kind) {
        (Some(_), MoveKind::EnPassant) => false,
        (Some(occupant), _) => occupant.color != color && m.captures,
        (None, MoveKind::EnPassant) => {
            let victim = m.en_passant_victim();
            let enemy_pawn = ColoredPiece::new(Piece::Pawn, color.opposite());
            board.get(victim) == Some(enemy_pawn)
                && last_move.is_some_and(|last| {
                    last.kind == MoveKind::DoublePawnPush && last.to == victim
                })
        }
        (None, _) => !m.captures,
    }
}

/// Decides whether `m` is legal for the side whose king is `king`.
///
/// The board is left exactly as it was found.
pub fn is_legal(board: &mut Board, m: &Move, king: &KingRecord, last_move: Option<&Move>) -> bool {
    if m.from == m.to || board.get(m.from) != Some(m.piece) {
        return false;
    }
    if !kind_fits(m) || !geometry_fits(m) || !occupancy_fits(board, m, last_move) {
        return false;
    }
    if !m.piece.is(Piece::Knight) && !board.has_clear_sight(m.from, m.to) {
        return false;
    }

    let king_square = if m.piece.is(Piece::King) {
        m.to
    } else {
        king.square()
    };

    let provisional = Provisional::apply(board, m);
    let exposed = is_attacked(provisional.board(), king_square, m.color());
    provisional.undo();
    !exposed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use chess_core::Color;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn white(piece: Piece) -> ColoredPiece {
        ColoredPiece::new(piece, Color::White)
    }

    #[test]
    fn provisional_restores_on_drop() {
        let mut board = Board::startpos();
        let before = board;
        let m = Move::new(
            MoveKind::DoublePawnPush,
            sq("e2"),
            sq("e4"),
            white(Piece::Pawn),
            false,
        );
        {
            let provisional = Provisional::apply(&mut board, &m);
            assert_eq!(provisional.board().get(sq("e4")), Some(white(Piece::Pawn)));
            assert!(provisional.board().is_empty(sq("e2")));
        }
        assert_eq!(board, before);
    }

    #[test]
    fn commit_keeps_castling_rook() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        apply_move(&mut pos.board, &Move::castle(Color::White, true));
        assert_eq!(pos.board.get(Square::G1), Some(white(Piece::King)));
        assert_eq!(pos.board.get(Square::F1), Some(white(Piece::Rook)));
        assert!(pos.board.is_empty(Square::H1));
        assert!(pos.board.is_empty(Square::E1));
    }

    #[test]
    fn en_passant_removes_victim_beside_origin() {
        let mut pos = Position::from_fen("4k3/8/8/4Pp2/8/8/8/4K3 w - f6 0 1").unwrap();
        let m = Move::new(
            MoveKind::EnPassant,
            sq("e5"),
            sq("f6"),
            white(Piece::Pawn),
            true,
        );
        let king = *pos.king(Color::White);
        assert!(is_legal(&mut pos.board, &m, &king, pos.last_move.as_ref()));
        apply_move(&mut pos.board, &m);
        assert!(pos.board.is_empty(sq("f5")));
        assert_eq!(pos.board.get(sq("f6")), Some(white(Piece::Pawn)));
    }

    #[test]
    fn occupancy_and_capture_flag_must_agree() {
        let mut board = Board::startpos();
        let king = KingRecord::new(Square::E1, true, true);
        let knight = white(Piece::Knight);

        let onto_own = Move::capture(Square::G1, sq("e2"), knight);
        assert!(!is_legal(&mut board, &onto_own, &king, None));

        let phantom_capture = Move::capture(Square::G1, sq("f3"), knight);
        assert!(!is_legal(&mut board, &phantom_capture, &king, None));

        let plain = Move::normal(Square::G1, sq("f3"), knight);
        assert!(is_legal(&mut board, &plain, &king, None));
        assert_eq!(board, Board::startpos());
    }

    #[test]
    fn pawn_geometry() {
        let mut pos = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let king = *pos.king(Color::White);
        let pawn = white(Piece::Pawn);

        let same_file_capture = Move::capture(sq("e4"), sq("e5"), pawn);
        assert!(!is_legal(&mut pos.board, &same_file_capture, &king, None));

        let off_file_push = Move::normal(sq("e4"), sq("d5"), pawn);
        assert!(!is_legal(&mut pos.board, &off_file_push, &king, None));

        let capture = Move::capture(sq("e4"), sq("d5"), pawn);
        assert!(is_legal(&mut pos.board, &capture, &king, None));
    }

    #[test]
    fn sliders_cannot_jump() {
        let mut board = Board::startpos();
        let king = KingRecord::new(Square::E1, true, true);
        let rook = white(Piece::Rook);
        let m = Move::normal(Square::A1, sq("a3"), rook);
        assert!(!is_legal(&mut board, &m, &king, None));
    }

    #[test]
    fn pinned_piece_may_not_leave_the_line() {
        let mut pos = Position::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let king = *pos.king(Color::White);
        let bishop = white(Piece::Bishop);
        let m = Move::normal(sq("e2"), sq("d3"), bishop);
        assert!(!is_legal(&mut pos.board, &m, &king, None));
    }

    #[test]
    fn king_may_not_step_into_attack() {
        let mut pos = Position::from_fen("3rk3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let king = *pos.king(Color::White);
        let into_file = Move::normal(Square::E1, Square::D1, white(Piece::King));
        assert!(!is_legal(&mut pos.board, &into_file, &king, None));
        let aside = Move::normal(Square::E1, Square::F1, white(Piece::King));
        assert!(is_legal(&mut pos.board, &aside, &king, None));
    }

    #[test]
    fn promotion_must_be_on_last_row_and_named() {
        let mut pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let king = *pos.king(Color::White);

        let bare = Move::normal(sq("a7"), Square::A8, white(Piece::Pawn));
        assert!(!is_legal(&mut pos.board, &bare, &king, None));

        let to_king = Move::promote(sq("a7"), Square::A8, Color::White, false, Piece::King);
        assert!(!is_legal(&mut pos.board, &to_king, &king, None));

        let queen = Move::promote(sq("a7"), Square::A8, Color::White, false, Piece::Queen);
        assert!(is_legal(&mut pos.board, &queen, &king, None));
    }
}
