//! Check, checkmate and stalemate detection.

use crate::board::{line_of_sight, Board, KingRecord, SquareList};
use crate::legality::is_legal;
use crate::reach::{self, KING_OFFSETS};
use chess_core::{Color, ColoredPiece, Move, MoveKind, Piece, Square};

const NON_KING_PIECES: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

/// Enemy squares attacking `sq`, which belongs to (or is defended by) `victim`.
///
/// When `sq` holds the pawn that just advanced two squares, enemy pawns able
/// to take it en passant are counted as attackers too.
pub fn attackers(board: &Board, sq: Square, victim: Color, last_move: Option<&Move>) -> SquareList {
    let enemy = victim.opposite();
    let mut found = SquareList::new();
    for kind in Piece::ALL {
        for &from in &reach::find(board, kind, sq, ColoredPiece::new(kind, enemy)) {
            found.push(from);
        }
    }

    let just_pushed = last_move
        .is_some_and(|last| last.kind == MoveKind::DoublePawnPush && last.to == sq && last.color() == victim);
    if just_pushed {
        let enemy_pawn = ColoredPiece::new(Piece::Pawn, enemy);
        for dc in [-1, 1] {
            if let Some(beside) = sq.offset(0, dc) {
                if board.get(beside) == Some(enemy_pawn) {
                    found.push(beside);
                }
            }
        }
    }
    found
}

/// True if any enemy of `victim` attacks `sq`. Stops at the first attacker.
pub fn is_attacked(board: &Board, sq: Square, victim: Color) -> bool {
    let enemy = victim.opposite();
    Piece::ALL
        .iter()
        .any(|&kind| !reach::find(board, kind, sq, ColoredPiece::new(kind, enemy)).is_empty())
}

fn try_move(board: &mut Board, m: Move, king: &KingRecord, last_move: Option<&Move>) -> bool {
    is_legal(board, &m, king, last_move)
}

/// A pawn move, promoting to a queen when it reaches the last row.
fn pawn_move(kind: MoveKind, from: Square, to: Square, color: Color, captures: bool) -> Move {
    if to.row() == color.promotion_row() {
        Move::promote(from, to, color, captures, Piece::Queen)
    } else {
        Move::new(kind, from, to, ColoredPiece::new(Piece::Pawn, color), captures)
    }
}

/// True if a piece of `color` other than the king can legally move onto the
/// empty square `sq`.
pub fn can_move_to(
    board: &mut Board,
    king: &KingRecord,
    sq: Square,
    color: Color,
    last_move: Option<&Move>,
) -> bool {
    let pawn = ColoredPiece::new(Piece::Pawn, color);
    let back = -color.forward();

    if let Some(one_back) = sq.offset(back, 0) {
        match board.get(one_back) {
            Some(piece) if piece == pawn => {
                let m = pawn_move(MoveKind::Normal, one_back, sq, color, false);
                if try_move(board, m, king, last_move) {
                    return true;
                }
            }
            None if sq.row() == color.double_push_row() => {
                if let Some(two_back) = one_back.offset(back, 0) {
                    if board.get(two_back) == Some(pawn) {
                        let m = Move::new(MoveKind::DoublePawnPush, two_back, sq, pawn, false);
                        if try_move(board, m, king, last_move) {
                            return true;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if last_move.is_some_and(|last| last.passed_square() == Some(sq)) {
        let origins = reach::find(board, Piece::Pawn, sq, pawn);
        for &from in &origins {
            let m = Move::new(MoveKind::EnPassant, from, sq, pawn, true);
            if try_move(board, m, king, last_move) {
                return true;
            }
        }
    }

    for kind in NON_KING_PIECES {
        let piece = ColoredPiece::new(kind, color);
        let origins = reach::find(board, kind, sq, piece);
        for &from in &origins {
            if try_move(board, Move::normal(from, sq, piece), king, last_move) {
                return true;
            }
        }
    }
    false
}

/// True if a piece of `color` other than the king can legally capture the
/// piece on `target`, including en passant and capturing promotions.
fn can_capture(
    board: &mut Board,
    king: &KingRecord,
    target: Square,
    color: Color,
    last_move: Option<&Move>,
) -> bool {
    let pawn = ColoredPiece::new(Piece::Pawn, color);
    let pawns = reach::find(board, Piece::Pawn, target, pawn);
    for &from in &pawns {
        let m = pawn_move(MoveKind::Normal, from, target, color, true);
        if try_move(board, m, king, last_move) {
            return true;
        }
    }

    if let Some(landing) = last_move
        .filter(|last| last.to == target)
        .and_then(|last| last.passed_square())
    {
        for dc in [-1, 1] {
            let Some(from) = target.offset(0, dc) else {
                continue;
            };
            if board.get(from) == Some(pawn) {
                let m = Move::new(MoveKind::EnPassant, from, landing, pawn, true);
                if try_move(board, m, king, last_move) {
                    return true;
                }
            }
        }
    }

    for kind in NON_KING_PIECES {
        let piece = ColoredPiece::new(kind, color);
        let origins = reach::find(board, kind, target, piece);
        for &from in &origins {
            if try_move(board, Move::capture(from, target, piece), king, last_move) {
                return true;
            }
        }
    }
    false
}

/// True if the king has a legal step to a neighbouring square.
fn king_can_step(board: &mut Board, king: &KingRecord, color: Color, last_move: Option<&Move>) -> bool {
    let from = king.square();
    let piece = ColoredPiece::new(Piece::King, color);
    KING_OFFSETS.iter().any(|&(dr, dc)| {
        let Some(to) = from.offset(dr, dc) else {
            return false;
        };
        if board.has_color(to, color) {
            return false;
        }
        let captures = !board.is_empty(to);
        let m = Move::new(MoveKind::Normal, from, to, piece, captures);
        try_move(board, m, king, last_move)
    })
}

/// Decides whether the king of `color`, attacked from `attackers`, is mated.
pub fn is_checkmate(
    board: &mut Board,
    king: &KingRecord,
    color: Color,
    attackers: &SquareList,
    last_move: Option<&Move>,
) -> bool {
    if attackers.is_empty() {
        return false;
    }
    if king_can_step(board, king, color, last_move) {
        return false;
    }
    if attackers.len() > 1 {
        return true;
    }

    let attacker = attackers[0];
    if can_capture(board, king, attacker, color, last_move) {
        return false;
    }

    let knight_check = board.get(attacker).is_some_and(|p| p.is(Piece::Knight));
    if !knight_check {
        if let Some(line) = line_of_sight(attacker, king.square()) {
            for &sq in &line {
                if can_move_to(board, king, sq, color, last_move) {
                    return false;
                }
            }
        }
    }
    true
}

/// True if `color` is not in check and has no legal move.
pub fn is_stalemate(board: &mut Board, king: &KingRecord, color: Color, last_move: Option<&Move>) -> bool {
    !is_attacked(board, king.square(), color) && !reach::has_legal_move(board, color, king, last_move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn mated(fen: &str) -> bool {
        let mut pos = Position::from_fen(fen).unwrap();
        let color = pos.side_to_move;
        let king = *pos.king(color);
        let last = pos.last_move;
        let found = attackers(&pos.board, king.square(), color, last.as_ref());
        is_checkmate(&mut pos.board, &king, color, &found, last.as_ref())
    }

    #[test]
    fn attackers_of_startpos_square() {
        let board = Board::startpos();
        let found = attackers(&board, sq("f6"), Color::White, None);
        assert_eq!(found.len(), 3);
        assert!(found.contains(sq("g8")));
        assert!(found.contains(sq("e7")));
        assert!(found.contains(sq("g7")));
        assert!(!is_attacked(&board, sq("e4"), Color::White));
    }

    #[test]
    fn just_pushed_pawn_is_attacked_en_passant() {
        let pos = Position::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1").unwrap();
        let found = attackers(&pos.board, sq("e5"), Color::Black, pos.last_move.as_ref());
        assert_eq!(found.as_slice(), &[sq("d5")]);
        assert!(attackers(&pos.board, sq("e5"), Color::Black, None).is_empty());
    }

    #[test]
    fn back_rank_mate() {
        assert!(mated("R5k1/5ppp/8/8/8/8/8/4K3 b - - 0 1"));
    }

    #[test]
    fn check_answered_by_capture() {
        assert!(!mated("R5k1/5ppp/8/8/8/8/r7/4K3 b - - 0 1"));
    }

    #[test]
    fn check_answered_by_interposition() {
        assert!(!mated("R5k1/5ppp/2n5/8/8/8/8/4K3 b - - 0 1"));
    }

    #[test]
    fn knight_check_cannot_be_blocked() {
        assert!(mated("6rk/5Npp/8/8/8/8/8/4K3 b - - 0 1"));
    }

    #[test]
    fn double_check_needs_a_king_move() {
        // The queen could take either checker but not both.
        assert!(mated("4R2k/4qNpp/8/8/8/8/8/K7 b - - 0 1"));
    }

    #[test]
    fn en_passant_captures_checking_pawn() {
        let mut pos = Position::from_fen("8/8/8/4k3/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
        let king = *pos.king(Color::Black);
        let last = pos.last_move;
        let found = attackers(&pos.board, king.square(), Color::Black, last.as_ref());
        assert_eq!(found.as_slice(), &[sq("d4")]);
        assert!(can_capture(&mut pos.board, &king, sq("d4"), Color::Black, last.as_ref()));
        assert!(!can_capture(&mut pos.board, &king, sq("d4"), Color::Black, None));
    }

    #[test]
    fn promotion_push_interposes() {
        assert!(!mated("4K3/8/8/8/8/8/3p3Q/R3k3 b - - 0 1"));
        assert!(mated("4K3/8/8/8/8/3p4/7Q/R3k3 b - - 0 1"));
    }

    #[test]
    fn capturing_promotion_removes_checker() {
        assert!(!mated("4K3/8/8/8/8/8/1p5Q/R3k3 b - - 0 1"));
    }

    #[test]
    fn stalemate_requires_no_check() {
        let mut pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let king = *pos.king(Color::Black);
        assert!(is_stalemate(&mut pos.board, &king, Color::Black, None));

        let mut pos = Position::from_fen("7k/8/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let king = *pos.king(Color::Black);
        assert!(!is_stalemate(&mut pos.board, &king, Color::Black, None));
    }

    #[test]
    fn can_move_to_ignores_pinned_blocker() {
        let mut pos = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let king = *pos.king(Color::White);
        assert!(!can_move_to(&mut pos.board, &king, sq("c3"), Color::White, None));

        let mut pos = Position::from_fen("6k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let king = *pos.king(Color::White);
        assert!(can_move_to(&mut pos.board, &king, sq("c3"), Color::White, None));
    }
}
