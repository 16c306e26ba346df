//! Reachability search.
//!
//! Two questions are asked of piece geometry:
//! - [`find`] lists the squares holding a given occupant that a piece kind
//!   reaches from an origin, respecting blocking only. Because the geometry
//!   of every kind but the pawn is symmetric, searching outward from a
//!   target square finds the pieces that reach it.
//! - [`test`] decides whether the piece on an origin square has at least one
//!   legal move, running each candidate through the legality evaluator and
//!   stopping at the first that passes.

use crate::board::{Board, KingRecord, SquareList};
use crate::legality::is_legal;
use chess_core::{Color, ColoredPiece, Move, MoveKind, Piece, Square};

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Candidate moves from one origin square.
///
/// A queen in the open reaches 27 squares and a pawn about to promote has at
/// most 12 candidates, so 32 slots always suffice.
#[derive(Clone, Copy)]
pub struct Candidates {
    moves: [Move; Self::CAPACITY],
    len: usize,
}

impl Candidates {
    pub const CAPACITY: usize = 32;

    const FILLER: Move = Move::normal(
        Square::A8,
        Square::A8,
        ColoredPiece::new(Piece::Pawn, Color::White),
    );

    pub const fn new() -> Self {
        Candidates {
            moves: [Self::FILLER; Self::CAPACITY],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::CAPACITY);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }
}

impl Default for Candidates {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Candidates {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for Candidates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Rays from `origin`, each stopped at (and including) the first occupied square.
fn rays(board: &Board, origin: Square, directions: &[(i8, i8)], out: &mut SquareList) {
    for &(dr, dc) in directions {
        let mut current = origin.offset(dr, dc);
        while let Some(sq) = current {
            out.push(sq);
            if !board.is_empty(sq) {
                break;
            }
            current = sq.offset(dr, dc);
        }
    }
}

fn steps(origin: Square, offsets: &[(i8, i8)], out: &mut SquareList) {
    for &(dr, dc) in offsets {
        if let Some(sq) = origin.offset(dr, dc) {
            out.push(sq);
        }
    }
}

/// Squares the geometry of `kind` reaches from `origin`.
///
/// Pawns have no symmetric geometry; for them this returns the squares a
/// pawn of `pawn_color` would have to stand on to attack `origin`.
pub fn reached(board: &Board, kind: Piece, origin: Square, pawn_color: Color) -> SquareList {
    let mut out = SquareList::new();
    match kind {
        Piece::Pawn => {
            let back = -pawn_color.forward();
            for dc in [-1, 1] {
                if let Some(sq) = origin.offset(back, dc) {
                    out.push(sq);
                }
            }
        }
        Piece::Knight => steps(origin, &KNIGHT_OFFSETS, &mut out),
        Piece::King => steps(origin, &KING_OFFSETS, &mut out),
        Piece::Bishop => rays(board, origin, &DIAGONALS, &mut out),
        Piece::Rook => rays(board, origin, &ORTHOGONALS, &mut out),
        Piece::Queen => {
            rays(board, origin, &ORTHOGONALS, &mut out);
            rays(board, origin, &DIAGONALS, &mut out);
        }
    }
    out
}

/// Squares holding `target` that `kind` geometry reaches from `origin`.
pub fn find(board: &Board, kind: Piece, origin: Square, target: ColoredPiece) -> SquareList {
    let mut found = reached(board, kind, origin, target.color);
    found.retain(|sq| board.get(sq) == Some(target));
    found
}

/// A pawn move from `from` to `to`, expanded into every promotion when it
/// lands on the last row.
fn push_pawn_move(out: &mut Candidates, from: Square, to: Square, color: Color, captures: bool) {
    if to.row() == color.promotion_row() {
        for promotion in Piece::PROMOTIONS {
            out.push(Move::promote(from, to, color, captures, promotion));
        }
    } else {
        let pawn = ColoredPiece::new(Piece::Pawn, color);
        out.push(Move::new(MoveKind::Normal, from, to, pawn, captures));
    }
}

fn pawn_candidates(
    board: &Board,
    origin: Square,
    color: Color,
    last_move: Option<&Move>,
    out: &mut Candidates,
) {
    let forward = color.forward();
    let pawn = ColoredPiece::new(Piece::Pawn, color);

    if let Some(one) = origin.offset(forward, 0).filter(|&sq| board.is_empty(sq)) {
        push_pawn_move(out, origin, one, color, false);
        if origin.row() == color.pawn_row() {
            if let Some(two) = one.offset(forward, 0).filter(|&sq| board.is_empty(sq)) {
                out.push(Move::new(MoveKind::DoublePawnPush, origin, two, pawn, false));
            }
        }
    }

    for dc in [-1, 1] {
        let Some(diagonal) = origin.offset(forward, dc) else {
            continue;
        };
        match board.get(diagonal) {
            Some(piece) if piece.color != color => {
                push_pawn_move(out, origin, diagonal, color, true);
            }
            Some(_) => {}
            None => {
                let en_passant = last_move.is_some_and(|last| {
                    last.passed_square() == Some(diagonal) && origin.offset(0, dc) == Some(last.to)
                });
                if en_passant {
                    out.push(Move::new(MoveKind::EnPassant, origin, diagonal, pawn, true));
                }
            }
        }
    }
}

/// Every geometrically possible move of the piece on `origin`.
///
/// Castling is not included; it is validated separately by the notation
/// resolver. An empty origin yields no candidates.
pub fn candidates(board: &Board, origin: Square, last_move: Option<&Move>) -> Candidates {
    let mut out = Candidates::new();
    let Some(piece) = board.get(origin) else {
        return out;
    };

    if piece.is(Piece::Pawn) {
        pawn_candidates(board, origin, piece.color, last_move, &mut out);
        return out;
    }

    for &to in &reached(board, piece.piece, origin, piece.color) {
        match board.get(to) {
            Some(occupant) if occupant.color == piece.color => {}
            occupant => out.push(Move::new(
                MoveKind::Normal,
                origin,
                to,
                piece,
                occupant.is_some(),
            )),
        }
    }
    out
}

/// True if the piece on `origin` has at least one legal move.
pub fn test(board: &mut Board, origin: Square, king: &KingRecord, last_move: Option<&Move>) -> bool {
    let moves = candidates(board, origin, last_move);
    moves
        .as_slice()
        .iter()
        .any(|m| is_legal(board, m, king, last_move))
}

/// True if any piece of `color` has a legal move.
pub fn has_legal_move(
    board: &mut Board,
    color: Color,
    king: &KingRecord,
    last_move: Option<&Move>,
) -> bool {
    let mut origins = SquareList::new();
    for (sq, _) in board.pieces(color) {
        origins.push(sq);
    }
    origins
        .as_slice()
        .iter()
        .any(|&origin| test(board, origin, king, last_move))
}
