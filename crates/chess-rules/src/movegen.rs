//! Exhaustive legal move enumeration.
//!
//! The engine itself never needs the full list: the resolver works from a
//! single token and the detector short-circuits. Enumeration is used to
//! answer "what can I play here" and to cross-check the other components.

use crate::board::SquareList;
use crate::legality::is_legal;
use crate::position::Position;
use crate::reach;
use crate::san::castle_move;
use chess_core::Move;

/// All legal moves for the side to move, castling included.
pub fn legal_moves(position: &mut Position) -> Vec<Move> {
    let color = position.side_to_move;
    let king = *position.king(color);
    let last_move = position.last_move;

    let mut origins = SquareList::new();
    for (sq, _) in position.board.pieces(color) {
        origins.push(sq);
    }

    let mut moves = Vec::new();
    for &origin in &origins {
        let candidates = reach::candidates(&position.board, origin, last_move.as_ref());
        for m in &candidates {
            if is_legal(&mut position.board, m, &king, last_move.as_ref()) {
                moves.push(*m);
            }
        }
    }

    for short in [true, false] {
        if let Ok(m) = castle_move(position, short) {
            moves.push(m);
        }
    }
    moves
}

/// Counts leaf positions `depth` half-moves deep.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut scratch = position.clone();
    let moves = legal_moves(&mut scratch);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|m| {
            let mut next = position.clone();
            next.play(m);
            perft(&next, depth - 1)
        })
        .sum()
}
