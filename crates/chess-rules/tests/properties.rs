//! Property tests over random legal playouts.

use chess_core::{Color, Move, Piece, Square};
use chess_rules::{
    attackers, is_checkmate, is_stalemate, legal_moves, move_to_san, san_to_move, Board,
    GameState, GameStatus, Position,
};
use proptest::prelude::*;

/// Attack test written from first principles, independent of the engine's
/// reachability code.
fn attacked_by(board: &Board, target: Square, by: Color) -> bool {
    let (tr, tc) = (target.row() as i8, target.col() as i8);
    for (sq, piece) in board.pieces(by) {
        let (r, c) = (sq.row() as i8, sq.col() as i8);
        let (dr, dc) = (tr - r, tc - c);
        let hit = match piece.piece {
            Piece::Pawn => dr == by.forward() && dc.abs() == 1,
            Piece::Knight => (dr.abs(), dc.abs()) == (1, 2) || (dr.abs(), dc.abs()) == (2, 1),
            Piece::King => dr.abs().max(dc.abs()) == 1,
            Piece::Rook => (dr == 0 || dc == 0) && path_clear(board, sq, dr, dc),
            Piece::Bishop => dr.abs() == dc.abs() && dr != 0 && path_clear(board, sq, dr, dc),
            Piece::Queen => {
                (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && path_clear(board, sq, dr, dc)
            }
        };
        if hit {
            return true;
        }
    }
    false
}

fn path_clear(board: &Board, from: Square, dr: i8, dc: i8) -> bool {
    let steps = dr.abs().max(dc.abs());
    if steps == 0 {
        return false;
    }
    let (sr, sc) = (dr.signum(), dc.signum());
    (1..steps).all(|i| {
        let between = from.offset(sr * i, sc * i).unwrap();
        board.get(between).is_none()
    })
}

fn king_square(board: &Board, color: Color) -> Square {
    board
        .pieces(color)
        .find(|(_, p)| p.is(Piece::King))
        .map(|(sq, _)| sq)
        .unwrap()
}

/// Plays `picks.len()` random legal moves, stopping early when the game ends.
fn playout(picks: &[u16]) -> Vec<GameState> {
    let mut game = GameState::new();
    let mut states = vec![game.clone()];
    for &pick in picks {
        let moves = game.legal_moves();
        if moves.is_empty() {
            break;
        }
        let m = moves[pick as usize % moves.len()];
        let mut scratch = game.position().clone();
        let san = move_to_san(&mut scratch, &m);
        game.play(&san).unwrap();
        assert_eq!(game.move_history().last().unwrap().mov, m);
        states.push(game.clone());
    }
    states
}

fn mate_and_stalemate(position: &Position) -> (bool, bool) {
    let mut scratch = position.clone();
    let color = scratch.side_to_move;
    let king = *scratch.king(color);
    let last = scratch.last_move;
    let checkers = attackers(&scratch.board, king.square(), color, last.as_ref());
    let mate = is_checkmate(&mut scratch.board, &king, color, &checkers, last.as_ref());
    let stalemate = is_stalemate(&mut scratch.board, &king, color, last.as_ref());
    assert_eq!(scratch, *position);
    (mate, stalemate)
}

fn every_move_is_sound(position: &Position, moves: &[Move]) {
    let mover = position.side_to_move;
    for m in moves {
        let mut next = position.clone();
        next.play(m);
        let king = king_square(&next.board, mover);
        assert!(
            !attacked_by(&next.board, king, mover.opposite()),
            "{} leaves the king attacked in {}",
            m,
            position.to_fen()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn accepted_moves_never_leave_king_attacked(picks in prop::collection::vec(any::<u16>(), 0..60)) {
        for state in playout(&picks) {
            let mut position = state.position().clone();
            let moves = legal_moves(&mut position);
            every_move_is_sound(&position, &moves);
        }
    }

    #[test]
    fn every_legal_move_resolves_from_its_san(picks in prop::collection::vec(any::<u16>(), 0..40)) {
        for state in playout(&picks) {
            let mut position = state.position().clone();
            for m in legal_moves(&mut position) {
                let san = move_to_san(&mut position, &m);
                prop_assert_eq!(san_to_move(&mut position, &san), Ok(m), "{}", san);
            }
            prop_assert_eq!(&position, state.position());
        }
    }

    #[test]
    fn mate_and_stalemate_agree_with_enumeration(picks in prop::collection::vec(any::<u16>(), 0..80)) {
        for state in playout(&picks) {
            let position = state.position();
            let mut scratch = position.clone();
            let none_left = legal_moves(&mut scratch).is_empty();
            let in_check = position.in_check();
            let (mate, stalemate) = mate_and_stalemate(position);

            prop_assert_eq!(mate, none_left && in_check);
            prop_assert_eq!(stalemate, none_left && !in_check);
            match state.status() {
                GameStatus::WhiteWon | GameStatus::BlackWon => prop_assert!(none_left),
                GameStatus::Stalemate => prop_assert!(none_left && !in_check),
                GameStatus::WhiteToMove | GameStatus::BlackToMove => prop_assert!(!none_left),
                _ => {}
            }
        }
    }

    #[test]
    fn rejected_tokens_leave_game_unchanged(
        picks in prop::collection::vec(any::<u16>(), 0..30),
        tokens in prop::collection::vec("[KQRBNPa-h1-9xO0=+#-]{0,7}", 1..20),
    ) {
        let game = playout(&picks).pop().unwrap();
        for token in &tokens {
            let mut attempt = game.clone();
            if attempt.play(token).is_err() {
                prop_assert_eq!(&attempt, &game, "{}", token);
            }
        }
    }
}
