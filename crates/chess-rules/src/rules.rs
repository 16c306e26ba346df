//! Game status and the material rule.

use crate::board::Board;
use chess_core::{Color, Piece};
use std::fmt;

/// Where a game stands.
///
/// Everything except the two to-move states is terminal, and terminal states
/// never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    WhiteToMove,
    BlackToMove,
    /// White delivered checkmate or Black resigned.
    WhiteWon,
    /// Black delivered checkmate or White resigned.
    BlackWon,
    DrawByAgreement,
    DrawByRepetition,
    /// 100 half-moves without a capture or pawn move.
    DrawByFiftyMoveRule,
    DrawByInsufficientMaterial,
    Stalemate,
}

impl GameStatus {
    /// The to-move state for `color`.
    pub const fn to_move(color: Color) -> Self {
        match color {
            Color::White => GameStatus::WhiteToMove,
            Color::Black => GameStatus::BlackToMove,
        }
    }

    /// The state in which `color` has won.
    pub const fn won_by(color: Color) -> Self {
        match color {
            Color::White => GameStatus::WhiteWon,
            Color::Black => GameStatus::BlackWon,
        }
    }

    /// Returns true once the game is over.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::WhiteToMove | GameStatus::BlackToMove)
    }

    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::DrawByAgreement
                | GameStatus::DrawByRepetition
                | GameStatus::DrawByFiftyMoveRule
                | GameStatus::DrawByInsufficientMaterial
                | GameStatus::Stalemate
        )
    }

    pub const fn winner(self) -> Option<Color> {
        match self {
            GameStatus::WhiteWon => Some(Color::White),
            GameStatus::BlackWon => Some(Color::Black),
            _ => None,
        }
    }

    /// The side to move while the game is running.
    pub const fn side_to_move(self) -> Option<Color> {
        match self {
            GameStatus::WhiteToMove => Some(Color::White),
            GameStatus::BlackToMove => Some(Color::Black),
            _ => None,
        }
    }

    /// PGN result token: `1-0`, `0-1`, `1/2-1/2`, or `*` while running.
    pub const fn result_token(self) -> &'static str {
        match self {
            GameStatus::WhiteWon => "1-0",
            GameStatus::BlackWon => "0-1",
            GameStatus::WhiteToMove | GameStatus::BlackToMove => "*",
            _ => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::WhiteToMove => "White to move",
            GameStatus::BlackToMove => "Black to move",
            GameStatus::WhiteWon => "White won",
            GameStatus::BlackWon => "Black won",
            GameStatus::DrawByAgreement => "draw by agreement",
            GameStatus::DrawByRepetition => "draw by threefold repetition",
            GameStatus::DrawByFiftyMoveRule => "draw by the 50-move rule",
            GameStatus::DrawByInsufficientMaterial => "draw by insufficient material",
            GameStatus::Stalemate => "stalemate",
        };
        write!(f, "{}", text)
    }
}

/// True if neither side keeps enough material to mate.
///
/// Both sides' pieces are counted together. Any pawn, rook or queen is
/// enough; so are two knights, bishops on both square colors, or a knight
/// with a bishop. A lone minor piece or bare kings are not.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut knights = 0;
    let mut bishops = [0; 2];
    for (sq, piece) in board.occupied() {
        match piece.piece {
            Piece::Pawn | Piece::Rook | Piece::Queen => return false,
            Piece::Knight => knights += 1,
            Piece::Bishop => bishops[sq.is_light() as usize] += 1,
            Piece::King => {}
        }
    }
    let bishop_count = bishops[0] + bishops[1];
    let sufficient = knights > 1
        || (bishops[0] > 0 && bishops[1] > 0)
        || (knights > 0 && bishop_count > 0);
    !sufficient
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn insufficient(fen: &str) -> bool {
        is_insufficient_material(&Position::from_fen(fen).unwrap().board)
    }

    #[test]
    fn terminal_states() {
        assert!(!GameStatus::WhiteToMove.is_terminal());
        assert!(!GameStatus::BlackToMove.is_terminal());
        assert!(GameStatus::Stalemate.is_terminal());
        assert!(GameStatus::DrawByRepetition.is_draw());
        assert!(!GameStatus::BlackWon.is_draw());
        assert_eq!(GameStatus::won_by(Color::Black).winner(), Some(Color::Black));
        assert_eq!(GameStatus::to_move(Color::Black).side_to_move(), Some(Color::Black));
    }

    #[test]
    fn result_tokens() {
        assert_eq!(GameStatus::WhiteWon.result_token(), "1-0");
        assert_eq!(GameStatus::BlackWon.result_token(), "0-1");
        assert_eq!(GameStatus::Stalemate.result_token(), "1/2-1/2");
        assert_eq!(GameStatus::WhiteToMove.result_token(), "*");
    }

    #[test]
    fn bare_kings_and_lone_minors() {
        assert!(insufficient("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        assert!(insufficient("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1"));
        assert!(insufficient("4k3/8/8/8/8/8/8/1N2K3 b - - 0 1"));
        // Two bishops on the same color, one each side.
        assert!(insufficient("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1"));
    }

    #[test]
    fn sufficient_material() {
        assert!(!insufficient("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/R3K3 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/1NN1K3 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/1N2K1n1 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/1NB1K3 w - - 0 1"));
        // Opposite-colored bishops count together even on different sides.
        assert!(!insufficient("4k3/8/8/8/8/8/8/2BbK3 w - - 0 1"));
    }
}
