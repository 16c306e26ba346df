//! Chess position: board, king records, side to move, last move and clocks.

use crate::board::{Board, KingRecord};
use crate::check::is_attacked;
use crate::legality::apply_move;
use chess_core::{
    CastlingFlags, Color, ColoredPiece, FenError, FenRecord, Move, MoveKind, Piece, Square,
};

/// Complete position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Piece placement.
    pub board: Board,

    /// King squares and castling rights, indexed by [`Color::index`].
    pub kings: [KingRecord; 2],

    /// The side to move.
    pub side_to_move: Color,

    /// The previous half-move, which decides en passant availability.
    pub last_move: Option<Move>,

    /// Half-moves since the last capture or pawn move.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Position {
            board: Board::startpos(),
            kings: [
                KingRecord::new(Square::E1, true, true),
                KingRecord::new(Square::E8, true, true),
            ],
            side_to_move: Color::White,
            last_move: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates a position from a FEN string.
    ///
    /// Castling rights whose king or rook is off its home square are dropped.
    /// An en passant square becomes a synthetic double push as the last move.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let record = FenRecord::parse(fen)?;

        let mut board = Board::empty();
        for sq in Square::all() {
            board.set(sq, record.piece_at(sq));
        }

        let mut kings = [KingRecord::new(Square::E1, false, false); 2];
        for color in Color::ALL {
            let king = ColoredPiece::new(Piece::King, color);
            let square = board.find(king).next().ok_or_else(|| {
                FenError::InvalidKingCount(format!("no {} king on the board", color))
            })?;
            let at_home = square == Move::castle(color, true).from;
            let rook = ColoredPiece::new(Piece::Rook, color);
            let right = |short: bool| {
                let corner = Square::from_coords(color.back_row(), if short { 7 } else { 0 });
                at_home
                    && record.castling.allows(color, short)
                    && corner.is_some_and(|sq| board.get(sq) == Some(rook))
            };
            kings[color.index()] = KingRecord::new(square, right(true), right(false));
        }

        let side_to_move = record.side_to_move;
        let last_move = match record.en_passant {
            Some(passed) => Some(Self::synthetic_double_push(&board, passed, side_to_move)?),
            None => None,
        };

        let position = Position {
            board,
            kings,
            side_to_move,
            last_move,
            halfmove_clock: record.halfmove_clock,
            fullmove_number: record.fullmove_number,
        };

        let waiting = side_to_move.opposite();
        if is_attacked(&position.board, position.king(waiting).square(), waiting) {
            return Err(FenError::InconsistentPosition(format!(
                "{} is in check but not to move",
                waiting
            )));
        }

        Ok(position)
    }

    /// The double push that left `passed` behind it.
    fn synthetic_double_push(board: &Board, passed: Square, side_to_move: Color) -> Result<Move, FenError> {
        let mover = side_to_move.opposite();
        let pawn = ColoredPiece::new(Piece::Pawn, mover);
        let from = passed.offset(-mover.forward(), 0);
        let to = passed.offset(mover.forward(), 0);
        match (from, to) {
            (Some(from), Some(to))
                if board.get(to) == Some(pawn) && board.is_empty(from) && board.is_empty(passed) =>
            {
                Ok(Move::new(MoveKind::DoublePawnPush, from, to, pawn, false))
            }
            _ => Err(FenError::InconsistentPosition(format!(
                "no pawn could have just passed {}",
                passed
            ))),
        }
    }

    /// The FEN fields of this position.
    pub fn to_fen_record(&self) -> FenRecord {
        let mut placement = [None; 64];
        for (sq, piece) in self.board.occupied() {
            placement[sq.index() as usize] = Some(piece);
        }
        let mut castling = CastlingFlags::NONE;
        for color in Color::ALL {
            for short in [true, false] {
                castling.set(color, short, self.king(color).can_castle(short));
            }
        }
        FenRecord {
            placement,
            side_to_move: self.side_to_move,
            castling,
            en_passant: self.en_passant_square(),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        self.to_fen_record().to_string()
    }

    /// The king record of `color`.
    #[inline]
    pub fn king(&self, color: Color) -> &KingRecord {
        &self.kings[color.index()]
    }

    /// The square a pawn just passed over with a double push.
    pub fn en_passant_square(&self) -> Option<Square> {
        self.last_move.and_then(Move::passed_square)
    }

    /// Returns true if the side to move is in check.
    pub fn in_check(&self) -> bool {
        let color = self.side_to_move;
        is_attacked(&self.board, self.king(color).square(), color)
    }

    /// Commits `m` and hands the move to the other side.
    ///
    /// Updates the clocks, the king records and castling rights. The move
    /// must already be known to be legal. Draw offers and resignations leave
    /// the position untouched.
    pub fn play(&mut self, m: &Move) {
        if m.kind.is_claim() {
            return;
        }
        let color = m.color();
        apply_move(&mut self.board, m);

        if m.is_irreversible() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if color == Color::Black {
            self.fullmove_number += 1;
        }

        match m.piece.piece {
            Piece::King => self.kings[color.index()].relocate(m.to),
            Piece::Rook => self.kings[color.index()].revoke_corner(color, m.from),
            _ => {}
        }
        if m.captures {
            let opponent = color.opposite();
            self.kings[opponent.index()].revoke_corner(opponent, m.to);
        }

        self.last_move = Some(*m);
        self.side_to_move = color.opposite();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
