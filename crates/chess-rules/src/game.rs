//! Full game management: one accepted half-move at a time.
//!
//! The [`GameState`] struct drives the status state machine:
//! - draw offers and resignations end the game at once
//! - a committed move is followed by the checkmate test, the 50-move rule,
//!   threefold repetition, insufficient material and stalemate, in that order
//! - terminal states are absorbing

use crate::check::{attackers, is_checkmate, is_stalemate};
use crate::encoding::{EncodedPosition, RepetitionCache};
use crate::movegen::legal_moves;
use crate::position::Position;
use crate::rules::{is_insufficient_material, GameStatus};
use crate::san::{move_to_san, san_to_move, SanError};
use chess_core::{Color, FenError, Move, MoveKind};
use thiserror::Error;
use tracing::debug;

/// Half-moves without a capture or pawn move that draw the game.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move in internal format.
    pub mov: Move,
    /// SAN notation for the move, with `+` or `#` when it checks.
    pub san: String,
}

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The token could not be resolved to a legal move.
    #[error(transparent)]
    InvalidSan(#[from] SanError),

    /// The game has already ended.
    #[error("the game is already over")]
    GameAlreadyOver,

    /// Storage for the move history could not be allocated.
    #[error("out of memory for the move history")]
    HistoryExhausted,
}

/// A complete game: position, status and the history the draw rules need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    position: Position,
    status: GameStatus,
    history: RepetitionCache,
    moves: Vec<GameMove>,
    start_fen: String,
    start_fullmove_number: u32,
    start_side_to_move: Color,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Creates a game from an arbitrary position, detecting a game that is
    /// already over.
    pub fn from_position(mut position: Position) -> Self {
        let color = position.side_to_move;
        let king = *position.king(color);
        let last_move = position.last_move;
        let checkers = attackers(&position.board, king.square(), color, last_move.as_ref());

        let status = if is_checkmate(&mut position.board, &king, color, &checkers, last_move.as_ref()) {
            GameStatus::won_by(color.opposite())
        } else if position.halfmove_clock >= FIFTY_MOVE_LIMIT {
            GameStatus::DrawByFiftyMoveRule
        } else if is_insufficient_material(&position.board) {
            GameStatus::DrawByInsufficientMaterial
        } else if is_stalemate(&mut position.board, &king, color, last_move.as_ref()) {
            GameStatus::Stalemate
        } else {
            GameStatus::to_move(color)
        };

        GameState {
            history: RepetitionCache::starting_at(EncodedPosition::new(&position)),
            start_fen: position.to_fen(),
            start_fullmove_number: position.fullmove_number,
            start_side_to_move: position.side_to_move,
            position,
            status,
            moves: Vec::new(),
        }
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.in_check()
    }

    /// Returns the move history.
    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    /// FEN of the position the game started from.
    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    /// Fullmove number of the first recorded move.
    pub fn start_fullmove_number(&self) -> u32 {
        self.start_fullmove_number
    }

    /// The side that made (or makes) the first recorded move.
    pub fn start_side_to_move(&self) -> Color {
        self.start_side_to_move
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        let mut scratch = self.position.clone();
        legal_moves(&mut scratch)
    }

    /// Plays one input token: a SAN move, `draw` or `resign`.
    ///
    /// A rejected token leaves the game exactly as it was.
    pub fn play(&mut self, token: &str) -> Result<GameStatus, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameAlreadyOver);
        }

        let token = token.trim();
        let color = self.position.side_to_move;
        let king = self.position.king(color).square();
        let m = match token {
            "draw" => Move::draw_offer(color, king),
            "resign" => Move::resign(color, king),
            _ => san_to_move(&mut self.position, token).inspect_err(|e| {
                debug!(token, error = %e, "rejected move");
            })?,
        };
        self.commit(m)
    }

    /// Commits a move already known to be legal and advances the status.
    fn commit(&mut self, m: Move) -> Result<GameStatus, GameError> {
        let mover = m.color();
        match m.kind {
            MoveKind::DrawOffer => return Ok(self.finish(GameStatus::DrawByAgreement)),
            MoveKind::Resign => return Ok(self.finish(GameStatus::won_by(mover.opposite()))),
            _ => {}
        }

        self.moves
            .try_reserve(1)
            .map_err(|_| GameError::HistoryExhausted)?;
        self.history
            .reserve()
            .map_err(|_| GameError::HistoryExhausted)?;

        let mut san = move_to_san(&mut self.position, &m);
        self.position.play(&m);

        let color = self.position.side_to_move;
        let king = *self.position.king(color);
        let last_move = self.position.last_move;
        let checkers = attackers(&self.position.board, king.square(), color, last_move.as_ref());
        let mated = is_checkmate(&mut self.position.board, &king, color, &checkers, last_move.as_ref());
        if mated {
            san.push('#');
        } else if !checkers.is_empty() {
            san.push('+');
        }
        debug!(%san, fen = %self.position.to_fen(), "move played");
        self.moves.push(GameMove { mov: m, san });

        if mated {
            return Ok(self.finish(GameStatus::won_by(mover)));
        }
        if self.position.halfmove_clock >= FIFTY_MOVE_LIMIT {
            return Ok(self.finish(GameStatus::DrawByFiftyMoveRule));
        }

        if m.is_irreversible() {
            self.history.clear();
        }
        if self.history.record(EncodedPosition::new(&self.position)) >= 3 {
            return Ok(self.finish(GameStatus::DrawByRepetition));
        }

        if is_insufficient_material(&self.position.board) {
            return Ok(self.finish(GameStatus::DrawByInsufficientMaterial));
        }
        if is_stalemate(&mut self.position.board, &king, color, last_move.as_ref()) {
            return Ok(self.finish(GameStatus::Stalemate));
        }

        self.status = GameStatus::to_move(color);
        Ok(self.status)
    }

    fn finish(&mut self, status: GameStatus) -> GameStatus {
        debug!(%status, "game over");
        self.status = status;
        status
    }
}
