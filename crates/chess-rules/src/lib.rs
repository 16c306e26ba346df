//! Chess rules engine built around a plain 64-square mailbox.
//!
//! This crate provides:
//! - [`Board`] and [`KingRecord`] - piece placement and per-side king state
//! - [`Position`] - full game state with FEN import and export
//! - [`GameState`] - the status state machine driving a whole game
//! - SAN resolution with apply/test/revert legality checking
//! - Check, checkmate and stalemate detection
//! - Compact position encoding for threefold repetition
//!
//! # Architecture
//!
//! Legality is decided by applying a move provisionally, asking whether the
//! mover's king is attacked, and restoring the touched squares. The same
//! primitive serves the SAN resolver, the mate and stalemate detectors and
//! full move enumeration.
//!
//! # Example
//!
//! ```
//! use chess_rules::{GameState, GameStatus};
//!
//! let mut game = GameState::new();
//! game.play("f3").unwrap();
//! game.play("e5").unwrap();
//! game.play("g4").unwrap();
//! assert_eq!(game.play("Qh4#").unwrap(), GameStatus::BlackWon);
//! println!("Final position: {}", game.to_fen());
//! ```

mod board;
pub mod check;
mod encoding;
mod game;
pub mod legality;
pub mod movegen;
mod position;
pub mod reach;
pub mod rules;
pub mod san;

pub use board::{line_of_sight, Board, KingRecord, SquareList};
pub use check::{attackers, is_attacked, is_checkmate, is_stalemate};
pub use encoding::{piece_code, EncodedPosition, RepetitionCache, EN_PASSANT_CODE};
pub use game::{GameError, GameMove, GameState, FIFTY_MOVE_LIMIT};
pub use legality::{is_legal, Provisional};
pub use movegen::{legal_moves, perft};
pub use position::Position;
pub use reach::Candidates;
pub use rules::{is_insufficient_material, GameStatus};
pub use san::{castle_move, move_to_san, san_to_move, SanError};
