//! Terminal Chess - two players, one keyboard.
//!
//! The rules live in `chess-rules`; this crate is the terminal around them.
//!
//! # Modules
//!
//! - [`config`] - `terminal-chess.toml` loading
//! - [`render`] - board drawing with chess glyphs or ASCII
//! - [`session`] - the prompt loop that drives a game
//! - [`pgn`] - PGN export of finished games

pub mod config;
pub mod pgn;
pub mod render;
pub mod session;
