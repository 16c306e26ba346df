//! PGN (Portable Game Notation) export for finished games.
//!
//! The move text comes straight from the SAN recorded by the game, check and
//! mate suffixes included. Games that started from a custom position carry
//! `SetUp` and `FEN` tags so other software can replay them.

use crate::config::Config;
use chess_core::{Color, STARTPOS_FEN};
use chess_rules::GameState;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

/// Maximum width of a line of move text.
pub const LINE_WIDTH: usize = 80;

/// Tag values written above the move text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    pub date: NaiveDate,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl PgnHeaders {
    /// Headers taken from the configuration, dated `date`.
    pub fn from_config(config: &Config, date: NaiveDate) -> Self {
        PgnHeaders {
            event: config.event.clone(),
            site: config.site.clone(),
            date,
            round: config.round.clone(),
            white: config.white.clone(),
            black: config.black.clone(),
        }
    }
}

/// Renders `game` as PGN text.
pub fn format_pgn(headers: &PgnHeaders, game: &GameState) -> String {
    let result = game.status().result_token();
    let date = headers.date.format("%Y.%m.%d").to_string();
    let mut out = String::new();

    let tags = [
        ("Event", headers.event.as_str()),
        ("Site", headers.site.as_str()),
        ("Date", date.as_str()),
        ("Round", headers.round.as_str()),
        ("White", headers.white.as_str()),
        ("Black", headers.black.as_str()),
        ("Result", result),
    ];
    for (name, value) in tags {
        out.push_str(&format!("[{} \"{}\"]\n", name, escape(value)));
    }
    if game.start_fen() != STARTPOS_FEN {
        out.push_str("[SetUp \"1\"]\n");
        out.push_str(&format!("[FEN \"{}\"]\n", game.start_fen()));
    }
    out.push('\n');

    let mut tokens = move_tokens(game);
    tokens.push(result.to_string());
    out.push_str(&wrap(&tokens, LINE_WIDTH));
    out.push('\n');
    out
}

/// Writes `game` as a PGN file at `path`.
pub fn write_pgn<P: AsRef<Path>>(path: P, headers: &PgnHeaders, game: &GameState) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(format_pgn(headers, game).as_bytes())?;
    Ok(())
}

/// A file name for a game between the two players on `date`.
pub fn default_file_name(headers: &PgnHeaders) -> String {
    let clean = |name: &str| -> String {
        name.chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    };
    format!(
        "{}-{}-vs-{}.pgn",
        headers.date.format("%Y%m%d"),
        clean(&headers.white),
        clean(&headers.black)
    )
}

/// Numbered SAN tokens: `1.`, `e4`, `e5`, `2.`, ...
fn move_tokens(game: &GameState) -> Vec<String> {
    let mut number = game.start_fullmove_number();
    let mut white_to_move = game.start_side_to_move() == Color::White;

    let mut tokens = Vec::with_capacity(game.move_history().len() * 3 / 2 + 1);
    for (i, recorded) in game.move_history().iter().enumerate() {
        if white_to_move {
            tokens.push(format!("{}.", number));
        } else if i == 0 {
            tokens.push(format!("{}...", number));
        }
        tokens.push(recorded.san.clone());
        if !white_to_move {
            number += 1;
        }
        white_to_move = !white_to_move;
    }
    tokens
}

/// Joins tokens with spaces, breaking lines before they exceed `width`.
fn wrap(tokens: &[String], width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > width {
            out.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += token.len();
    }
    out
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
