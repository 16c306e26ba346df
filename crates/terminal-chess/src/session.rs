//! The interactive prompt loop.
//!
//! Reads one token per line, feeds moves to the [`GameState`] and answers the
//! few housekeeping commands itself. Generic over its streams so whole games
//! can be driven from a string in tests.

use crate::render::{render_board, GlyphStyle};
use chess_rules::{GameError, GameState, GameStatus};
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that end a session early.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading input or writing output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The game could not continue.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The game reached a terminal status.
    Finished(GameStatus),
    /// Input ran out before the game ended.
    InputClosed,
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub style: GlyphStyle,
}

pub const HELP: &str = "\
Enter moves in algebraic notation: e4, Nf3, exd5, O-O, e8=Q.
Other commands:
  draw    end the game as a draw
  resign  give up the game
  export  print the position in FEN notation
  board   draw the board again
  help    show this message";

/// The closing message for a finished game.
pub fn outcome_message(status: GameStatus) -> String {
    match status {
        GameStatus::DrawByAgreement => "It's a draw!".to_string(),
        GameStatus::DrawByFiftyMoveRule => "No pieces have been captured and no pawns have been moved for the last 50 moves.\nIt's a draw!".to_string(),
        GameStatus::DrawByInsufficientMaterial => "There is insufficient material for either side to win.\nIt's a draw!".to_string(),
        GameStatus::DrawByRepetition => "The same position has been reached for the third time.\nIt's a draw!".to_string(),
        GameStatus::Stalemate => "It's stalemate!".to_string(),
        _ => match status.winner() {
            Some(color) => format!("{} wins!", color),
            None => status.to_string(),
        },
    }
}

/// Plays `game` to the end, or until `input` is exhausted.
///
/// Rejected input is reported and re-prompted; only I/O failures and
/// [`GameError::HistoryExhausted`] abort the session.
pub fn run_session<R, W>(
    input: R,
    output: &mut W,
    game: &mut GameState,
    options: &SessionOptions,
) -> Result<SessionEnd, SessionError>
where
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    let mut claimed = false;
    if !game.is_game_over() {
        write!(output, "{}", render_board(&game.position().board, options.style))?;
    }

    while let Some(color) = game.status().side_to_move() {
        write!(output, "{}. {} to move: ", game.position().fullmove_number, color)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            return Ok(SessionEnd::InputClosed);
        };
        let line = line?;
        let token = line.trim();

        match token {
            "" => continue,
            "help" => writeln!(output, "{}", HELP)?,
            "export" => writeln!(output, "{}", game.to_fen())?,
            "board" => write!(output, "{}", render_board(&game.position().board, options.style))?,
            _ => match game.play(token) {
                Ok(status) if status.is_terminal() => {
                    claimed = matches!(token, "draw" | "resign");
                    break;
                }
                Ok(_) => {
                    write!(output, "{}", render_board(&game.position().board, options.style))?;
                    if game.is_check() {
                        writeln!(output, "Check!")?;
                    }
                }
                Err(GameError::InvalidSan(e)) => {
                    warn!(token, error = %e, "rejected input");
                    writeln!(output, "Invalid move: {}", e)?;
                }
                Err(e) => return Err(e.into()),
            },
        }
    }

    let status = game.status();
    if !claimed {
        write!(output, "{}", render_board(&game.position().board, options.style))?;
    }
    writeln!(output, "{}", outcome_message(status))?;
    info!(%status, moves = game.move_history().len(), "game finished");
    Ok(SessionEnd::Finished(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(game: &mut GameState, script: &str) -> (SessionEnd, String) {
        let mut output = Vec::new();
        let options = SessionOptions {
            style: GlyphStyle::Ascii,
        };
        let end = run_session(Cursor::new(script), &mut output, game, &options).unwrap();
        (end, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_fools_mate_session() {
        let mut game = GameState::new();
        let (end, text) = run(&mut game, "f3\ne5\ng4\nQh4#\n");
        assert_eq!(end, SessionEnd::Finished(GameStatus::BlackWon));
        assert!(text.contains("1. White to move: "));
        assert!(text.contains("2. Black to move: "));
        assert!(text.ends_with("Black wins!\n"));
    }

    #[test]
    fn test_invalid_input_is_reprompted() {
        let mut game = GameState::new();
        let (end, text) = run(&mut game, "Ke2\n\nnonsense\ne4\n");
        assert_eq!(end, SessionEnd::InputClosed);
        assert_eq!(text.matches("Invalid move").count(), 2);
        assert_eq!(game.move_history().len(), 1);
        assert!(text.contains("1. Black to move: "));
    }

    #[test]
    fn test_export_prints_fen() {
        let mut game = GameState::new();
        let (_, text) = run(&mut game, "e4\nexport\n");
        assert!(text.contains("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1\n"));
    }

    #[test]
    fn test_resign_and_draw_messages() {
        let mut game = GameState::new();
        let (end, text) = run(&mut game, "resign\n");
        assert_eq!(end, SessionEnd::Finished(GameStatus::BlackWon));
        assert!(text.ends_with("1. White to move: Black wins!\n"));

        let mut game = GameState::new();
        let (end, text) = run(&mut game, "e4\ndraw\n");
        assert_eq!(end, SessionEnd::Finished(GameStatus::DrawByAgreement));
        assert!(text.ends_with("It's a draw!\n"));
    }

    #[test]
    fn test_check_is_announced() {
        let mut game = GameState::new();
        let (_, text) = run(&mut game, "e4\nf5\nQh5+\n");
        assert!(text.contains("Check!\n"));
    }

    #[test]
    fn test_finished_game_is_not_prompted() {
        let mut game = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let (end, text) = run(&mut game, "Kg8\n");
        assert_eq!(end, SessionEnd::Finished(GameStatus::Stalemate));
        assert!(!text.contains("to move"));
        assert!(text.ends_with("It's stalemate!\n"));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(outcome_message(GameStatus::WhiteWon), "White wins!");
        assert!(outcome_message(GameStatus::DrawByRepetition).starts_with("The same position"));
        assert!(outcome_message(GameStatus::DrawByFiftyMoveRule).contains("50 moves"));
        assert!(outcome_message(GameStatus::DrawByInsufficientMaterial).ends_with("It's a draw!"));
    }
}
